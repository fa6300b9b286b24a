//! HTTP service runner with graceful shutdown.

use std::future::Future;
use std::time::Duration;

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::{self, Next};
use axum::response::{IntoResponse, Response};
use tokio::net::TcpListener;
use tokio::signal;
use tracing::{error, info, warn};

use super::router::Router;
use crate::config::{
    Config, ConfigResult, DEFAULT_HTTP_READ_TIMEOUT, DEFAULT_HTTP_WRITE_TIMEOUT, Parameter,
    StringParameter,
};
use crate::error::Result;

/// Serves a [`Router`] on a TCP address until a shutdown signal arrives.
#[derive(Debug)]
pub struct Service {
    router: Router,
    address: String,
    read_timeout: Duration,
    write_timeout: Duration,
}

impl Service {
    /// Create a service with the default one-second timeouts.
    #[must_use]
    pub fn new(router: Router, address: impl Into<String>) -> Self {
        Self {
            router,
            address: address.into(),
            read_timeout: DEFAULT_HTTP_READ_TIMEOUT,
            write_timeout: DEFAULT_HTTP_WRITE_TIMEOUT,
        }
    }

    /// Create a service from the `HTTP_ADDRESS` parameter and the configured
    /// timeouts.
    ///
    /// # Errors
    ///
    /// Fails if `HTTP_ADDRESS` was not registered.
    pub fn from_config(router: Router, config: &Config) -> ConfigResult<Self> {
        let address = config.get::<StringParameter>(&Parameter::HTTP_ADDRESS)?;
        Ok(Self::new(router, address.value()).with_timeouts(
            config.http_read_timeout(),
            config.http_write_timeout(),
        ))
    }

    /// Set read and write timeouts.
    #[must_use]
    pub const fn with_timeouts(mut self, read: Duration, write: Duration) -> Self {
        self.read_timeout = read;
        self.write_timeout = write;
        self
    }

    /// Address the service binds to.
    #[must_use]
    pub fn address(&self) -> &str {
        &self.address
    }

    /// Serve until SIGINT or SIGTERM.
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound or serving fails.
    pub async fn run(self) -> Result<()> {
        self.run_until(shutdown_signal()).await
    }

    /// Serve until `shutdown` completes, then drain in-flight requests.
    ///
    /// # Errors
    ///
    /// Returns an error if the address cannot be bound or serving fails.
    pub async fn run_until<F>(self, shutdown: F) -> Result<()>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let listener = TcpListener::bind(&self.address).await?;
        info!(address = %listener.local_addr()?, "Start listening");

        let deadline = self.read_timeout + self.write_timeout;
        let app = with_deadline(self.router.into_axum(), deadline);

        axum::serve(listener, app)
            .with_graceful_shutdown(async move {
                shutdown.await;
                info!("Graceful shutdown...");
            })
            .await?;

        info!("Service has been stopped");
        Ok(())
    }
}

fn with_deadline(app: axum::Router, deadline: Duration) -> axum::Router {
    app.layer(middleware::from_fn_with_state(deadline, enforce_deadline))
}

async fn enforce_deadline(
    State(deadline): State<Duration>,
    request: Request,
    next: Next,
) -> Response {
    let uri = request.uri().clone();
    match tokio::time::timeout(deadline, next.run(request)).await {
        Ok(response) => response,
        Err(_) => {
            warn!(%uri, ?deadline, "Request exceeded its deadline");
            StatusCode::REQUEST_TIMEOUT.into_response()
        }
    }
}

/// Resolve on SIGINT (Ctrl+C) or SIGTERM.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("Received Ctrl+C, initiating shutdown"),
        () = terminate => info!("Received SIGTERM, initiating shutdown"),
    }
}
