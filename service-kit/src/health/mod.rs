//! Dependency health checks served on `/health/info` and `/health/status`.
//!
//! ```
//! use service_kit::health::{BuildVersion, Dispatcher};
//!
//! let mut dispatcher = Dispatcher::new(BuildVersion::new("v1.0.0", "main", "abc123", "2024-05-01"));
//! dispatcher.register_dependency("redis", || Ok::<(), std::io::Error>(()));
//!
//! let report = dispatcher.info();
//! assert!(report.is_healthy());
//! ```

mod report;

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use tracing::{error, warn};

pub use report::{BuildVersion, DependencyReport, HealthReport, LATENCY_MEASURE_UNIT};

/// Path of the detailed report.
pub const INFO_URL: &str = "/health/info";
/// Path of the summary report.
pub const STATUS_URL: &str = "/health/status";

/// Conventional dependency name for Cassandra.
pub const DEPENDENCY_CASSANDRA: &str = "cassandra";
/// Conventional dependency name for Redis.
pub const DEPENDENCY_REDIS: &str = "redis";

type Checker = Box<dyn Fn() -> Result<(), String> + Send + Sync>;

struct Dependency {
    name: String,
    checker: Checker,
}

impl Dependency {
    fn check(&self) -> DependencyReport {
        let start = Instant::now();
        let result = (self.checker)();
        let latency = start.elapsed();

        if let Err(e) = &result {
            warn!(dependency = %self.name, error = %e, "Dependency check failed");
        }
        DependencyReport::new(result.is_ok(), latency)
    }
}

/// Registry of dependency checkers plus build metadata.
pub struct Dispatcher {
    build: BuildVersion,
    dependencies: Vec<Dependency>,
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("build", &self.build)
            .field(
                "dependencies",
                &self.dependencies.iter().map(|d| d.name.as_str()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl Dispatcher {
    /// Create a dispatcher without dependencies.
    #[must_use]
    pub const fn new(build: BuildVersion) -> Self {
        Self {
            build,
            dependencies: Vec::new(),
        }
    }

    /// Register a synchronous checker. A name registered twice is checked
    /// twice and reported once.
    pub fn register_dependency<F, E>(&mut self, name: impl Into<String>, checker: F)
    where
        F: Fn() -> Result<(), E> + Send + Sync + 'static,
        E: fmt::Display,
    {
        self.dependencies.push(Dependency {
            name: name.into(),
            checker: Box::new(move || checker().map_err(|e| e.to_string())),
        });
    }

    /// Number of registered dependencies.
    #[must_use]
    pub fn len(&self) -> usize {
        self.dependencies.len()
    }

    /// True when no dependency is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.dependencies.is_empty()
    }

    /// Run every checker and report each dependency's status and latency.
    #[must_use]
    pub fn info(&self) -> HealthReport {
        let mut report = HealthReport::new(self.build.clone());
        for dependency in &self.dependencies {
            report.add_dependency(&dependency.name, dependency.check());
        }
        report
    }

    /// Run every checker and report only the overall status.
    #[must_use]
    pub fn status(&self) -> HealthReport {
        let mut report = HealthReport::new(self.build.clone());
        let failed = self
            .dependencies
            .iter()
            .map(Dependency::check)
            .filter(|d| !d.is_ok())
            .count();
        if failed > 0 {
            report.mark_failed();
        }
        report
    }

    /// Mount both endpoints on an axum router. Checkers run on the blocking
    /// pool.
    #[must_use]
    pub fn routes(self) -> axum::Router {
        axum::Router::new()
            .route(INFO_URL, get(info_handler))
            .route(STATUS_URL, get(status_handler))
            .with_state(Arc::new(self))
    }
}

async fn info_handler(State(dispatcher): State<Arc<Dispatcher>>) -> axum::response::Response {
    run_checks(dispatcher, Dispatcher::info).await
}

async fn status_handler(State(dispatcher): State<Arc<Dispatcher>>) -> axum::response::Response {
    run_checks(dispatcher, Dispatcher::status).await
}

async fn run_checks(
    dispatcher: Arc<Dispatcher>,
    checks: fn(&Dispatcher) -> HealthReport,
) -> axum::response::Response {
    match tokio::task::spawn_blocking(move || checks(&dispatcher)).await {
        Ok(report) => report.into_response(),
        Err(e) => {
            error!(error = %e, "Health check task failed");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
