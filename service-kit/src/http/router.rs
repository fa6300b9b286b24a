//! JSON request router on top of axum.

use std::error::Error as StdError;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Bytes;
use axum::extract::Request;
use axum::http::request::Parts;
use axum::response::IntoResponse;
use axum::routing::{MethodFilter, on};
use tracing::{debug, error};

use super::response::{HttpError, Response};

/// Error returned by a handler. [`HttpError`]s reach the client as is;
/// anything else is answered as an internal server error.
pub type HandlerError = Box<dyn StdError + Send + Sync>;

/// Default request body limit.
pub const DEFAULT_BODY_LIMIT: usize = 2 * 1024 * 1024;

/// Request handler registered on a [`Router`].
#[async_trait]
pub trait RequestHandler: Send + Sync + 'static {
    /// Handle one request whose body has already been read.
    async fn handle(
        &self,
        parts: &Parts,
        body: Bytes,
        response: &mut Response,
    ) -> Result<(), HandlerError>;
}

/// Method/path router whose handlers fill a [`Response`].
#[derive(Debug)]
pub struct Router {
    inner: axum::Router,
    body_limit: usize,
}

impl Default for Router {
    fn default() -> Self {
        Self {
            inner: axum::Router::new(),
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }
}

impl Router {
    /// Create an empty router.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the largest accepted request body in bytes.
    #[must_use]
    pub const fn with_body_limit(mut self, limit: usize) -> Self {
        self.body_limit = limit;
        self
    }

    /// Register a GET handler.
    #[must_use]
    pub fn get(self, path: &str, handler: impl RequestHandler) -> Self {
        self.route(path, MethodFilter::GET, handler)
    }

    /// Register a POST handler.
    #[must_use]
    pub fn post(self, path: &str, handler: impl RequestHandler) -> Self {
        self.route(path, MethodFilter::POST, handler)
    }

    /// Register a PUT handler.
    #[must_use]
    pub fn put(self, path: &str, handler: impl RequestHandler) -> Self {
        self.route(path, MethodFilter::PUT, handler)
    }

    /// Register a DELETE handler.
    #[must_use]
    pub fn delete(self, path: &str, handler: impl RequestHandler) -> Self {
        self.route(path, MethodFilter::DELETE, handler)
    }

    /// Mount plain axum routes, such as the health endpoints.
    #[must_use]
    pub fn merge(mut self, routes: axum::Router) -> Self {
        self.inner = self.inner.merge(routes);
        self
    }

    /// Finish the router. Unknown paths answer `404` with an empty JSON body.
    #[must_use]
    pub fn into_axum(self) -> axum::Router {
        self.inner
            .fallback(|| async { HttpError::route_not_found() })
    }

    fn route(mut self, path: &str, method: MethodFilter, handler: impl RequestHandler) -> Self {
        let handler: Arc<dyn RequestHandler> = Arc::new(handler);
        let body_limit = self.body_limit;
        let endpoint = on(method, move |request: Request| {
            let handler = Arc::clone(&handler);
            async move { dispatch(handler.as_ref(), request, body_limit).await }
        });
        self.inner = self.inner.route(path, endpoint);
        self
    }
}

async fn dispatch(
    handler: &dyn RequestHandler,
    request: Request,
    body_limit: usize,
) -> axum::response::Response {
    let (parts, body) = request.into_parts();
    let body = match axum::body::to_bytes(body, body_limit).await {
        Ok(body) => body,
        Err(e) => {
            debug!(error = %e, uri = %parts.uri, "Failed to read request body");
            return HttpError::request_read().into_response();
        }
    };

    let mut response = Response::new();
    match handler.handle(&parts, body, &mut response).await {
        Ok(()) => response.into_response(),
        Err(e) => error_response(&parts, e),
    }
}

fn error_response(parts: &Parts, err: HandlerError) -> axum::response::Response {
    match err.downcast::<HttpError>() {
        Ok(http_error) => {
            debug!(method = %parts.method, uri = %parts.uri, error = %http_error, "Request rejected");
            (*http_error).into_response()
        }
        Err(other) => {
            error!(method = %parts.method, uri = %parts.uri, error = %other, "Request handler failed");
            HttpError::internal_server_error().into_response()
        }
    }
}
