//! Handler responses and JSON error bodies.

use axum::http::{HeaderValue, StatusCode, header};
use axum::response::IntoResponse;
use serde::Serialize;
use thiserror::Error;

/// Application error codes shared by every service.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    /// Request serving failed internally
    Internal = 10000,
    /// Request body could not be read
    RequestRead = 30000,
    /// Request body is not valid JSON
    RequestParsing = 30001,
    /// Response body could not be encoded
    ResponseEncoding = 30002,
}

impl ErrorCode {
    /// Numeric code written to the error body.
    #[must_use]
    pub const fn as_u32(self) -> u32 {
        self as u32
    }
}

/// HTTP error answered to the client as `{"code": .., "message": ..}`.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("HTTP {status}: [{code}] {message}")]
pub struct HttpError {
    #[serde(skip)]
    status: StatusCode,
    code: u32,
    message: String,
}

impl HttpError {
    /// Create an error with an arbitrary status.
    #[must_use]
    pub fn new(status: StatusCode, code: u32, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    /// 400 Bad Request.
    #[must_use]
    pub fn bad_request(code: u32, message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, code, message)
    }

    /// 401 Unauthorized.
    #[must_use]
    pub fn unauthorized(code: u32, message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, code, message)
    }

    /// 403 Forbidden.
    #[must_use]
    pub fn forbidden(code: u32, message: impl Into<String>) -> Self {
        Self::new(StatusCode::FORBIDDEN, code, message)
    }

    /// 404 Not Found.
    #[must_use]
    pub fn not_found(code: u32, message: impl Into<String>) -> Self {
        Self::new(StatusCode::NOT_FOUND, code, message)
    }

    /// 500 Internal Server Error.
    #[must_use]
    pub fn internal(code: u32, message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, code, message)
    }

    /// Request body could not be read.
    #[must_use]
    pub fn request_read() -> Self {
        Self::bad_request(
            ErrorCode::RequestRead.as_u32(),
            "Request content reading error. Check your request body.",
        )
    }

    /// Request body is not a valid JSON object.
    #[must_use]
    pub fn request_parsing() -> Self {
        Self::bad_request(
            ErrorCode::RequestParsing.as_u32(),
            "Request body parsing error. It must be a valid JSON object.",
        )
    }

    /// Response body could not be encoded.
    #[must_use]
    pub fn response_encoding() -> Self {
        Self::bad_request(
            ErrorCode::ResponseEncoding.as_u32(),
            "Response encoding error. The request itself succeeded.",
        )
    }

    /// Catch-all for handler failures that carry no HTTP information.
    #[must_use]
    pub fn internal_server_error() -> Self {
        Self::internal(
            ErrorCode::Internal.as_u32(),
            "Request serving internal error. Try again later.",
        )
    }

    /// Unknown route. Answered with an empty body.
    #[must_use]
    pub fn route_not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, 0, "")
    }

    /// HTTP status.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Application error code.
    #[must_use]
    pub const fn code(&self) -> u32 {
        self.code
    }

    /// Human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// JSON body, or nothing when the error has neither code nor message.
    #[must_use]
    pub fn body(&self) -> Vec<u8> {
        if self.code == 0 && self.message.is_empty() {
            return Vec::new();
        }
        serde_json::to_vec(self).unwrap_or_default()
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> axum::response::Response {
        let body = self.body();
        (
            self.status,
            [(header::CONTENT_TYPE, HeaderValue::from_static("application/json"))],
            body,
        )
            .into_response()
    }
}

/// Response built by a request handler.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    status: StatusCode,
    body: Vec<u8>,
}

impl Default for Response {
    fn default() -> Self {
        Self {
            status: StatusCode::OK,
            body: Vec::new(),
        }
    }
}

impl Response {
    /// Empty `200 OK` response.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Encoded body.
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Encode a value as the JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`HttpError::response_encoding`] if the value cannot be
    /// serialized.
    pub fn set_body<T: Serialize + ?Sized>(&mut self, value: &T) -> Result<(), HttpError> {
        self.body = serde_json::to_vec(value).map_err(|e| {
            tracing::debug!(error = %e, "Unable to encode an HTTP response body");
            HttpError::response_encoding()
        })?;
        Ok(())
    }

    /// Status.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Set the status.
    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    /// Set `201 Created`.
    pub fn set_created_status(&mut self) {
        self.status = StatusCode::CREATED;
    }

    /// Set `400 Bad Request`.
    pub fn set_bad_request_status(&mut self) {
        self.status = StatusCode::BAD_REQUEST;
    }
}

impl IntoResponse for Response {
    fn into_response(self) -> axum::response::Response {
        if self.body.is_empty() {
            return self.status.into_response();
        }
        (
            self.status,
            [(header::CONTENT_TYPE, HeaderValue::from_static("application/json"))],
            self.body,
        )
            .into_response()
    }
}
