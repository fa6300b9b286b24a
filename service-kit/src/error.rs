//! Crate-wide error type.
//!
//! Configuration failures keep their own [`ConfigError`] taxonomy; everything
//! that talks to the outside world (HTTP, Redis, Cassandra, token signing) reports
//! through [`KitError`], which also classifies failures as retryable or not.

use thiserror::Error;

use crate::config::ConfigError;
use crate::jwt::TokenError;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, KitError>;

/// Error returned by the runtime subsystems of the kit.
#[derive(Error, Debug)]
pub enum KitError {
    /// Configuration is invalid
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Outgoing request could not be built
    #[error("request creation error: {0}")]
    RequestCreation(String),

    /// Request to an external API failed in transport
    #[error("request to external API failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Response body of an external API could not be read
    #[error("external API response read error: {source}")]
    ResponseRead {
        /// Underlying transport error
        source: reqwest::Error,
    },

    /// External API answered with a non-success status
    #[error("external API responded with status {status}: {body}")]
    ExternalApi {
        /// HTTP status code
        status: u16,
        /// Response body as text
        body: String,
    },

    /// Serialization/deserialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Cache backend error
    #[error("cache error: {0}")]
    Cache(#[from] redis::RedisError),

    /// Cassandra session could not be established
    #[error("cassandra connection error: {0}")]
    CassandraConnect(#[from] scylla::errors::NewSessionError),

    /// Cassandra statement failed
    #[error("cassandra query error: {0}")]
    CassandraQuery(#[from] scylla::errors::ExecutionError),

    /// Token signing or verification error
    #[error("token error: {0}")]
    Token(#[from] TokenError),

    /// I/O error, typically while binding a listener
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl KitError {
    /// Check if this error is retryable.
    ///
    /// Transport failures, 5xx/429 answers and dropped cache connections are
    /// transient; everything else is not.
    ///
    /// # Examples
    ///
    /// ```
    /// use service_kit::KitError;
    ///
    /// assert!(KitError::external_api(503, "busy").is_retryable());
    /// assert!(!KitError::external_api(404, "no such card").is_retryable());
    /// ```
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Http(e) => e.is_timeout() || e.is_connect(),
            Self::ExternalApi { status, .. } => *status >= 500 || *status == 429,
            Self::Cache(e) => e.is_timeout() || e.is_connection_dropped() || e.is_io_error(),
            _ => false,
        }
    }

    /// Create an external API error for a non-success answer.
    #[must_use]
    pub fn external_api(status: u16, body: impl Into<String>) -> Self {
        Self::ExternalApi {
            status,
            body: body.into(),
        }
    }

    /// Create a request creation error with the given message.
    #[must_use]
    pub fn request_creation(msg: impl Into<String>) -> Self {
        Self::RequestCreation(msg.into())
    }

    /// Status code carried by an [`KitError::ExternalApi`] error.
    #[must_use]
    pub const fn status(&self) -> Option<u16> {
        match self {
            Self::ExternalApi { status, .. } => Some(*status),
            _ => None,
        }
    }
}
