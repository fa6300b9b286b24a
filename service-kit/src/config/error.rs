//! Configuration parameter errors.
//!
//! Every validation failure carries enough context to be logged at startup
//! and is classified by [`ErrorKind`] so callers can branch on the category
//! without matching every variant.

use thiserror::Error;

/// Connection string flavour, used to prefix connection errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionKind {
    /// `cassandra://` connection strings
    Cassandra,
    /// `redis://` connection strings
    Redis,
}

impl ConnectionKind {
    /// URL scheme expected for this connection kind.
    #[must_use]
    pub const fn scheme(self) -> &'static str {
        match self {
            Self::Cassandra => "cassandra",
            Self::Redis => "redis",
        }
    }
}

impl std::fmt::Display for ConnectionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.scheme())
    }
}

/// Category of a configuration error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The raw value (or connection string) is empty
    EmptyValue,
    /// URL, base64, severity or connection string cannot be parsed
    IncorrectFormat,
    /// Connection string uses the wrong URL scheme
    ProtocolMismatch,
    /// A mandatory component (host, keyspace, port, password) is missing
    RequiredFieldEmpty,
    /// Typed access on a key that is missing or registered with another variant
    MisregisteredParameter,
    /// Command-line arguments could not be parsed
    InvalidArguments,
}

/// Configuration parameter error.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Parameter has no value
    #[error("configuration parameter ({name}) is empty")]
    EmptyValue {
        /// Parameter name
        name: String,
    },

    /// URL parameter cannot be parsed
    #[error("URL configuration parameter is incorrect: {value}")]
    IncorrectUrl {
        /// Offending value
        value: String,
        /// Parser error
        #[source]
        source: url::ParseError,
    },

    /// URL has no `/v<N>` segment to strip
    #[error("URL ({value}) does not contain a version part")]
    UrlNotVersioned {
        /// Offending value
        value: String,
    },

    /// Value is not standard base64
    #[error("parameter ({name}) is not a base64-encoded string")]
    IncorrectBase64 {
        /// Parameter name
        name: String,
        /// Decoder error
        #[source]
        source: base64::DecodeError,
    },

    /// Log severity outside of DEBUG, INFO, ERROR
    #[error("log severity ({value}) is incorrect")]
    IncorrectSeverity {
        /// Offending value
        value: String,
    },

    /// Connection string is empty
    #[error("{kind} connection string is empty")]
    EmptyConnectionString {
        /// Connection kind
        kind: ConnectionKind,
    },

    /// Connection string is malformed
    #[error("{kind} connection string is incorrect: {reason}")]
    IncorrectConnectionString {
        /// Connection kind
        kind: ConnectionKind,
        /// What the parser rejected
        reason: String,
    },

    /// Connection string scheme does not match
    #[error("{kind} connection protocol ({actual}) is not ({})", .kind.scheme())]
    IncorrectProtocol {
        /// Connection kind
        kind: ConnectionKind,
        /// Scheme found in the string
        actual: String,
    },

    /// Cassandra host list is empty
    #[error("cassandra hosts are empty")]
    HostsEmpty,

    /// Cassandra keyspace is empty
    #[error("cassandra keyspace is empty")]
    KeyspaceEmpty,

    /// Cassandra username given without password
    #[error("cassandra password cannot be empty if username was set")]
    PasswordEmpty,

    /// Redis host is empty
    #[error("redis host is empty")]
    HostEmpty,

    /// Redis port is empty
    #[error("redis port is empty")]
    PortEmpty,

    /// Typed access on a parameter registered with another variant
    #[error("configuration parameter ({name}) was not registered as {expected}")]
    MisregisteredParameter {
        /// Parameter name
        name: String,
        /// Requested capability
        expected: &'static str,
    },

    /// Flag parser rejected the arguments
    #[error("invalid command-line arguments: {0}")]
    InvalidArguments(#[from] clap::Error),

    /// Validation failure wrapped with the parameter context
    #[error("parameter ({name}) value ({value}): {source}")]
    Invalid {
        /// Parameter name
        name: String,
        /// Raw value that failed
        value: String,
        /// Underlying validation error
        #[source]
        source: Box<ConfigError>,
    },
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

impl ConfigError {
    /// Classify this error.
    ///
    /// Wrapped errors report the kind of the underlying failure.
    #[must_use]
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::EmptyValue { .. } | Self::EmptyConnectionString { .. } => ErrorKind::EmptyValue,
            Self::IncorrectUrl { .. }
            | Self::UrlNotVersioned { .. }
            | Self::IncorrectBase64 { .. }
            | Self::IncorrectSeverity { .. }
            | Self::IncorrectConnectionString { .. } => ErrorKind::IncorrectFormat,
            Self::IncorrectProtocol { .. } => ErrorKind::ProtocolMismatch,
            Self::HostsEmpty
            | Self::KeyspaceEmpty
            | Self::PasswordEmpty
            | Self::HostEmpty
            | Self::PortEmpty => ErrorKind::RequiredFieldEmpty,
            Self::MisregisteredParameter { .. } => ErrorKind::MisregisteredParameter,
            Self::InvalidArguments(_) => ErrorKind::InvalidArguments,
            Self::Invalid { source, .. } => source.kind(),
        }
    }

    /// Innermost error, skipping parameter context wrappers.
    #[must_use]
    pub fn root(&self) -> &Self {
        match self {
            Self::Invalid { source, .. } => source.root(),
            other => other,
        }
    }

    /// Create an empty value error for the given parameter.
    #[must_use]
    pub fn empty(name: impl Into<String>) -> Self {
        Self::EmptyValue { name: name.into() }
    }

    /// Create a misregistered parameter error.
    #[must_use]
    pub fn misregistered(name: impl Into<String>, expected: &'static str) -> Self {
        Self::MisregisteredParameter {
            name: name.into(),
            expected,
        }
    }

    /// Create a malformed connection string error.
    #[must_use]
    pub fn incorrect_connection(kind: ConnectionKind, reason: impl Into<String>) -> Self {
        Self::IncorrectConnectionString {
            kind,
            reason: reason.into(),
        }
    }

    /// Wrap a validation error with the parameter name and offending value.
    #[must_use]
    pub fn with_context(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Invalid {
            name: name.into(),
            value: value.into(),
            source: Box::new(self),
        }
    }
}
