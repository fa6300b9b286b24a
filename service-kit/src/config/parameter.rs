//! Configuration parameter keys.

use std::borrow::Cow;
use std::fmt;

/// Variant of a configuration parameter entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParameterKind {
    /// Plain non-empty string
    String,
    /// Absolute URL
    Url,
    /// Standard base64-encoded bytes
    Base64,
    /// One of `DEBUG`, `INFO`, `ERROR`
    LogSeverity,
    /// `cassandra://` connection string
    Cassandra,
    /// `redis://` connection string
    Redis,
}

/// Name of a configuration slot.
///
/// The name doubles as the command-line flag (`--NAME`) and the environment
/// variable read as a fallback.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Parameter(Cow<'static, str>);

impl Parameter {
    /// Cassandra connection string.
    pub const CASSANDRA: Self = Self::from_static("CASSANDRA");
    /// HTTP listen address.
    pub const HTTP_ADDRESS: Self = Self::from_static("HTTP_ADDRESS");
    /// Developer portal URL.
    pub const DEV_PORTAL_URL: Self = Self::from_static("URL_DEV_PORTAL");
    /// Redis connection string.
    pub const REDIS: Self = Self::from_static("REDIS");
    /// Base64-encoded private key.
    pub const PRIVATE_KEY: Self = Self::from_static("PRIVATE_KEY");
    /// Base64-encoded private key password.
    pub const PRIVATE_KEY_PASSWORD: Self = Self::from_static("PRIVATE_KEY_PASSWORD");
    /// Public key.
    pub const PUBLIC_KEY: Self = Self::from_static("PUBLIC_KEY");
    /// Log severity.
    pub const LOG_SEVERITY: Self = Self::from_static("LOG_SEVERITY");

    /// Create a parameter key from a static name.
    #[must_use]
    pub const fn from_static(name: &'static str) -> Self {
        Self(Cow::Borrowed(name))
    }

    /// Create a parameter key for an ad hoc name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self(Cow::Owned(name.into()))
    }

    /// External (flag and environment) name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.0
    }

    /// Kind associated with this key when registered without an explicit one.
    #[must_use]
    pub fn kind(&self) -> ParameterKind {
        match self.name() {
            "CASSANDRA" => ParameterKind::Cassandra,
            "REDIS" => ParameterKind::Redis,
            "URL_DEV_PORTAL" => ParameterKind::Url,
            "PRIVATE_KEY" | "PRIVATE_KEY_PASSWORD" => ParameterKind::Base64,
            "LOG_SEVERITY" => ParameterKind::LogSeverity,
            _ => ParameterKind::String,
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl From<&'static str> for Parameter {
    fn from(name: &'static str) -> Self {
        Self::from_static(name)
    }
}

impl From<String> for Parameter {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}
