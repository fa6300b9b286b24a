//! Structured logging setup.
//!
//! Services pick a [`Severity`] from the `LOG_SEVERITY` parameter and install
//! a `tracing` subscriber once at startup.

use std::fmt;
use std::str::FromStr;

use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Log severity accepted by the `LOG_SEVERITY` parameter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Severity {
    /// Everything, including request-level diagnostics
    Debug,
    /// Lifecycle events and warnings
    #[default]
    Info,
    /// Errors only
    Error,
}

impl Severity {
    /// Canonical upper-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Error => "ERROR",
        }
    }

    /// `EnvFilter` directive for this severity.
    #[must_use]
    pub const fn filter_directive(self) -> &'static str {
        match self {
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown severity name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown log severity ({0})")]
pub struct UnknownSeverity(pub String);

impl FromStr for Severity {
    type Err = UnknownSeverity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "DEBUG" => Ok(Self::Debug),
            "INFO" => Ok(Self::Info),
            "ERROR" => Ok(Self::Error),
            other => Err(UnknownSeverity(other.to_string())),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Service name attached to the startup event
    pub service_name: String,
    /// Minimum severity
    pub severity: Severity,
    /// Whether to output JSON format
    pub json_output: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            service_name: "backend-service".to_string(),
            severity: Severity::Info,
            json_output: false,
        }
    }
}

impl LoggingConfig {
    /// Create config with custom service name.
    #[must_use]
    pub fn with_service_name(mut self, name: impl Into<String>) -> Self {
        self.service_name = name.into();
        self
    }

    /// Create config with custom severity.
    #[must_use]
    pub const fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Enable JSON output.
    #[must_use]
    pub const fn with_json_output(mut self) -> Self {
        self.json_output = true;
        self
    }

    /// Filter used when `RUST_LOG` is not set.
    #[must_use]
    pub fn env_filter(&self) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.severity.filter_directive()))
    }
}

/// Initialize logging with the given configuration.
///
/// Installs the global subscriber; call once at startup. A second call is a
/// no-op because the global subscriber is already set.
pub fn init_logging(config: &LoggingConfig) {
    let filter = config.env_filter();

    let installed = if config.json_output {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init()
    };

    if installed.is_ok() {
        tracing::info!(
            service = %config.service_name,
            severity = %config.severity,
            "Logging initialized"
        );
    }
}

/// Render a startup failure the way operators expect to find it in stderr.
#[must_use]
pub fn format_startup_error(err: &dyn std::error::Error) -> String {
    let separator = "*".repeat(80);
    let mut chain = String::new();
    let mut source = err.source();
    while let Some(cause) = source {
        chain.push_str("caused by: ");
        chain.push_str(&cause.to_string());
        chain.push('\n');
        source = cause.source();
    }

    format!(
        "\n{separator}\nunable to start the application due to:\n{err}\n{separator}\n{chain}"
    )
}

/// Log a startup failure and print it framed to stderr.
pub fn report_startup_error(err: &dyn std::error::Error) {
    tracing::error!(error = %err, "Startup failed");
    eprint!("{}", format_startup_error(err));
}

/// Report a startup failure and exit with status 1.
pub fn exit_on_startup_error(err: &dyn std::error::Error) -> ! {
    report_startup_error(err);
    std::process::exit(1)
}
