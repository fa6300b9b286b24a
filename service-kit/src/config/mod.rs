//! Typed configuration parameter registry.
//!
//! A service registers the parameters it needs, parses them once at startup
//! and then reads strongly typed accessors:
//!
//! ```
//! use service_kit::config::{Config, Parameter, RedisConnectionInfo};
//!
//! let mut config = Config::new();
//! config.register(Parameter::REDIS);
//! config
//!     .parse_from(["cards-service", "--REDIS", "redis://cache.local:6379"])
//!     .expect("valid configuration");
//!
//! let redis = config.get::<RedisConnectionInfo>(&Parameter::REDIS).unwrap();
//! assert_eq!(redis.host(), "cache.local");
//! assert_eq!(redis.port(), "6379");
//! ```
//!
//! Every parameter is read from the `--NAME` flag with the `NAME`
//! environment variable as a fallback. Validation is all-or-nothing.

mod base64_param;
mod cassandra_info;
mod connection;
mod entry;
mod error;
mod parameter;
mod redis_info;
mod severity;
mod string;
mod url_param;

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::time::Duration;

use clap::{Arg, ArgAction, Command};
use tracing::{debug, error, info};

pub use base64_param::Base64Parameter;
pub use cassandra_info::CassandraConnectionInfo;
pub use entry::{ParameterEntry, TypedParameter};
pub use error::{ConfigError, ConfigResult, ConnectionKind, ErrorKind};
pub use parameter::{Parameter, ParameterKind};
pub use redis_info::RedisConnectionInfo;
pub use severity::LogSeverityParameter;
pub use string::{ParameterInfo, StringParameter};
pub use url_param::UrlParameter;

/// Default HTTP read timeout.
pub const DEFAULT_HTTP_READ_TIMEOUT: Duration = Duration::from_secs(1);
/// Default HTTP write timeout.
pub const DEFAULT_HTTP_WRITE_TIMEOUT: Duration = Duration::from_secs(1);

/// Registry of the configuration parameters a process needs.
#[derive(Debug)]
pub struct Config {
    parameters: BTreeMap<Parameter, ParameterEntry>,
    http_read_timeout: Duration,
    http_write_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            parameters: BTreeMap::new(),
            http_read_timeout: DEFAULT_HTTP_READ_TIMEOUT,
            http_write_timeout: DEFAULT_HTTP_WRITE_TIMEOUT,
        }
    }
}

impl Config {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the HTTP read timeout handed to the service runner.
    #[must_use]
    pub const fn with_http_read_timeout(mut self, timeout: Duration) -> Self {
        self.http_read_timeout = timeout;
        self
    }

    /// Set the HTTP write timeout handed to the service runner.
    #[must_use]
    pub const fn with_http_write_timeout(mut self, timeout: Duration) -> Self {
        self.http_write_timeout = timeout;
        self
    }

    /// Load a `.env` file from the working directory or its parents into the
    /// process environment, if one exists.
    pub fn load_dotenv() {
        match dotenvy::dotenv() {
            Ok(path) => debug!(path = %path.display(), "Loaded .env file"),
            Err(e) if e.not_found() => {}
            Err(e) => error!(error = %e, "Failed to load .env file"),
        }
    }

    /// Register a parameter with the kind predefined for its key.
    ///
    /// Registering the same key again replaces the previous entry.
    pub fn register(&mut self, param: Parameter) {
        let kind = param.kind();
        self.register_custom(param, kind);
    }

    /// Register a parameter with an explicit kind.
    pub fn register_custom(&mut self, param: Parameter, kind: ParameterKind) {
        let entry = ParameterEntry::new(&param, kind);
        self.parameters.insert(param, entry);
    }

    /// Register a custom string parameter.
    pub fn register_string(&mut self, param: Parameter) {
        self.register_custom(param, ParameterKind::String);
    }

    /// Register a custom base64-encoded parameter.
    pub fn register_base64(&mut self, param: Parameter) {
        self.register_custom(param, ParameterKind::Base64);
    }

    /// Register a custom URL parameter.
    pub fn register_url(&mut self, param: Parameter) {
        self.register_custom(param, ParameterKind::Url);
    }

    /// Number of registered parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    /// True when nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// True when the key is registered.
    #[must_use]
    pub fn contains(&self, param: &Parameter) -> bool {
        self.parameters.contains_key(param)
    }

    /// Read every parameter from the process arguments and environment, then
    /// validate them all.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidArguments`] if the arguments cannot be
    /// parsed, or the first validation failure wrapped with the parameter
    /// name and raw value. The registry must not be used after an error.
    pub fn parse(&mut self) -> ConfigResult<()> {
        self.parse_from(std::env::args_os())
    }

    /// Same as [`Config::parse`] over an explicit argument list whose first
    /// item is the binary name.
    ///
    /// # Errors
    ///
    /// See [`Config::parse`].
    pub fn parse_from<I, T>(&mut self, args: I) -> ConfigResult<()>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let command = self
            .parameters
            .values()
            .fold(command(), |command, entry| {
                command.arg(flag_for(entry.name()))
            });
        let matches = command.try_get_matches_from(args)?;

        for entry in self.parameters.values_mut() {
            let value = matches
                .try_get_one::<String>(entry.name())
                .ok()
                .flatten()
                .cloned()
                .unwrap_or_default();
            debug!(parameter = entry.name(), is_set = !value.is_empty(), "Read configuration parameter");
            entry.set_value(value);
        }

        self.validate_parameters()?;
        info!(parameters = self.parameters.len(), "Configuration parsed");
        Ok(())
    }

    /// Raw value of a parameter, or an empty string if it was never
    /// registered.
    #[must_use]
    pub fn get_value(&self, param: &Parameter) -> &str {
        self.parameters.get(param).map_or("", |entry| entry.value())
    }

    /// Typed access to a registered parameter.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MisregisteredParameter`] if the key is not
    /// registered or its variant does not provide `T`.
    pub fn get<T: TypedParameter>(&self, param: &Parameter) -> ConfigResult<&T> {
        self.parameters
            .get(param)
            .and_then(T::from_entry)
            .ok_or_else(|| ConfigError::misregistered(param.name(), T::CAPABILITY))
    }

    /// Connection info of the predefined `CASSANDRA` parameter.
    ///
    /// # Errors
    ///
    /// See [`Config::get`].
    pub fn cassandra_connection_info(&self) -> ConfigResult<&CassandraConnectionInfo> {
        self.get(&Parameter::CASSANDRA)
    }

    /// Connection info of the predefined `REDIS` parameter.
    ///
    /// # Errors
    ///
    /// See [`Config::get`].
    pub fn redis_connection_info(&self) -> ConfigResult<&RedisConnectionInfo> {
        self.get(&Parameter::REDIS)
    }

    /// Decoded `PRIVATE_KEY` parameter.
    ///
    /// # Errors
    ///
    /// See [`Config::get`].
    pub fn private_key_info(&self) -> ConfigResult<&Base64Parameter> {
        self.get(&Parameter::PRIVATE_KEY)
    }

    /// Decoded `PRIVATE_KEY_PASSWORD` parameter.
    ///
    /// # Errors
    ///
    /// See [`Config::get`].
    pub fn private_key_password_info(&self) -> ConfigResult<&Base64Parameter> {
        self.get(&Parameter::PRIVATE_KEY_PASSWORD)
    }

    /// `LOG_SEVERITY` parameter.
    ///
    /// # Errors
    ///
    /// See [`Config::get`].
    pub fn log_info(&self) -> ConfigResult<&LogSeverityParameter> {
        self.get(&Parameter::LOG_SEVERITY)
    }

    /// HTTP read timeout.
    #[must_use]
    pub const fn http_read_timeout(&self) -> Duration {
        self.http_read_timeout
    }

    /// HTTP write timeout.
    #[must_use]
    pub const fn http_write_timeout(&self) -> Duration {
        self.http_write_timeout
    }

    fn validate_parameters(&mut self) -> ConfigResult<()> {
        for entry in self.parameters.values_mut() {
            if let Err(e) = entry.validate() {
                error!(parameter = entry.name(), error = %e, "Configuration parameter is invalid");
                return Err(e.with_context(entry.name(), entry.value()));
            }
        }
        Ok(())
    }
}

// Parameter names own the whole flag namespace. A repeated flag keeps its
// last value.
fn command() -> Command {
    Command::new("service")
        .disable_help_flag(true)
        .disable_version_flag(true)
        .args_override_self(true)
}

fn flag_for(name: &str) -> Arg {
    Arg::new(name.to_string())
        .long(name.to_string())
        .env(name.to_string())
        .action(ArgAction::Set)
        .num_args(1)
        .default_value("")
}
