//! Redis connection string parameter.
//!
//! Format: `redis://host:port`.

use super::connection::ConnectionUrl;
use super::error::{ConfigError, ConfigResult, ConnectionKind};
use super::string::{ParameterInfo, StringParameter};

const KIND: ConnectionKind = ConnectionKind::Redis;

/// Redis connection info parameter.
#[derive(Debug, Clone, Default)]
pub struct RedisConnectionInfo {
    base: StringParameter,
    host: String,
    port: String,
}

impl RedisConnectionInfo {
    /// Create an empty Redis parameter with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            base: StringParameter::new(name),
            ..Self::default()
        }
    }

    /// Host name.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Port, as written in the connection string.
    #[must_use]
    pub fn port(&self) -> &str {
        &self.port
    }

    /// `host:port` pair for client construction.
    #[must_use]
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// `redis://host:port/` URL accepted by the redis client.
    #[must_use]
    pub fn client_url(&self) -> String {
        format!("{}://{}/", KIND.scheme(), self.address())
    }

    fn parse(raw: &str) -> ConfigResult<(String, String)> {
        if raw.is_empty() {
            return Err(ConfigError::EmptyConnectionString { kind: KIND });
        }

        let url = ConnectionUrl::parse(raw, KIND)?;
        url.expect_scheme(KIND)?;

        let host = url.host.split(':').next().unwrap_or_default();
        if host.is_empty() {
            return Err(ConfigError::HostEmpty);
        }

        let port = url.host.rsplit_once(':').map_or("", |(_, port)| port);
        if port.is_empty() {
            return Err(ConfigError::PortEmpty);
        }

        Ok((host.to_string(), port.to_string()))
    }
}

impl ParameterInfo for RedisConnectionInfo {
    fn base(&self) -> &StringParameter {
        &self.base
    }

    fn base_mut(&mut self) -> &mut StringParameter {
        &mut self.base
    }

    fn validate(&mut self) -> ConfigResult<()> {
        let (host, port) = Self::parse(self.base.value())?;
        self.host = host;
        self.port = port;
        Ok(())
    }
}
