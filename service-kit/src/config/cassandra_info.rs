//! Cassandra connection string parameter.
//!
//! Format: `cassandra://[user[:password]@]host1[,host2,...][/keyspace][?dc=<name>]`.

use secrecy::{ExposeSecret, SecretString};

use super::connection::ConnectionUrl;
use super::error::{ConfigError, ConfigResult, ConnectionKind};
use super::string::{ParameterInfo, StringParameter};

const KIND: ConnectionKind = ConnectionKind::Cassandra;
const DATA_CENTER_QUERY_KEY: &str = "dc";

/// Fields derived from a valid connection string.
#[derive(Debug, Default)]
struct CassandraConnection {
    hosts: Vec<String>,
    keyspace: String,
    data_center: String,
    user: String,
    password: Option<SecretString>,
}

/// Cassandra connection info parameter.
#[derive(Debug, Default)]
pub struct CassandraConnectionInfo {
    base: StringParameter,
    connection: CassandraConnection,
}

impl CassandraConnectionInfo {
    /// Create an empty Cassandra parameter with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            base: StringParameter::new(name),
            connection: CassandraConnection::default(),
        }
    }

    /// Contact points in the order given, each possibly with a port.
    #[must_use]
    pub fn hosts(&self) -> &[String] {
        &self.connection.hosts
    }

    /// Keyspace taken from the path.
    #[must_use]
    pub fn keyspace(&self) -> &str {
        &self.connection.keyspace
    }

    /// Preferred data center from the `dc` query parameter, or empty.
    #[must_use]
    pub fn data_center(&self) -> &str {
        &self.connection.data_center
    }

    /// Username, or empty when no credentials were given.
    #[must_use]
    pub fn user(&self) -> &str {
        &self.connection.user
    }

    /// Password, or empty when no credentials were given.
    #[must_use]
    pub fn password(&self) -> &str {
        self.connection
            .password
            .as_ref()
            .map_or("", |password| password.expose_secret())
    }

    /// True when both username and password are set.
    #[must_use]
    pub fn is_authorization_required(&self) -> bool {
        !self.user().is_empty() && !self.password().is_empty()
    }

    /// True when a data center was requested.
    #[must_use]
    pub fn is_dc_aware(&self) -> bool {
        !self.connection.data_center.is_empty()
    }

    fn parse(raw: &str) -> ConfigResult<CassandraConnection> {
        if raw.is_empty() {
            return Err(ConfigError::EmptyConnectionString { kind: KIND });
        }

        let url = ConnectionUrl::parse(raw, KIND)?;
        url.expect_scheme(KIND)?;

        let hosts = url.hosts();
        if hosts.is_empty() {
            return Err(ConfigError::HostsEmpty);
        }

        let keyspace = url.path.trim_matches('/').to_string();
        if keyspace.is_empty() {
            return Err(ConfigError::KeyspaceEmpty);
        }

        let data_center = url.query_value(DATA_CENTER_QUERY_KEY).to_string();

        let (user, password) = match url.user {
            Some(info) => match info.password {
                Some(password) if !password.is_empty() => {
                    (info.username, Some(SecretString::from(password)))
                }
                _ => return Err(ConfigError::PasswordEmpty),
            },
            None => (String::new(), None),
        };

        Ok(CassandraConnection {
            hosts,
            keyspace,
            data_center,
            user,
            password,
        })
    }
}

impl ParameterInfo for CassandraConnectionInfo {
    fn base(&self) -> &StringParameter {
        &self.base
    }

    fn base_mut(&mut self) -> &mut StringParameter {
        &mut self.base
    }

    /// Derived fields change only when the whole string is valid.
    fn validate(&mut self) -> ConfigResult<()> {
        self.connection = Self::parse(self.base.value())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::error::ErrorKind;

    const HOST1: &str = "host1.com:1234";
    const HOST2: &str = "host2.com:2345";
    const KEYSPACE: &str = "cards";
    const DC: &str = "US";
    const USER: &str = "user";
    const PASSWORD: &str = "pwd";

    fn validate(raw: &str) -> (CassandraConnectionInfo, ConfigResult<()>) {
        let mut info = CassandraConnectionInfo::new("CASSANDRA");
        info.set_value(raw.to_string());
        let result = info.validate();
        (info, result)
    }

    #[test]
    fn test_empty_string_fails() {
        let (_, result) = validate("");
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::EmptyConnectionString { .. }));
        assert_eq!(err.kind(), ErrorKind::EmptyValue);
    }

    #[test]
    fn test_incorrect_string_fails() {
        let (_, result) = validate("*:?//");
        assert_eq!(result.unwrap_err().kind(), ErrorKind::IncorrectFormat);
    }

    #[test]
    fn test_missing_scheme_fails() {
        let (_, result) = validate("host.com");
        assert_eq!(result.unwrap_err().kind(), ErrorKind::ProtocolMismatch);
    }

    #[test]
    fn test_wrong_scheme_fails() {
        let (_, result) = validate("mongodb://host.com");
        assert_eq!(result.unwrap_err().kind(), ErrorKind::ProtocolMismatch);
    }

    #[test]
    fn test_empty_keyspace_fails() {
        let (_, result) = validate("cassandra://host.com/?dv=US");
        assert!(matches!(result.unwrap_err(), ConfigError::KeyspaceEmpty));
    }

    #[test]
    fn test_empty_host_list_fails() {
        let (_, result) = validate("cassandra:///cards");
        assert!(matches!(result.unwrap_err(), ConfigError::HostsEmpty));
    }

    #[test]
    fn test_correct_string_passes() {
        let (info, result) = validate(&format!("cassandra://{HOST1}/{KEYSPACE}?dc={DC}"));

        assert!(result.is_ok());
        assert_eq!(info.hosts(), [HOST1]);
        assert_eq!(info.keyspace(), KEYSPACE);
        assert_eq!(info.data_center(), DC);
        assert!(info.user().is_empty());
        assert!(info.password().is_empty());
        assert!(info.is_dc_aware());
        assert!(!info.is_authorization_required());
    }

    #[test]
    fn test_user_without_password_fails() {
        let (_, result) = validate(&format!("cassandra://{USER}@{HOST1}/{KEYSPACE}"));
        let err = result.unwrap_err();
        assert!(matches!(err, ConfigError::PasswordEmpty));
        assert_eq!(err.kind(), ErrorKind::RequiredFieldEmpty);
    }

    #[test]
    fn test_user_with_empty_password_fails() {
        let (_, result) = validate(&format!("cassandra://{USER}:@{HOST1}/{KEYSPACE}"));
        assert!(matches!(result.unwrap_err(), ConfigError::PasswordEmpty));
    }

    #[test]
    fn test_credentials_and_several_hosts_pass() {
        let (info, result) = validate(&format!(
            "cassandra://{USER}:{PASSWORD}@{HOST1},{HOST2}/{KEYSPACE}"
        ));

        assert!(result.is_ok());
        assert_eq!(info.user(), USER);
        assert_eq!(info.password(), PASSWORD);
        assert_eq!(info.hosts(), [HOST1, HOST2]);
        assert!(info.is_authorization_required());
        assert!(!info.is_dc_aware());
    }

    #[test]
    fn test_hosts_keep_order_and_duplicates() {
        let (info, result) = validate("cassandra://b.com,a.com,b.com/ks");
        assert!(result.is_ok());
        assert_eq!(info.hosts(), ["b.com", "a.com", "b.com"]);
    }

    #[test]
    fn test_failed_validation_keeps_previous_fields() {
        let (mut info, result) = validate(&format!("cassandra://{HOST1}/{KEYSPACE}?dc={DC}"));
        assert!(result.is_ok());

        info.set_value(format!("cassandra://{USER}@{HOST2}/other"));
        assert!(info.validate().is_err());

        assert_eq!(info.hosts(), [HOST1]);
        assert_eq!(info.keyspace(), KEYSPACE);
        assert!(info.user().is_empty());
    }

    #[test]
    fn test_debug_output_redacts_password() {
        let (info, _) = validate(&format!("cassandra://{USER}:hunter2@{HOST1}/{KEYSPACE}"));
        let connection = format!("{:?}", info.connection);
        assert!(!connection.contains("hunter2"));
    }
}
