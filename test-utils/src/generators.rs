//! Shared proptest generators for configuration values.

use proptest::prelude::*;

/// Generate host names, optionally with a port.
pub fn host_strategy() -> impl Strategy<Value = String> {
    (
        "[a-z][a-z0-9-]{0,12}(\\.[a-z]{2,5}){0,2}",
        proptest::option::of(1_u16..=u16::MAX),
    )
        .prop_map(|(name, port)| match port {
            Some(port) => format!("{name}:{port}"),
            None => name,
        })
}

/// Generate Cassandra keyspace names.
pub fn keyspace_strategy() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9_]{0,20}"
}

/// Generate data center names.
pub fn data_center_strategy() -> impl Strategy<Value = String> {
    "[A-Z]{2}(-[a-z]{4,8}-[0-9])?"
}

/// Generate credentials that survive URL userinfo encoding.
pub fn credentials_strategy() -> impl Strategy<Value = (String, String)> {
    ("[a-z][a-z0-9_]{0,12}", "[A-Za-z0-9]{1,24}")
}

/// Parts of a valid Cassandra connection string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CassandraParts {
    /// Contact points in order
    pub hosts: Vec<String>,
    /// Keyspace
    pub keyspace: String,
    /// Data center, if any
    pub data_center: Option<String>,
    /// Username and password, if any
    pub credentials: Option<(String, String)>,
}

impl CassandraParts {
    /// Render as `cassandra://[user:password@]h1,h2/keyspace[?dc=..]`.
    #[must_use]
    pub fn connection_string(&self) -> String {
        let credentials = self
            .credentials
            .as_ref()
            .map(|(user, password)| format!("{user}:{password}@"))
            .unwrap_or_default();
        let dc = self
            .data_center
            .as_ref()
            .map(|dc| format!("?dc={dc}"))
            .unwrap_or_default();

        format!(
            "cassandra://{credentials}{}/{}{dc}",
            self.hosts.join(","),
            self.keyspace
        )
    }
}

/// Generate valid Cassandra connection strings with their parts.
pub fn cassandra_parts_strategy() -> impl Strategy<Value = CassandraParts> {
    (
        prop::collection::vec(host_strategy(), 1..5),
        keyspace_strategy(),
        proptest::option::of(data_center_strategy()),
        proptest::option::of(credentials_strategy()),
    )
        .prop_map(|(hosts, keyspace, data_center, credentials)| CassandraParts {
            hosts,
            keyspace,
            data_center,
            credentials,
        })
}

/// Generate `(connection string, host, port)` for valid Redis strings.
pub fn redis_strategy() -> impl Strategy<Value = (String, String, String)> {
    ("[a-z][a-z0-9-]{0,12}(\\.[a-z]{2,5}){0,2}", 1_u16..=u16::MAX).prop_map(|(host, port)| {
        (
            format!("redis://{host}:{port}"),
            host,
            port.to_string(),
        )
    })
}

/// Generate accepted log severity spellings.
pub fn severity_strategy() -> impl Strategy<Value = &'static str> {
    prop_oneof![Just("DEBUG"), Just("INFO"), Just("ERROR")]
}

/// Generate strings that are not accepted as log severities.
pub fn invalid_severity_strategy() -> impl Strategy<Value = String> {
    "[A-Za-z]{0,8}".prop_filter("must not be a known severity", |s| {
        !matches!(s.as_str(), "DEBUG" | "INFO" | "ERROR")
    })
}

/// Generate parameter names in the conventional `UPPER_SNAKE` form.
pub fn parameter_name_strategy() -> impl Strategy<Value = String> {
    "[A-Z][A-Z0-9_]{0,24}"
}

/// Generate arbitrary binary payloads.
pub fn payload_strategy() -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(any::<u8>(), 0..256)
}
