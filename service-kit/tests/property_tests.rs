//! Property-based tests for service-kit.
//!
//! These tests verify universal properties across generated inputs using proptest.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use proptest::prelude::*;
use service_kit::KitError;
use service_kit::config::{
    Base64Parameter, CassandraConnectionInfo, Config, ErrorKind, LogSeverityParameter, Parameter,
    ParameterInfo, RedisConnectionInfo, UrlParameter,
};
use test_utils::{
    cassandra_parts_strategy, invalid_severity_strategy, parameter_name_strategy,
    payload_strategy, redis_strategy, severity_strategy,
};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    // Decoding what was encoded gives back the original bytes.
    #[test]
    fn prop_base64_round_trip(payload in payload_strategy()) {
        let mut param = Base64Parameter::new("PRIVATE_KEY");
        param.set_value(STANDARD.encode(&payload));

        let result = param.validate();
        if payload.is_empty() {
            prop_assert_eq!(result.unwrap_err().kind(), ErrorKind::EmptyValue);
        } else {
            prop_assert!(result.is_ok());
            prop_assert_eq!(param.decoded_value(), payload.as_slice());
        }
    }

    // Every generated connection string parses back into its parts, hosts in order.
    #[test]
    fn prop_cassandra_parts_survive_parsing(parts in cassandra_parts_strategy()) {
        let mut info = CassandraConnectionInfo::new("CASSANDRA");
        info.set_value(parts.connection_string());
        prop_assert!(info.validate().is_ok(), "rejected {}", parts.connection_string());

        prop_assert_eq!(info.hosts(), parts.hosts.as_slice());
        prop_assert_eq!(info.keyspace(), parts.keyspace.as_str());
        prop_assert_eq!(info.data_center(), parts.data_center.as_deref().unwrap_or(""));
        prop_assert_eq!(info.is_dc_aware(), parts.data_center.is_some());

        let (user, password) = parts.credentials.clone().unwrap_or_default();
        prop_assert_eq!(info.user(), user.as_str());
        prop_assert_eq!(info.password(), password.as_str());
        prop_assert_eq!(info.is_authorization_required(), parts.credentials.is_some());
    }

    #[test]
    fn prop_redis_host_and_port((raw, host, port) in redis_strategy()) {
        let mut info = RedisConnectionInfo::new("REDIS");
        info.set_value(raw);
        prop_assert!(info.validate().is_ok());
        prop_assert_eq!(info.host(), host.as_str());
        prop_assert_eq!(info.port(), port.as_str());
    }

    #[test]
    fn prop_known_severities_accepted(severity in severity_strategy()) {
        let mut param = LogSeverityParameter::new("LOG_SEVERITY");
        param.set_value(severity.to_string());
        prop_assert!(param.validate().is_ok());
        prop_assert_eq!(param.severity().as_str(), severity);
    }

    #[test]
    fn prop_unknown_severities_rejected(severity in invalid_severity_strategy()) {
        let mut param = LogSeverityParameter::new("LOG_SEVERITY");
        param.set_value(severity.clone());
        let kind = param.validate().unwrap_err().kind();
        if severity.is_empty() {
            prop_assert_eq!(kind, ErrorKind::EmptyValue);
        } else {
            prop_assert_eq!(kind, ErrorKind::IncorrectFormat);
        }
    }

    // Registering a key any number of times leaves exactly one entry.
    #[test]
    fn prop_registration_is_idempotent(name in parameter_name_strategy(), times in 1_usize..5) {
        let mut config = Config::new();
        for _ in 0..times {
            config.register(Parameter::new(name.clone()));
        }
        prop_assert_eq!(config.len(), 1);
    }

    // Reading a key that was never registered is a soft miss.
    #[test]
    fn prop_unregistered_value_is_empty(name in parameter_name_strategy()) {
        let config = Config::new();
        prop_assert_eq!(config.get_value(&Parameter::new(name)), "");
    }

    #[test]
    fn prop_version_suffix_is_stripped(host in "[a-z]{3,12}\\.com", version in 1_u32..100) {
        let mut param = UrlParameter::new("URL_DEV_PORTAL");
        param.set_value(format!("https://{host}/v{version}"));
        prop_assert!(param.validate().is_ok());
        prop_assert_eq!(param.not_versioned_url().unwrap(), format!("https://{host}"));
    }

    #[test]
    fn prop_server_errors_are_retryable(status in 500_u16..600, body in "[a-z ]{0,20}") {
        prop_assert!(KitError::external_api(status, body).is_retryable());
    }

    #[test]
    fn prop_client_errors_are_not_retryable(
        status in (400_u16..500).prop_filter("429 is retryable", |s| *s != 429),
    ) {
        prop_assert!(!KitError::external_api(status, "").is_retryable());
    }
}
