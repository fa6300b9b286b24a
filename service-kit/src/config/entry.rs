//! Registered parameter entries and typed access to them.

use super::base64_param::Base64Parameter;
use super::cassandra_info::CassandraConnectionInfo;
use super::error::ConfigResult;
use super::parameter::{Parameter, ParameterKind};
use super::redis_info::RedisConnectionInfo;
use super::severity::LogSeverityParameter;
use super::string::{ParameterInfo, StringParameter};
use super::url_param::UrlParameter;

/// A registered configuration parameter of one of the supported variants.
#[derive(Debug)]
pub enum ParameterEntry {
    /// Plain string
    String(StringParameter),
    /// Absolute URL
    Url(UrlParameter),
    /// Base64-encoded bytes
    Base64(Base64Parameter),
    /// Log severity
    LogSeverity(LogSeverityParameter),
    /// Cassandra connection string
    Cassandra(CassandraConnectionInfo),
    /// Redis connection string
    Redis(RedisConnectionInfo),
}

impl ParameterEntry {
    /// Create an empty entry of the given kind for a parameter.
    #[must_use]
    pub fn new(param: &Parameter, kind: ParameterKind) -> Self {
        let name = param.name();
        match kind {
            ParameterKind::String => Self::String(StringParameter::new(name)),
            ParameterKind::Url => Self::Url(UrlParameter::new(name)),
            ParameterKind::Base64 => Self::Base64(Base64Parameter::new(name)),
            ParameterKind::LogSeverity => Self::LogSeverity(LogSeverityParameter::new(name)),
            ParameterKind::Cassandra => Self::Cassandra(CassandraConnectionInfo::new(name)),
            ParameterKind::Redis => Self::Redis(RedisConnectionInfo::new(name)),
        }
    }

    /// Variant of this entry.
    #[must_use]
    pub const fn kind(&self) -> ParameterKind {
        match self {
            Self::String(_) => ParameterKind::String,
            Self::Url(_) => ParameterKind::Url,
            Self::Base64(_) => ParameterKind::Base64,
            Self::LogSeverity(_) => ParameterKind::LogSeverity,
            Self::Cassandra(_) => ParameterKind::Cassandra,
            Self::Redis(_) => ParameterKind::Redis,
        }
    }

    fn info(&self) -> &dyn ParameterInfo {
        match self {
            Self::String(p) => p,
            Self::Url(p) => p,
            Self::Base64(p) => p,
            Self::LogSeverity(p) => p,
            Self::Cassandra(p) => p,
            Self::Redis(p) => p,
        }
    }

    fn info_mut(&mut self) -> &mut dyn ParameterInfo {
        match self {
            Self::String(p) => p,
            Self::Url(p) => p,
            Self::Base64(p) => p,
            Self::LogSeverity(p) => p,
            Self::Cassandra(p) => p,
            Self::Redis(p) => p,
        }
    }
}

impl ParameterInfo for ParameterEntry {
    fn base(&self) -> &StringParameter {
        self.info().base()
    }

    fn base_mut(&mut self) -> &mut StringParameter {
        self.info_mut().base_mut()
    }

    fn validate(&mut self) -> ConfigResult<()> {
        self.info_mut().validate()
    }
}

/// Typed view of a registered entry.
///
/// Implemented by every parameter variant; [`StringParameter`] is the base
/// capability and is available on every entry.
pub trait TypedParameter: ParameterInfo {
    /// Human-readable capability name used in misregistration errors.
    const CAPABILITY: &'static str;

    /// Borrow the entry as this variant, if it provides it.
    fn from_entry(entry: &ParameterEntry) -> Option<&Self>;
}

impl TypedParameter for StringParameter {
    const CAPABILITY: &'static str = "string parameter";

    fn from_entry(entry: &ParameterEntry) -> Option<&Self> {
        Some(entry.base())
    }
}

impl TypedParameter for UrlParameter {
    const CAPABILITY: &'static str = "URL parameter";

    fn from_entry(entry: &ParameterEntry) -> Option<&Self> {
        match entry {
            ParameterEntry::Url(p) => Some(p),
            _ => None,
        }
    }
}

impl TypedParameter for Base64Parameter {
    const CAPABILITY: &'static str = "base64 parameter";

    fn from_entry(entry: &ParameterEntry) -> Option<&Self> {
        match entry {
            ParameterEntry::Base64(p) => Some(p),
            _ => None,
        }
    }
}

impl TypedParameter for LogSeverityParameter {
    const CAPABILITY: &'static str = "log severity parameter";

    fn from_entry(entry: &ParameterEntry) -> Option<&Self> {
        match entry {
            ParameterEntry::LogSeverity(p) => Some(p),
            _ => None,
        }
    }
}

impl TypedParameter for CassandraConnectionInfo {
    const CAPABILITY: &'static str = "cassandra connection";

    fn from_entry(entry: &ParameterEntry) -> Option<&Self> {
        match entry {
            ParameterEntry::Cassandra(p) => Some(p),
            _ => None,
        }
    }
}

impl TypedParameter for RedisConnectionInfo {
    const CAPABILITY: &'static str = "redis connection";

    fn from_entry(entry: &ParameterEntry) -> Option<&Self> {
        match entry {
            ParameterEntry::Redis(p) => Some(p),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_kind_matches_constructor() {
        for kind in [
            ParameterKind::String,
            ParameterKind::Url,
            ParameterKind::Base64,
            ParameterKind::LogSeverity,
            ParameterKind::Cassandra,
            ParameterKind::Redis,
        ] {
            let entry = ParameterEntry::new(&Parameter::new("X"), kind);
            assert_eq!(entry.kind(), kind);
            assert_eq!(entry.name(), "X");
            assert!(entry.value().is_empty());
        }
    }

    #[test]
    fn test_string_capability_on_every_variant() {
        let mut entry = ParameterEntry::new(&Parameter::REDIS, ParameterKind::Redis);
        entry.set_value("redis://cache:6379".to_string());

        let base = StringParameter::from_entry(&entry).unwrap();
        assert_eq!(base.value(), "redis://cache:6379");
    }

    #[test]
    fn test_typed_access_rejects_other_variants() {
        let entry = ParameterEntry::new(&Parameter::REDIS, ParameterKind::Redis);
        assert!(RedisConnectionInfo::from_entry(&entry).is_some());
        assert!(CassandraConnectionInfo::from_entry(&entry).is_none());
        assert!(UrlParameter::from_entry(&entry).is_none());
    }

    #[test]
    fn test_validate_dispatches_to_variant() {
        let mut entry = ParameterEntry::new(&Parameter::REDIS, ParameterKind::Redis);
        entry.set_value("redis://cache".to_string());
        assert!(matches!(
            entry.validate(),
            Err(crate::config::ConfigError::PortEmpty)
        ));
    }
}
