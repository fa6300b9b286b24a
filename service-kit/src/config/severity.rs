//! Log severity parameter.

use super::error::{ConfigError, ConfigResult};
use super::string::{ParameterInfo, StringParameter};
use crate::logging::Severity;

/// Log severity parameter, one of `DEBUG`, `INFO`, `ERROR`.
#[derive(Debug, Clone, Default)]
pub struct LogSeverityParameter {
    base: StringParameter,
    severity: Option<Severity>,
}

impl LogSeverityParameter {
    /// Create an empty severity parameter with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            base: StringParameter::new(name),
            severity: None,
        }
    }

    /// Parsed severity. Defaults to `INFO` before validation.
    #[must_use]
    pub fn severity(&self) -> Severity {
        self.severity.unwrap_or_default()
    }
}

impl ParameterInfo for LogSeverityParameter {
    fn base(&self) -> &StringParameter {
        &self.base
    }

    fn base_mut(&mut self) -> &mut StringParameter {
        &mut self.base
    }

    fn validate(&mut self) -> ConfigResult<()> {
        self.base.ensure_not_empty()?;

        let severity = self
            .base
            .value()
            .parse::<Severity>()
            .map_err(|e| ConfigError::IncorrectSeverity { value: e.0 })?;
        self.severity = Some(severity);

        Ok(())
    }
}
