//! Base string parameter and the capability shared by every variant.

use super::error::{ConfigError, ConfigResult};

/// Capability every configuration parameter provides.
///
/// Variants embed a [`StringParameter`] holding the name and raw value and
/// add their own validation on top of it.
pub trait ParameterInfo {
    /// Embedded base parameter.
    fn base(&self) -> &StringParameter;

    /// Mutable embedded base parameter.
    fn base_mut(&mut self) -> &mut StringParameter;

    /// Parse the raw value and cache derived fields.
    ///
    /// # Errors
    ///
    /// Returns the variant-specific validation error.
    fn validate(&mut self) -> ConfigResult<()>;

    /// External (flag and environment) name.
    fn name(&self) -> &str {
        self.base().name()
    }

    /// Raw, unparsed value.
    fn value(&self) -> &str {
        self.base().value()
    }

    /// Replace the raw value. Derived fields are refreshed by the next `validate`.
    fn set_value(&mut self, value: String) {
        self.base_mut().value = value;
    }
}

/// Plain string configuration parameter.
///
/// The value must not be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringParameter {
    name: String,
    value: String,
}

impl StringParameter {
    /// Create an empty parameter with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: String::new(),
        }
    }

    /// Create a parameter with a preset raw value.
    #[must_use]
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = value.into();
        self
    }

    /// External (flag and environment) name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Fail with [`ConfigError::EmptyValue`] when the raw value is empty.
    pub(crate) fn ensure_not_empty(&self) -> ConfigResult<()> {
        if self.value.is_empty() {
            return Err(ConfigError::empty(&self.name));
        }
        Ok(())
    }
}

impl ParameterInfo for StringParameter {
    fn base(&self) -> &StringParameter {
        self
    }

    fn base_mut(&mut self) -> &mut StringParameter {
        self
    }

    fn validate(&mut self) -> ConfigResult<()> {
        self.ensure_not_empty()
    }
}
