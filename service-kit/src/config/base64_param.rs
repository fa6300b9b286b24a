//! Base64-encoded secret parameter.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use secrecy::{ExposeSecret, SecretSlice};

use super::error::{ConfigError, ConfigResult};
use super::string::{ParameterInfo, StringParameter};

/// Standard base64-encoded parameter, typically key material.
///
/// The decoded bytes are kept in a [`SecretSlice`] so they never show up in
/// debug output.
#[derive(Debug, Default)]
pub struct Base64Parameter {
    base: StringParameter,
    decoded: Option<SecretSlice<u8>>,
}

impl Base64Parameter {
    /// Create an empty base64 parameter with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            base: StringParameter::new(name),
            decoded: None,
        }
    }

    /// Decoded bytes. Empty before validation.
    #[must_use]
    pub fn decoded_value(&self) -> &[u8] {
        self.decoded
            .as_ref()
            .map_or(&[][..], |decoded| decoded.expose_secret())
    }
}

impl ParameterInfo for Base64Parameter {
    fn base(&self) -> &StringParameter {
        &self.base
    }

    fn base_mut(&mut self) -> &mut StringParameter {
        &mut self.base
    }

    fn validate(&mut self) -> ConfigResult<()> {
        self.base.ensure_not_empty()?;

        let decoded = STANDARD
            .decode(self.base.value())
            .map_err(|source| ConfigError::IncorrectBase64 {
                name: self.base.name().to_string(),
                source,
            })?;
        self.decoded = Some(SecretSlice::from(decoded));

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::error::ErrorKind;

    #[test]
    fn test_empty_value_fails() {
        let err = Base64Parameter::new("PRIVATE_KEY").validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyValue);
    }

    #[test]
    fn test_invalid_base64_fails() {
        let mut param = Base64Parameter::new("PRIVATE_KEY");
        param.set_value("not base64!".to_string());
        let err = param.validate().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::IncorrectFormat);
        assert!(param.decoded_value().is_empty());
    }

    #[test]
    fn test_valid_base64_decodes() {
        let mut param = Base64Parameter::new("PRIVATE_KEY");
        param.set_value("c2VjcmV0".to_string());
        param.validate().unwrap();
        assert_eq!(param.decoded_value(), b"secret");
    }

    #[test]
    fn test_debug_output_redacts_decoded_bytes() {
        let mut param = Base64Parameter::new("PRIVATE_KEY");
        param.set_value("c2VjcmV0".to_string());
        param.validate().unwrap();
        assert!(!format!("{param:?}").contains("115, 101"));
    }
}
