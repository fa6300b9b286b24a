//! URL configuration parameter.

use std::sync::LazyLock;

use regex::Regex;
use url::{ParseError, Url};

use super::error::{ConfigError, ConfigResult};
use super::string::{ParameterInfo, StringParameter};

static VERSION_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^(.*)/v[0-9]+(?:[/?#]|$)").expect("version suffix pattern is valid")
});

/// URL parameter. Absolute URLs and relative references are accepted.
#[derive(Debug, Clone, Default)]
pub struct UrlParameter {
    base: StringParameter,
    host: String,
}

impl UrlParameter {
    /// Create an empty URL parameter with the given name.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            base: StringParameter::new(name),
            host: String::new(),
        }
    }

    /// Host with its explicit port, if any. Empty before validation and for
    /// relative references.
    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// URL with its last `/v<N>` path segment and anything after it removed.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UrlNotVersioned`] if the value has no version segment.
    pub fn not_versioned_url(&self) -> ConfigResult<&str> {
        let value = self.base.value();
        VERSION_SUFFIX
            .captures(value)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
            .ok_or_else(|| ConfigError::UrlNotVersioned {
                value: value.to_string(),
            })
    }
}

impl ParameterInfo for UrlParameter {
    fn base(&self) -> &StringParameter {
        &self.base
    }

    fn base_mut(&mut self) -> &mut StringParameter {
        &mut self.base
    }

    fn validate(&mut self) -> ConfigResult<()> {
        self.base.ensure_not_empty()?;

        let value = self.base.value();
        self.host = match Url::parse(value) {
            Ok(url) => match (url.host_str(), url.port()) {
                (Some(host), Some(port)) => format!("{host}:{port}"),
                (Some(host), None) => host.to_string(),
                (None, _) => String::new(),
            },
            Err(ParseError::RelativeUrlWithoutBase) if !has_colon_in_first_segment(value) => {
                String::new()
            }
            Err(source) => {
                return Err(ConfigError::IncorrectUrl {
                    value: value.to_string(),
                    source,
                });
            }
        };

        Ok(())
    }
}

// A colon before the first `/` would be read as a scheme.
fn has_colon_in_first_segment(value: &str) -> bool {
    value
        .split(['/', '?', '#'])
        .next()
        .is_some_and(|segment| segment.contains(':'))
}
