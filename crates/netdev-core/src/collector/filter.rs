//! Device inclusion/exclusion policy.

use regex::Regex;

use crate::collector::error::CollectError;

/// Operator-supplied filter patterns, as read from configuration.
///
/// Empty strings count as unset. At most one of the two may be set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterConfig {
    /// Devices matching this pattern are skipped.
    pub ignore: Option<String>,
    /// Only devices matching this pattern are kept.
    pub accept: Option<String>,
}

impl FilterConfig {
    /// Filter that drops devices matching `pattern`.
    pub fn ignore(pattern: impl Into<String>) -> Self {
        Self {
            ignore: Some(pattern.into()),
            accept: None,
        }
    }

    /// Filter that keeps only devices matching `pattern`.
    pub fn accept(pattern: impl Into<String>) -> Self {
        Self {
            ignore: None,
            accept: Some(pattern.into()),
        }
    }
}

/// Compiled filter, immutable after construction.
///
/// Shared read-only by every collection cycle.
#[derive(Debug, Clone, Default)]
pub struct DeviceFilter {
    ignore: Option<Regex>,
    accept: Option<Regex>,
}

impl DeviceFilter {
    /// Compiles the configured patterns.
    ///
    /// Fails with [`CollectError::Config`] if both patterns are set or if
    /// either does not compile.
    pub fn new(config: &FilterConfig) -> Result<Self, CollectError> {
        let ignore = non_empty(config.ignore.as_deref());
        let accept = non_empty(config.accept.as_deref());

        if ignore.is_some() && accept.is_some() {
            return Err(CollectError::Config(
                "device-ignore and device-accept are mutually exclusive".to_string(),
            ));
        }

        Ok(Self {
            ignore: ignore.map(|p| compile("device-ignore", p)).transpose()?,
            accept: accept.map(|p| compile("device-accept", p)).transpose()?,
        })
    }

    /// Returns `true` if `name` must not be reported.
    pub fn ignored(&self, name: &str) -> bool {
        if let Some(ignore) = &self.ignore {
            ignore.is_match(name)
        } else if let Some(accept) = &self.accept {
            !accept.is_match(name)
        } else {
            false
        }
    }
}

fn non_empty(pattern: Option<&str>) -> Option<&str> {
    pattern.filter(|p| !p.is_empty())
}

fn compile(flag: &str, pattern: &str) -> Result<Regex, CollectError> {
    Regex::new(pattern)
        .map_err(|e| CollectError::Config(format!("invalid {} pattern: {}", flag, e)))
}
