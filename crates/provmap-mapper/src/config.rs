//! Mapper configuration
//!
//! Loaded from TOML or from `PROVMAP_*` environment variables:
//!
//! ```toml
//! fail_fast = false
//! max_errors = 50
//! trace_fields = true
//! ```

use serde::{Deserialize, Serialize};

/// Environment variable for [`MapperConfig::fail_fast`]
pub const ENV_FAIL_FAST: &str = "PROVMAP_FAIL_FAST";
/// Environment variable for [`MapperConfig::max_errors`]
pub const ENV_MAX_ERRORS: &str = "PROVMAP_MAX_ERRORS";
/// Environment variable for [`MapperConfig::trace_fields`]
pub const ENV_TRACE_FIELDS: &str = "PROVMAP_TRACE_FIELDS";

/// Configuration loading errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML text could not be parsed into a config
    #[error("invalid mapper config: {0}")]
    Toml(#[from] toml::de::Error),

    /// An environment variable holds a value of the wrong form
    #[error("invalid value {value:?} for {var}: expected {expected}")]
    InvalidEnv {
        /// Variable name
        var: &'static str,
        /// Raw value
        value: String,
        /// Accepted form
        expected: &'static str,
    },
}

/// Result type alias for config loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Mapper configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MapperConfig {
    /// Stop after the first field error of a call
    pub fail_fast: bool,
    /// Cap on errors reported by one call
    pub max_errors: Option<usize>,
    /// Emit a trace event per resolved field
    pub trace_fields: bool,
}

impl MapperConfig {
    /// Create default configuration
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// With fail-fast
    #[inline]
    #[must_use]
    pub fn with_fail_fast(mut self, fail_fast: bool) -> Self {
        self.fail_fast = fail_fast;
        self
    }

    /// With error cap
    #[inline]
    #[must_use]
    pub fn with_max_errors(mut self, max: usize) -> Self {
        self.max_errors = Some(max);
        self
    }

    /// With per-field tracing
    #[inline]
    #[must_use]
    pub fn with_trace_fields(mut self, trace: bool) -> Self {
        self.trace_fields = trace;
        self
    }

    /// Parse TOML; missing keys keep their defaults
    ///
    /// # Errors
    /// Returns [`ConfigError::Toml`] on malformed TOML or unknown keys.
    pub fn from_toml_str(text: &str) -> ConfigResult<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Defaults overridden by `PROVMAP_*` environment variables
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidEnv`] when a variable cannot be parsed.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Defaults overridden through an arbitrary variable lookup
    ///
    /// # Errors
    /// Returns [`ConfigError::InvalidEnv`] when a variable cannot be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<Self> {
        let mut config = Self::default();
        if let Some(value) = lookup(ENV_FAIL_FAST) {
            config.fail_fast = parse_bool(ENV_FAIL_FAST, value)?;
        }
        if let Some(value) = lookup(ENV_MAX_ERRORS) {
            config.max_errors = match value.trim() {
                "" | "none" => None,
                raw => Some(raw.parse().map_err(|_| ConfigError::InvalidEnv {
                    var: ENV_MAX_ERRORS,
                    value: value.clone(),
                    expected: "a non-negative integer or \"none\"",
                })?),
            };
        }
        if let Some(value) = lookup(ENV_TRACE_FIELDS) {
            config.trace_fields = parse_bool(ENV_TRACE_FIELDS, value)?;
        }
        Ok(config)
    }
}

impl Default for MapperConfig {
    fn default() -> Self {
        Self {
            fail_fast: false,
            max_errors: None,
            trace_fields: true,
        }
    }
}

fn parse_bool(var: &'static str, value: String) -> ConfigResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidEnv {
            var,
            value,
            expected: "a boolean",
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |var| vars.get(var).cloned()
    }

    #[test]
    fn defaults() {
        let config = MapperConfig::default();
        assert!(!config.fail_fast);
        assert_eq!(config.max_errors, None);
        assert!(config.trace_fields);
    }

    #[test]
    fn builder() {
        let config = MapperConfig::new()
            .with_fail_fast(true)
            .with_max_errors(5)
            .with_trace_fields(false);
        assert!(config.fail_fast);
        assert_eq!(config.max_errors, Some(5));
        assert!(!config.trace_fields);
    }

    #[test]
    fn toml_partial() {
        let config = MapperConfig::from_toml_str("max_errors = 3\n").unwrap();
        assert_eq!(config, MapperConfig::default().with_max_errors(3));
        assert!(MapperConfig::from_toml_str("colour = 1").is_err());
        assert!(MapperConfig::from_toml_str("fail_fast = \"sometimes\"").is_err());
    }

    #[test]
    fn env_overrides() {
        let config = MapperConfig::from_lookup(lookup(&[
            (ENV_FAIL_FAST, "TRUE"),
            (ENV_MAX_ERRORS, "10"),
            (ENV_TRACE_FIELDS, "off"),
        ]))
        .unwrap();
        assert!(config.fail_fast);
        assert_eq!(config.max_errors, Some(10));
        assert!(!config.trace_fields);

        let config = MapperConfig::from_lookup(lookup(&[(ENV_MAX_ERRORS, "none")])).unwrap();
        assert_eq!(config.max_errors, None);
    }

    #[test]
    fn env_rejects_garbage() {
        let err = MapperConfig::from_lookup(lookup(&[(ENV_FAIL_FAST, "maybe")])).unwrap_err();
        assert!(err.to_string().contains(ENV_FAIL_FAST));
        assert!(MapperConfig::from_lookup(lookup(&[(ENV_MAX_ERRORS, "-1")])).is_err());
    }
}
