//! Configuration for Tempus attribute stores
//!
//! Settings are plain serde types so they can be loaded from JSON or, with the
//! `toml` feature, from TOML.

use crate::error::{Result, TempusError};
use serde::{Deserialize, Serialize};

/// Attribute store configuration
///
/// # Example
///
/// ```rust
/// use tempus::Config;
///
/// let config = Config::default();
/// assert!(config.report_unknown_keys);
///
/// let json = r#"{
///     "report_unknown_keys": false,
///     "history_capacity": 64
/// }"#;
/// let config = Config::from_json(json).unwrap();
/// assert_eq!(config.history_capacity, Some(64));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Log lookups of attribute names that were never written
    #[serde(default = "Config::default_report_unknown_keys")]
    pub report_unknown_keys: bool,

    /// Number of attribute names to reserve room for up front
    #[serde(default = "Config::default_key_capacity")]
    pub key_capacity: usize,

    /// Maximum number of windows retained per attribute; the oldest windows
    /// are dropped first (None keeps the full history)
    #[serde(default)]
    pub history_capacity: Option<usize>,
}

impl Config {
    const fn default_report_unknown_keys() -> bool {
        true
    }

    const fn default_key_capacity() -> usize {
        0
    }

    pub fn with_report_unknown_keys(mut self, report: bool) -> Self {
        self.report_unknown_keys = report;
        self
    }

    pub fn with_key_capacity(mut self, capacity: usize) -> Self {
        self.key_capacity = capacity;
        self
    }

    /// Keep at most `capacity` windows per attribute.
    pub fn with_history_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "History capacity must be greater than zero");
        self.history_capacity = Some(capacity);
        self
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if let Some(capacity) = self.history_capacity
            && capacity == 0
        {
            return Err(TempusError::InvalidConfig(
                "History capacity must be greater than zero".to_string(),
            ));
        }

        Ok(())
    }

    /// Load configuration from JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration as JSON string
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Load configuration from TOML string (requires toml feature)
    #[cfg(feature = "toml")]
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        let config: Config = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration as TOML string (requires toml feature)
    #[cfg(feature = "toml")]
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| TempusError::ConfigParse(e.to_string()))
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            report_unknown_keys: Self::default_report_unknown_keys(),
            key_capacity: Self::default_key_capacity(),
            history_capacity: None,
        }
    }
}
