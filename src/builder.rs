//! Store builder for flexible configuration
//!
//! This module provides a builder pattern for creating attribute stores with
//! a tuned configuration.

use crate::config::Config;
use crate::error::Result;
use crate::store::AttributeStore;
use std::marker::PhantomData;
use tempus_types::value::Value;

/// Builder for [`AttributeStore`] configuration.
///
/// ```rust
/// use tempus::Tempus;
///
/// let attrs = Tempus::builder()
///     .key_capacity(16)
///     .history_capacity(128)
///     .report_unknown_keys(false)
///     .build()?;
///
/// assert_eq!(attrs.config().history_capacity, Some(128));
/// # Ok::<(), tempus::TempusError>(())
/// ```
#[derive(Debug)]
pub struct StoreBuilder<V = Value> {
    config: Config,
    _value: PhantomData<fn() -> V>,
}

impl<V> StoreBuilder<V> {
    /// Create a new builder with default configuration.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
            _value: PhantomData,
        }
    }

    /// Replace the whole configuration.
    pub fn config(mut self, config: Config) -> Self {
        self.config = config;
        self
    }

    pub fn report_unknown_keys(mut self, report: bool) -> Self {
        self.config = self.config.with_report_unknown_keys(report);
        self
    }

    /// Reserve room for `capacity` attribute names.
    pub fn key_capacity(mut self, capacity: usize) -> Self {
        self.config = self.config.with_key_capacity(capacity);
        self
    }

    /// Keep at most `capacity` windows per attribute.
    pub fn history_capacity(mut self, capacity: usize) -> Self {
        self.config = self.config.with_history_capacity(capacity);
        self
    }

    /// Validate the configuration and build the store.
    pub fn build(self) -> Result<AttributeStore<V>> {
        self.config.validate()?;
        Ok(AttributeStore::from_config(self.config))
    }
}

impl<V> Default for StoreBuilder<V> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TempusError;

    #[test]
    fn test_builder_defaults() {
        let store: AttributeStore = StoreBuilder::new().build().unwrap();
        assert_eq!(store.config(), &Config::default());
        assert!(store.is_empty());
    }

    #[test]
    fn test_builder_rejects_invalid_config() {
        let config = Config {
            history_capacity: Some(0),
            ..Config::default()
        };
        let err = StoreBuilder::<Value>::new().config(config).build().unwrap_err();
        assert!(matches!(err, TempusError::InvalidConfig(_)));
    }

    #[test]
    fn test_builder_generic_value() {
        let mut store = StoreBuilder::<String>::new()
            .history_capacity(1)
            .build()
            .unwrap();
        store.set_at("name", 0.0, "a").unwrap();
        store.set_at("name", 1.0, "b").unwrap();

        assert_eq!(store.history("name").len(), 1);
        assert_eq!(store.value_at("name", 1.0).map(String::as_str), Some("b"));
    }
}
