//! Error types for Tempus.

use thiserror::Error;

/// Errors raised by timelines, stores and configuration loading.
///
/// A missing value is never an error: lookups return `Option`.
#[derive(Debug, Error)]
pub enum TempusError {
    /// A timeline was asked to open or close a window out of sequence, or was
    /// handed a window that cannot be stored.
    #[error("Invalid time window: {0}")]
    InvalidTimeWindow(String),

    /// A write was older than every window a capped history retains.
    #[error("Write outside retained history: {0}")]
    OutsideHistory(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Failed to parse configuration: {0}")]
    ConfigParse(String),
}

pub type Result<T> = std::result::Result<T, TempusError>;

impl From<serde_json::Error> for TempusError {
    fn from(err: serde_json::Error) -> Self {
        TempusError::ConfigParse(err.to_string())
    }
}

#[cfg(feature = "toml")]
impl From<toml::de::Error> for TempusError {
    fn from(err: toml::de::Error) -> Self {
        TempusError::ConfigParse(err.to_string())
    }
}
