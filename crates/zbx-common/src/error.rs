//! Configuration error types

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while loading or interpreting the connection config
#[derive(Debug, Error)]
pub enum ConfigurationError {
    /// The config file does not exist
    #[error("Configuration file not found: {}", path.display())]
    NotFound { path: PathBuf },

    /// The config file exists but could not be read
    #[error("Failed to read configuration file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A non-comment line lacks the `=` delimiter
    #[error("Malformed configuration line {line}: expected key=value")]
    MalformedLine { line: usize },

    /// A required key is absent
    #[error("Missing required configuration key '{key}'")]
    MissingKey { key: String },

    /// A key is present but its value cannot be used
    #[error("Invalid value for '{key}': {reason}")]
    InvalidValue { key: String, reason: String },
}

impl ConfigurationError {
    /// Create a missing key error
    pub fn missing_key(key: impl Into<String>) -> Self {
        Self::MissingKey { key: key.into() }
    }

    /// Create an invalid value error
    pub fn invalid_value(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for configuration operations
pub type Result<T> = std::result::Result<T, ConfigurationError>;
