//! Error types for the Zabbix export CLI

use color_eyre::eyre::{eyre, Report};
use thiserror::Error;

/// CLI error type with minimal variants
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration file issues
    #[error("Configuration error: {0}")]
    Config(#[from] zbx_common::ConfigurationError),

    /// API communication errors
    #[error("API error: {0}")]
    Api(#[from] zbx_sdk::ApiError),

    /// Local file system errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Archive creation errors
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),

    /// Everything else (using color-eyre's Report for rich errors)
    #[error(transparent)]
    Internal(#[from] Report),
}

impl CliError {
    /// Create an internal error from a message
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal(eyre!(message.into()))
    }
}

/// Result type alias for CLI operations
pub type Result<T> = std::result::Result<T, CliError>;
