//! # zbx-common
//!
//! Pieces shared by the Zabbix export binaries:
//! - the flat `key=value` connection config loader
//! - configuration error types
//! - unified logging initialization

pub mod config;
pub mod error;
pub mod logging;

pub use config::ConnectionConfig;
pub use error::{ConfigurationError, Result};
