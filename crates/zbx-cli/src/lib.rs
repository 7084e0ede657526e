//! # zbx-cli
//!
//! Command-line tools for backing up Zabbix configuration.
//!
//! - `zbx-export` reads a `key=value` connection config, exports the selected object
//!   types through `configuration.export` and optionally bundles the files into a zip
//!   archive.
//! - `zbx-token` logs in with a username and password and prints the session token to put
//!   in the config file.

pub mod cli;
pub mod error;
pub mod export;

pub use cli::*;
pub use error::*;
