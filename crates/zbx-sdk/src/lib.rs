//! # zbx-sdk
//!
//! A small JSON-RPC 2.0 client for the Zabbix API covering what the export tools need:
//! version discovery, login, object ID listing and configuration export.
//!
//! ```rust,no_run
//! use zbx_sdk::{ClientBuilder, ExportFormat, ObjectKind};
//!
//! # async fn example() -> zbx_sdk::Result<()> {
//! let mut client = ClientBuilder::default()
//!     .endpoint("https://zabbix.example.com/api_jsonrpc.php")
//!     .token("8a9f...e21")
//!     .build()?;
//!
//! client.detect_auth_mode().await?;
//! let yaml = client.export(ObjectKind::Host, ExportFormat::Yaml).await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod error;
pub mod types;

pub use client::{ClientBuilder, ZabbixClient, DEFAULT_TIMEOUT_SECS};
pub use error::{ApiError, Result};
pub use types::{AuthMode, ExportFormat, ObjectKind};
