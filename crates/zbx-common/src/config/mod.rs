//! Connection configuration for the Zabbix export tools
//!
//! The config file is a flat list of `key=value` lines:
//!
//! ```text
//! # Zabbix frontend
//! url = "https://zabbix.example.com"
//! token = "8a9f...e21"
//! validate_certs = false
//! ```
//!
//! Blank lines and lines starting with `#` are ignored. Keys and values may be wrapped in
//! single or double quotes. When a key repeats, the last occurrence wins.

use crate::error::{ConfigurationError, Result};
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};

/// Path of the JSON-RPC endpoint below the frontend root
pub const API_PATH: &str = "api_jsonrpc.php";

/// Key holding the pre-issued API token
pub const TOKEN_KEY: &str = "token";

/// Keys whose values never appear in debug output
const SECRET_KEYS: &[&str] = &[TOKEN_KEY, "password"];

/// Parsed `key=value` connection parameters
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ConnectionConfig {
    entries: HashMap<String, String>,
}

impl ConnectionConfig {
    /// Load configuration from a file
    pub async fn load(path: &Path) -> Result<Self> {
        debug!("Loading configuration from: {}", path.display());

        if !path.exists() {
            return Err(ConfigurationError::NotFound {
                path: path.to_path_buf(),
            });
        }

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|source| ConfigurationError::Read {
                path: path.to_path_buf(),
                source,
            })?;

        let config = Self::parse(&content)?;
        if config.is_empty() {
            warn!("Configuration file {} has no entries", path.display());
        } else {
            debug!("Loaded {} configuration entries", config.len());
        }
        Ok(config)
    }

    /// Parse configuration text
    pub fn parse(content: &str) -> Result<Self> {
        let mut entries = HashMap::new();

        for (index, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (key, value) = line
                .split_once('=')
                .ok_or(ConfigurationError::MalformedLine { line: index + 1 })?;

            entries.insert(unquote(key).to_string(), unquote(value).to_string());
        }

        Ok(Self { entries })
    }

    /// Get a raw value by key
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the config holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The pre-issued API token
    pub fn token(&self) -> Result<&str> {
        self.get(TOKEN_KEY)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| ConfigurationError::missing_key(TOKEN_KEY))
    }

    /// Resolve the JSON-RPC endpoint URL
    ///
    /// `url` takes precedence. Without it the endpoint is assembled from `server`, `port`
    /// and `tls`.
    pub fn endpoint(&self) -> Result<String> {
        if let Some(url) = self.get("url") {
            return normalize_url(url);
        }

        let server = self
            .get("server")
            .ok_or_else(|| ConfigurationError::missing_key("url"))?;

        let port = match self.get("port") {
            Some(port) => Some(port.parse::<u16>().map_err(|e| {
                ConfigurationError::invalid_value("port", e.to_string())
            })?),
            None => None,
        };

        let tls = match self.get("tls") {
            Some(value) => parse_flag("tls", value)?,
            None => false,
        };

        api_endpoint(server, port, tls)
    }

    /// Whether TLS certificates must be verified (default: true)
    pub fn validate_certs(&self) -> Result<bool> {
        match self.get("validate_certs") {
            Some(value) => parse_flag("validate_certs", value),
            None => Ok(true),
        }
    }

    /// Per-request timeout, if configured
    pub fn timeout(&self) -> Result<Option<Duration>> {
        self.get("timeout")
            .map(|value| {
                value
                    .parse::<u64>()
                    .map(Duration::from_secs)
                    .map_err(|e| ConfigurationError::invalid_value("timeout", e.to_string()))
            })
            .transpose()
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keys: Vec<&String> = self.entries.keys().collect();
        keys.sort();

        let mut map = f.debug_map();
        for key in keys {
            if SECRET_KEYS.contains(&key.as_str()) {
                map.entry(key, &"<redacted>");
            } else {
                map.entry(key, &self.entries[key]);
            }
        }
        map.finish()
    }
}

/// Build the JSON-RPC endpoint for a server address
pub fn api_endpoint(server: &str, port: Option<u16>, tls: bool) -> Result<String> {
    let server = server.trim().trim_end_matches('/');
    if server.is_empty() {
        return Err(ConfigurationError::invalid_value(
            "server",
            "server address is empty",
        ));
    }

    let base = if server.contains("://") {
        server.to_string()
    } else {
        let scheme = if tls { "https" } else { "http" };
        format!("{scheme}://{}", bracket_ipv6(server))
    };

    let base = match port {
        Some(port) => format!("{base}:{port}"),
        None => base,
    };

    normalize_url(&base)
}

/// Bare IPv6 literals need brackets before a port can follow them
fn bracket_ipv6(host: &str) -> Cow<'_, str> {
    if host.contains(':') && !host.starts_with('[') {
        Cow::Owned(format!("[{host}]"))
    } else {
        Cow::Borrowed(host)
    }
}

/// Add a default scheme and the API path to a frontend URL
fn normalize_url(raw: &str) -> Result<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Err(ConfigurationError::invalid_value("url", "URL is empty"));
    }

    let mut endpoint = if trimmed.contains("://") {
        trimmed.to_string()
    } else {
        format!("http://{trimmed}")
    };

    if !endpoint.ends_with(API_PATH) {
        endpoint.push('/');
        endpoint.push_str(API_PATH);
    }

    url::Url::parse(&endpoint)
        .map_err(|e| ConfigurationError::invalid_value("url", e.to_string()))?;

    Ok(endpoint)
}

fn unquote(raw: &str) -> &str {
    raw.trim().trim_matches(|c| c == '"' || c == '\'')
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(ConfigurationError::invalid_value(
            key,
            format!("expected a boolean, got '{other}'"),
        )),
    }
}
