//! Error types for the Zabbix API client

use crate::types::ObjectKind;
use thiserror::Error;

/// Errors returned by [`crate::ZabbixClient`]
#[derive(Debug, Error)]
pub enum ApiError {
    /// Transport failure (connect, TLS, timeout, body read)
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Non-success HTTP status from the frontend
    #[error("Request failed with status {status}: {body}")]
    Http { status: u16, body: String },

    /// JSON-RPC error object returned by the server
    #[error("API error {code}: {message}{}", rpc_detail(.data))]
    Rpc {
        code: i64,
        message: String,
        data: Option<String>,
    },

    /// Well-formed JSON that does not match the expected shape
    #[error("Invalid response: {message}")]
    InvalidResponse { message: String },

    /// Request body or response could not be (de)serialized
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An authenticated call was attempted without a token
    #[error("Authentication required: {message}")]
    MissingAuthentication { message: String },

    /// Invalid client construction or request
    #[error("Invalid request: {message}")]
    InvalidRequest { message: String },

    /// Export of one object kind failed
    #[error("Failed to export '{kind}' objects: {source}")]
    Export {
        kind: ObjectKind,
        #[source]
        source: Box<ApiError>,
    },
}

impl ApiError {
    /// Wrap an error with the object kind being exported
    pub fn export(kind: ObjectKind, source: ApiError) -> Self {
        Self::Export {
            kind,
            source: Box::new(source),
        }
    }

    /// Create an invalid response error
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
            message: message.into(),
        }
    }

    /// The object kind this error belongs to, if any
    pub fn kind(&self) -> Option<ObjectKind> {
        match self {
            Self::Export { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

fn rpc_detail(data: &Option<String>) -> String {
    data.as_deref().map(|d| format!(" ({d})")).unwrap_or_default()
}

/// Result type alias
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_export_error_names_kind_and_cause() {
        let err = ApiError::export(
            ObjectKind::Map,
            ApiError::Rpc {
                code: -32602,
                message: "Invalid params.".into(),
                data: Some("No permissions to referred object.".into()),
            },
        );

        assert_eq!(err.kind(), Some(ObjectKind::Map));
        let message = err.to_string();
        assert!(message.starts_with("Failed to export 'map' objects: API error -32602: "));
        assert!(message.ends_with("Invalid params. (No permissions to referred object.)"));
    }
}
