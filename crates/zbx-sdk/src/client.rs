//! JSON-RPC client for the Zabbix API
//!
//! Every call is an HTTP `POST` to the frontend's `api_jsonrpc.php` with
//! `Content-Type: application/json-rpc`.
//!
//! # Authentication
//!
//! Authenticated calls carry the pre-issued API token either as an
//! `Authorization: Bearer {token}` header (Zabbix 6.4 and later) or in the `auth` member of
//! the request body (older servers). [`ZabbixClient::detect_auth_mode`] asks the server for
//! its version and picks the right placement. `apiinfo.version` and `user.login` are always
//! sent without credentials.

use crate::{
    error::{ApiError, Result},
    types::{
        AuthField, AuthMode, ExportFormat, ExportParams, IdQuery, LoginParams, ObjectKind,
        RpcRequest, RpcResponse,
    },
};
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Response;
use serde::{de::DeserializeOwned, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;
use tracing::debug;

/// Default timeout in seconds for API requests
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Content type expected by the Zabbix frontend
const JSON_RPC_CONTENT_TYPE: &str = "application/json-rpc";

/// Request id used for `user.login`
const LOGIN_REQUEST_ID: u64 = 1;

/// HTTP client for interacting with the Zabbix API
pub struct ZabbixClient {
    http_client: reqwest::Client,
    endpoint: String,
    token: Option<String>,
    auth_mode: AuthMode,
    next_id: AtomicU64,
}

impl fmt::Debug for ZabbixClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ZabbixClient")
            .field("endpoint", &self.endpoint)
            .field("has_token", &self.token.is_some())
            .field("auth_mode", &self.auth_mode)
            .finish()
    }
}

impl ZabbixClient {
    /// The JSON-RPC endpoint URL
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Current token placement
    pub fn auth_mode(&self) -> AuthMode {
        self.auth_mode
    }

    // ===== Discovery & Login =====

    /// Server API version (`apiinfo.version`)
    pub async fn api_version(&self) -> Result<String> {
        self.call("apiinfo.version", serde_json::json!([]), AuthField::Omitted)
            .await
    }

    /// Query the server version and switch to the token placement it supports
    pub async fn detect_auth_mode(&mut self) -> Result<String> {
        let version = self.api_version().await?;
        self.auth_mode = AuthMode::for_version(&version);
        debug!(
            "Zabbix API version {}, using {:?} authentication",
            version, self.auth_mode
        );
        Ok(version)
    }

    /// Log in with a username and password, returning the session token
    pub async fn login(&self, username: &str, password: &str) -> Result<String> {
        let params = LoginParams { username, password };
        let request = RpcRequest::new("user.login", params, LOGIN_REQUEST_ID, AuthField::Null);
        self.send(&request, false).await
    }

    // ===== Configuration Export =====

    /// List the identifiers of every object of a kind
    pub async fn get_object_ids(&self, kind: ObjectKind) -> Result<Vec<String>> {
        let id_field = kind.id_field();
        let objects: Vec<HashMap<String, serde_json::Value>> = self
            .authenticated_call(kind.get_method(), IdQuery { output: [id_field] })
            .await?;

        objects
            .into_iter()
            .map(|object| match object.get(id_field) {
                Some(serde_json::Value::String(id)) => Ok(id.clone()),
                Some(serde_json::Value::Number(id)) => Ok(id.to_string()),
                _ => Err(ApiError::invalid_response(format!(
                    "{} entry without '{}'",
                    kind.get_method(),
                    id_field
                ))),
            })
            .collect()
    }

    /// Export the configuration of the given objects as a serialized string
    pub async fn export_configuration(
        &self,
        kind: ObjectKind,
        ids: &[String],
        format: ExportFormat,
    ) -> Result<String> {
        let mut options = BTreeMap::new();
        options.insert(kind.export_option(), ids);

        let params = ExportParams {
            options,
            format,
            prettyprint: true,
        };
        self.authenticated_call("configuration.export", params).await
    }

    /// Export every object of a kind
    ///
    /// Errors from either underlying call are wrapped in [`ApiError::Export`] naming the kind.
    pub async fn export(&self, kind: ObjectKind, format: ExportFormat) -> Result<String> {
        let ids = self
            .get_object_ids(kind)
            .await
            .map_err(|e| ApiError::export(kind, e))?;
        debug!("Found {} {} objects", ids.len(), kind);

        self.export_configuration(kind, &ids, format)
            .await
            .map_err(|e| ApiError::export(kind, e))
    }

    // ===== Private Helper Methods =====

    async fn authenticated_call<P: Serialize, T: DeserializeOwned>(
        &self,
        method: &str,
        params: P,
    ) -> Result<T> {
        let token = self
            .token
            .as_deref()
            .ok_or_else(|| ApiError::MissingAuthentication {
                message: format!("{method} requires an API token"),
            })?;

        match self.auth_mode {
            AuthMode::Header => {
                let request = RpcRequest::new(method, params, self.next_id(), AuthField::Omitted);
                self.send(&request, true).await
            }
            AuthMode::Body => {
                let request =
                    RpcRequest::new(method, params, self.next_id(), AuthField::Token(token));
                self.send(&request, false).await
            }
        }
    }

    async fn call<P: Serialize, T: DeserializeOwned>(
        &self,
        method: &str,
        params: P,
        auth: AuthField<'_>,
    ) -> Result<T> {
        let request = RpcRequest::new(method, params, self.next_id(), auth);
        self.send(&request, false).await
    }

    /// Post an envelope and unwrap the JSON-RPC result
    async fn send<P: Serialize, T: DeserializeOwned>(
        &self,
        request: &RpcRequest<'_, P>,
        bearer: bool,
    ) -> Result<T> {
        debug!("POST {} ({})", self.endpoint, request.method);

        let body = serde_json::to_vec(request)?;
        let mut builder = self
            .http_client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, JSON_RPC_CONTENT_TYPE)
            .body(body);

        if bearer {
            if let Some(token) = &self.token {
                builder = builder.header(AUTHORIZATION, format!("Bearer {token}"));
            }
        }

        let response = builder.send().await.map_err(ApiError::HttpClient)?;
        self.handle_response(response).await
    }

    /// Handle an HTTP response carrying a JSON-RPC envelope
    async fn handle_response<T: DeserializeOwned>(&self, response: Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Http {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await.map_err(ApiError::HttpClient)?;
        let envelope: RpcResponse<T> = serde_json::from_slice(&bytes)?;

        match (envelope.result, envelope.error) {
            (_, Some(error)) => Err(ApiError::Rpc {
                code: error.code,
                message: error.message,
                data: error.data,
            }),
            (Some(result), None) => Ok(result),
            (None, None) => Err(ApiError::invalid_response(
                "response carries neither result nor error",
            )),
        }
    }

    fn next_id(&self) -> u64 {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }
}

/// Builder for constructing a ZabbixClient with custom configuration
#[derive(Default)]
pub struct ClientBuilder {
    endpoint: Option<String>,
    token: Option<String>,
    auth_mode: AuthMode,
    timeout: Option<Duration>,
    accept_invalid_certs: bool,
}

impl ClientBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the JSON-RPC endpoint URL
    pub fn endpoint(mut self, url: impl Into<String>) -> Self {
        self.endpoint = Some(url.into());
        self
    }

    /// Set the API token used for authenticated calls
    pub fn token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    /// Set the token placement (normally chosen by `detect_auth_mode`)
    pub fn auth_mode(mut self, mode: AuthMode) -> Self {
        self.auth_mode = mode;
        self
    }

    /// Set the request timeout
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Skip TLS certificate verification
    pub fn accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    /// Build the client
    pub fn build(self) -> Result<ZabbixClient> {
        let endpoint = self.endpoint.ok_or_else(|| ApiError::InvalidRequest {
            message: "endpoint is required".into(),
        })?;

        let timeout = self
            .timeout
            .unwrap_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .danger_accept_invalid_certs(self.accept_invalid_certs)
            .build()
            .map_err(ApiError::HttpClient)?;

        Ok(ZabbixClient {
            http_client,
            endpoint,
            token: self.token,
            auth_mode: self.auth_mode,
            next_id: AtomicU64::new(LOGIN_REQUEST_ID),
        })
    }
}
