//! Wire types and the static object kind table

use serde::{Deserialize, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Configuration object kinds that can be exported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Host,
    HostGroup,
    Map,
    Image,
    MediaType,
    TemplateGroup,
    Template,
}

impl ObjectKind {
    /// Every kind in table order
    pub const ALL: [ObjectKind; 7] = [
        ObjectKind::Host,
        ObjectKind::HostGroup,
        ObjectKind::Map,
        ObjectKind::Image,
        ObjectKind::MediaType,
        ObjectKind::TemplateGroup,
        ObjectKind::Template,
    ];

    /// Short name used on the command line and in file names
    pub fn name(self) -> &'static str {
        match self {
            Self::Host => "hosts",
            Self::HostGroup => "hostgroups",
            Self::Map => "maps",
            Self::Image => "images",
            Self::MediaType => "mediatypes",
            Self::TemplateGroup => "templategroups",
            Self::Template => "templates",
        }
    }

    /// Remote API object name
    pub fn object(self) -> &'static str {
        match self {
            Self::Host => "host",
            Self::HostGroup => "hostgroup",
            Self::Map => "map",
            Self::Image => "image",
            Self::MediaType => "mediatype",
            Self::TemplateGroup => "templategroup",
            Self::Template => "template",
        }
    }

    /// Field carrying the object's unique identifier
    pub fn id_field(self) -> &'static str {
        match self {
            Self::Host => "hostid",
            Self::HostGroup | Self::TemplateGroup => "groupid",
            Self::Map => "sysmapid",
            Self::Image => "imageid",
            Self::MediaType => "mediatypeid",
            Self::Template => "templateid",
        }
    }

    /// Key of the ID list in `configuration.export` options
    pub fn export_option(self) -> &'static str {
        match self {
            Self::Host => "hosts",
            Self::HostGroup => "host_groups",
            Self::Map => "maps",
            Self::Image => "images",
            Self::MediaType => "mediaTypes",
            Self::TemplateGroup => "template_groups",
            Self::Template => "templates",
        }
    }

    /// The `<object>.get` method name
    pub fn get_method(self) -> &'static str {
        match self {
            Self::Host => "host.get",
            Self::HostGroup => "hostgroup.get",
            Self::Map => "map.get",
            Self::Image => "image.get",
            Self::MediaType => "mediatype.get",
            Self::TemplateGroup => "templategroup.get",
            Self::Template => "template.get",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.object())
    }
}

impl FromStr for ObjectKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name() == s)
            .ok_or_else(|| format!("unknown object type '{s}'"))
    }
}

/// Serialization format requested from `configuration.export`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    #[default]
    Yaml,
    Xml,
    Json,
}

impl ExportFormat {
    /// Wire name, also used as the file extension
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Yaml => "yaml",
            Self::Xml => "xml",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the API token travels with authenticated requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AuthMode {
    /// `Authorization: Bearer <token>` header (Zabbix 6.4+)
    #[default]
    Header,
    /// `auth` member of the request body (before 6.4)
    Body,
}

impl AuthMode {
    /// Pick the mode supported by a server version string such as `"6.0.25"`
    ///
    /// Unparseable versions get the header mode.
    pub fn for_version(version: &str) -> Self {
        let mut parts = version.trim().split('.').map(|p| p.parse::<u32>());
        match (parts.next(), parts.next()) {
            (Some(Ok(major)), Some(Ok(minor))) if (major, minor) < (6, 4) => Self::Body,
            _ => Self::Header,
        }
    }
}

/// The `auth` member of a request envelope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthField<'a> {
    /// Member not sent
    Omitted,
    /// Sent as `null`
    Null,
    /// Sent as the token string
    Token(&'a str),
}

impl AuthField<'_> {
    fn is_omitted(&self) -> bool {
        matches!(self, Self::Omitted)
    }
}

impl Serialize for AuthField<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Token(token) => serializer.serialize_str(token),
            Self::Omitted | Self::Null => serializer.serialize_none(),
        }
    }
}

/// JSON-RPC 2.0 request envelope
#[derive(Debug, Serialize)]
pub struct RpcRequest<'a, P> {
    pub jsonrpc: &'static str,
    pub method: &'a str,
    pub params: P,
    pub id: u64,
    #[serde(skip_serializing_if = "AuthField::is_omitted")]
    pub auth: AuthField<'a>,
}

impl<'a, P> RpcRequest<'a, P> {
    pub fn new(method: &'a str, params: P, id: u64, auth: AuthField<'a>) -> Self {
        Self {
            jsonrpc: "2.0",
            method,
            params,
            id,
            auth,
        }
    }
}

/// JSON-RPC 2.0 response envelope
#[derive(Debug, Deserialize)]
pub struct RpcResponse<T> {
    pub result: Option<T>,
    pub error: Option<RpcErrorBody>,
    pub id: Option<serde_json::Value>,
}

/// Error member of a JSON-RPC response
#[derive(Debug, Clone, Deserialize)]
pub struct RpcErrorBody {
    pub code: i64,
    pub message: String,
    #[serde(default)]
    pub data: Option<String>,
}

/// Parameters of `user.login`
#[derive(Debug, Serialize)]
pub struct LoginParams<'a> {
    pub username: &'a str,
    pub password: &'a str,
}

/// Parameters of `<object>.get` when only identifiers are wanted
#[derive(Debug, Serialize)]
pub struct IdQuery {
    pub output: [&'static str; 1],
}

/// Parameters of `configuration.export`
#[derive(Debug, Serialize)]
pub struct ExportParams<'a> {
    pub options: std::collections::BTreeMap<&'static str, &'a [String]>,
    pub format: ExportFormat,
    pub prettyprint: bool,
}
