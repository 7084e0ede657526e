//! Configuration export handler

use crate::cli::{resolve_kinds, Args};
use crate::error::Result;
use crate::export::{
    export_types, write_archive, ExportRequest, IntermediateFiles, TIMESTAMP_FORMAT,
};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use zbx_common::ConnectionConfig;
use zbx_sdk::{ClientBuilder, ObjectKind, ZabbixClient};

/// What a run produced
#[derive(Debug, Default)]
pub struct ExportSummary {
    /// Kinds that were attempted
    pub attempted: usize,
    /// Files written by the run; deleted again when they went into an archive
    pub written: Vec<PathBuf>,
    /// Kinds that produced no file
    pub failed: Vec<ObjectKind>,
    /// The archive, when `--zip` was given and something was exported
    pub archive: Option<PathBuf>,
}

/// Handle the export command
///
/// Configuration problems fail before any network call. Per-kind failures are logged and
/// do not affect the result.
pub async fn handle_export(args: &Args) -> Result<ExportSummary> {
    let config_path = args.config_path();
    let config = ConnectionConfig::load(&config_path).await.map_err(|e| {
        error!("{}", e);
        e
    })?;

    if let Err(e) = config.token() {
        error!("No authentication token is provided in configuration file");
        return Err(e.into());
    }

    let client = connect(&config).await?;

    let dir = args.output_dir();
    ensure_dir(&dir).await?;

    let timestamp = chrono::Local::now().format(TIMESTAMP_FORMAT).to_string();
    let request = ExportRequest {
        dir: dir.clone(),
        format: args.format,
        timestamp: timestamp.clone(),
        timestamped: !args.zip,
    };

    // Dropped on every return path below, deleting whatever was registered
    let mut intermediates = IntermediateFiles::new();

    let kinds = resolve_kinds(&args.types);
    let outcome = export_types(&client, &kinds, &request).await;

    let mut archive = None;
    if args.zip {
        for path in &outcome.written {
            intermediates.register(path);
        }
        if !intermediates.is_empty() {
            archive = Some(write_archive(&dir, &timestamp, intermediates.paths())?);
        }
    }

    Ok(ExportSummary {
        attempted: kinds.len(),
        written: outcome.written,
        failed: outcome.failed,
        archive,
    })
}

/// Build the API client from the connection config and negotiate token placement
async fn connect(config: &ConnectionConfig) -> Result<ZabbixClient> {
    let mut builder = ClientBuilder::new()
        .endpoint(config.endpoint()?)
        .token(config.token()?)
        .accept_invalid_certs(!config.validate_certs()?);

    if let Some(timeout) = config.timeout()? {
        builder = builder.timeout(timeout);
    }

    let mut client = builder.build()?;

    match client.detect_auth_mode().await {
        Ok(version) => info!("Connected to Zabbix API {} at {}", version, client.endpoint()),
        Err(e) => warn!(
            "Could not determine the Zabbix API version, assuming 6.4 or later: {}",
            e
        ),
    }

    Ok(client)
}

async fn ensure_dir(path: &Path) -> Result<()> {
    if !path.is_dir() {
        tokio::fs::create_dir_all(path).await?;
        info!("Created directory '{}'", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn args(config: &Path, dir: &Path, extra: &[&str]) -> Args {
        let mut argv = vec![
            "zbx-export".to_string(),
            "-c".to_string(),
            config.display().to_string(),
            "-d".to_string(),
            dir.display().to_string(),
        ];
        argv.extend(extra.iter().map(|s| s.to_string()));
        Args::try_parse_from(argv).unwrap()
    }

    async fn mount_result(server: &MockServer, rpc_method: &str, result: serde_json::Value) {
        Mock::given(method("POST"))
            .and(body_partial_json(json!({"method": rpc_method})))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "result": result,
                "id": 1
            })))
            .mount(server)
            .await;
    }

    #[tokio::test]
    async fn test_zip_summary_names_archive_and_removes_intermediates() {
        let server = MockServer::start().await;
        mount_result(&server, "apiinfo.version", json!("6.0.20")).await;
        mount_result(&server, "map.get", json!([{"sysmapid": "1"}])).await;
        mount_result(&server, "configuration.export", json!("maps: []")).await;

        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("zbx_config.ini");
        std::fs::write(&config, format!("url={}\ntoken=abc\n", server.uri())).unwrap();
        let out = dir.path().join("out");

        let summary = handle_export(&args(&config, &out, &["-t", "maps", "-z"]))
            .await
            .unwrap();

        assert_eq!(summary.attempted, 1);
        assert!(summary.failed.is_empty());
        assert_eq!(summary.written, vec![out.join("zbx_maps.yaml")]);

        let archive = summary.archive.unwrap();
        assert!(archive.exists());
        assert!(!out.join("zbx_maps.yaml").exists());
    }

    #[tokio::test]
    async fn test_zip_without_exports_creates_no_archive() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "jsonrpc": "2.0",
                "error": {"code": -32602, "message": "Invalid params.", "data": "No permissions."},
                "id": 1
            })))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().unwrap();
        let config = dir.path().join("zbx_config.ini");
        std::fs::write(&config, format!("url={}\ntoken=abc\n", server.uri())).unwrap();
        let out = dir.path().join("out");

        let summary = handle_export(&args(&config, &out, &["-t", "all", "-z"]))
            .await
            .unwrap();

        assert_eq!(summary.attempted, ObjectKind::ALL.len());
        assert_eq!(summary.failed, ObjectKind::ALL.to_vec());
        assert!(summary.archive.is_none());
        assert_eq!(std::fs::read_dir(&out).unwrap().count(), 0);
    }
}
