//! Export orchestration
//!
//! Runs one export per selected object kind, writes each result to disk and reports which
//! kinds produced files. A failing kind is logged and skipped; it never stops the others.

pub mod archive;
pub mod cleanup;

pub use archive::{archive_file_name, write_archive};
pub use cleanup::IntermediateFiles;

use async_trait::async_trait;
use std::path::PathBuf;
use tracing::{debug, error};
use zbx_sdk::{ApiError, ExportFormat, ObjectKind, ZabbixClient};

/// Timestamp format used in output file names (`YYMMDDHHMM`)
pub const TIMESTAMP_FORMAT: &str = "%y%m%d%H%M";

/// Source of serialized configuration, one object kind at a time
#[async_trait]
pub trait ConfigurationSource: Send + Sync {
    /// Export every object of `kind` in `format`
    async fn export(&self, kind: ObjectKind, format: ExportFormat) -> Result<String, ApiError>;
}

#[async_trait]
impl ConfigurationSource for ZabbixClient {
    async fn export(&self, kind: ObjectKind, format: ExportFormat) -> Result<String, ApiError> {
        ZabbixClient::export(self, kind, format).await
    }
}

/// Where and how artifacts are written
#[derive(Debug, Clone)]
pub struct ExportRequest {
    pub dir: PathBuf,
    pub format: ExportFormat,
    pub timestamp: String,
    /// Append `_<timestamp>` to file names (off when the files get zipped)
    pub timestamped: bool,
}

impl ExportRequest {
    /// Output path for one kind
    pub fn artifact_path(&self, kind: ObjectKind) -> PathBuf {
        let suffix = self.timestamped.then_some(self.timestamp.as_str());
        self.dir.join(artifact_file_name(kind, self.format, suffix))
    }
}

/// Result of an orchestration pass
#[derive(Debug, Default)]
pub struct ExportOutcome {
    /// Files written, in export order
    pub written: Vec<PathBuf>,
    /// Kinds that produced no file
    pub failed: Vec<ObjectKind>,
}

/// File name of one artifact: `zbx_<type>[_<timestamp>].<format>`
pub fn artifact_file_name(
    kind: ObjectKind,
    format: ExportFormat,
    timestamp: Option<&str>,
) -> String {
    match timestamp {
        Some(ts) => format!("zbx_{}_{}.{}", kind.name(), ts, format),
        None => format!("zbx_{}.{}", kind.name(), format),
    }
}

/// Export each kind in order, writing one file per successful export
pub async fn export_types<S>(
    source: &S,
    kinds: &[ObjectKind],
    request: &ExportRequest,
) -> ExportOutcome
where
    S: ConfigurationSource + ?Sized,
{
    let mut outcome = ExportOutcome::default();

    for &kind in kinds {
        let data = match source.export(kind, request.format).await {
            Ok(data) => data,
            Err(e) => {
                let e = match e.kind() {
                    Some(_) => e,
                    None => ApiError::export(kind, e),
                };
                error!("{}", e);
                outcome.failed.push(kind);
                continue;
            }
        };

        let path = request.artifact_path(kind);
        match tokio::fs::write(&path, data).await {
            Ok(()) => {
                debug!("Wrote {} configuration to {}", kind, path.display());
                outcome.written.push(path);
            }
            Err(e) => {
                error!("Failed to write {}: {}", path.display(), e);
                outcome.failed.push(kind);
            }
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Canned exports; kinds without an entry fail
    #[derive(Default)]
    struct FakeSource {
        data: HashMap<ObjectKind, String>,
        calls: Mutex<Vec<ObjectKind>>,
    }

    impl FakeSource {
        fn with(mut self, kind: ObjectKind, data: &str) -> Self {
            self.data.insert(kind, data.to_string());
            self
        }

        fn calls(&self) -> Vec<ObjectKind> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ConfigurationSource for FakeSource {
        async fn export(
            &self,
            kind: ObjectKind,
            _format: ExportFormat,
        ) -> Result<String, ApiError> {
            self.calls.lock().unwrap().push(kind);
            self.data.get(&kind).cloned().ok_or(ApiError::Rpc {
                code: -32500,
                message: "Application error.".into(),
                data: Some("No permissions.".into()),
            })
        }
    }

    fn request(dir: &std::path::Path, timestamped: bool) -> ExportRequest {
        ExportRequest {
            dir: dir.to_path_buf(),
            format: ExportFormat::Json,
            timestamp: "2410191200".into(),
            timestamped,
        }
    }

    #[test]
    fn test_artifact_file_name() {
        assert_eq!(
            artifact_file_name(ObjectKind::Host, ExportFormat::Yaml, Some("2410191200")),
            "zbx_hosts_2410191200.yaml"
        );
        assert_eq!(
            artifact_file_name(ObjectKind::TemplateGroup, ExportFormat::Xml, None),
            "zbx_templategroups.xml"
        );
    }

    #[tokio::test]
    async fn test_one_attempt_per_kind_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let source = FakeSource::default()
            .with(ObjectKind::Template, "{}")
            .with(ObjectKind::Host, "{}")
            .with(ObjectKind::Map, "{}");

        let kinds = [ObjectKind::Template, ObjectKind::Host, ObjectKind::Map];
        let outcome = export_types(&source, &kinds, &request(dir.path(), true)).await;

        assert_eq!(source.calls(), kinds.to_vec());
        assert_eq!(outcome.written.len(), 3);
        assert!(outcome.failed.is_empty());
    }

    #[tokio::test]
    async fn test_failure_does_not_stop_later_kinds() {
        let dir = tempfile::tempdir().unwrap();
        let source = FakeSource::default().with(ObjectKind::Template, "templates: []");

        let outcome = export_types(
            &source,
            &[ObjectKind::Host, ObjectKind::Template],
            &request(dir.path(), true),
        )
        .await;

        assert_eq!(outcome.failed, vec![ObjectKind::Host]);
        assert_eq!(
            outcome.written,
            vec![dir.path().join("zbx_templates_2410191200.json")]
        );
        assert_eq!(
            std::fs::read_to_string(&outcome.written[0]).unwrap(),
            "templates: []"
        );
        assert!(!dir.path().join("zbx_hosts_2410191200.json").exists());
    }

    #[tokio::test]
    async fn test_untimestamped_names_for_zip_runs() {
        let dir = tempfile::tempdir().unwrap();
        let source = FakeSource::default().with(ObjectKind::Image, "{}");

        let request = request(dir.path(), false);
        let outcome = export_types(&source, &[ObjectKind::Image], &request).await;

        assert_eq!(outcome.written, vec![dir.path().join("zbx_images.json")]);
    }

    #[tokio::test]
    async fn test_write_failure_is_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let source = FakeSource::default()
            .with(ObjectKind::Host, "{}")
            .with(ObjectKind::Map, "{}");

        let mut req = request(dir.path(), true);
        req.dir = dir.path().join("does-not-exist");

        let outcome = export_types(&source, &[ObjectKind::Host, ObjectKind::Map], &req).await;

        assert!(outcome.written.is_empty());
        assert_eq!(outcome.failed, vec![ObjectKind::Host, ObjectKind::Map]);
        assert_eq!(source.calls().len(), 2);
    }
}
