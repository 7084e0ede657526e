//! Zip packaging of exported files

use crate::error::{CliError, Result};
use std::fs::File;
use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Name of the archive for a run
pub fn archive_file_name(timestamp: &str) -> String {
    format!("zbx_export_{timestamp}.zip")
}

/// Bundle `files` into `<dir>/zbx_export_<timestamp>.zip`
///
/// Entries are stored under their file names. The archive is finished and flushed before
/// this returns, so the inputs can be deleted afterwards.
pub fn write_archive(dir: &Path, timestamp: &str, files: &[PathBuf]) -> Result<PathBuf> {
    let archive_path = dir.join(archive_file_name(timestamp));
    let mut zip = ZipWriter::new(BufWriter::new(File::create(&archive_path)?));
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    for file in files {
        let name = file
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| CliError::internal(format!("Invalid file name: {}", file.display())))?;

        debug!("Adding {} to {}", name, archive_path.display());
        zip.start_file(name, options)?;
        io::copy(&mut File::open(file)?, &mut zip)?;
    }

    let mut writer = zip.finish()?;
    io::Write::flush(&mut writer)?;

    Ok(archive_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;
    use zip::ZipArchive;

    #[test]
    fn test_archive_contains_every_file_by_name() {
        let dir = tempfile::tempdir().unwrap();
        let hosts = dir.path().join("zbx_hosts.json");
        let templates = dir.path().join("zbx_templates.json");
        std::fs::write(&hosts, r#"{"zabbix_export":{"hosts":[]}}"#).unwrap();
        std::fs::write(&templates, r#"{"zabbix_export":{"templates":[]}}"#).unwrap();

        let archive_path =
            write_archive(dir.path(), "2410191200", &[hosts.clone(), templates.clone()]).unwrap();

        assert_eq!(archive_path, dir.path().join("zbx_export_2410191200.zip"));

        let mut archive = ZipArchive::new(File::open(&archive_path).unwrap()).unwrap();
        assert_eq!(archive.len(), 2);

        let mut content = String::new();
        archive
            .by_name("zbx_hosts.json")
            .unwrap()
            .read_to_string(&mut content)
            .unwrap();
        assert_eq!(content, r#"{"zabbix_export":{"hosts":[]}}"#);
        assert!(archive.by_name("zbx_templates.json").is_ok());
    }

    #[test]
    fn test_missing_input_fails() {
        let dir = tempfile::tempdir().unwrap();
        let result = write_archive(dir.path(), "2410191200", &[dir.path().join("absent.yaml")]);

        assert!(matches!(result, Err(CliError::Io(_))));
    }
}
