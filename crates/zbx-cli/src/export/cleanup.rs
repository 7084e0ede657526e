//! Scoped deletion of intermediate export files

use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Files removed when the guard goes out of scope
///
/// The export handler owns one guard for the whole run, so registered files are deleted on
/// every return path, including errors raised after they were written.
#[derive(Debug, Default)]
pub struct IntermediateFiles {
    paths: Vec<PathBuf>,
}

impl IntermediateFiles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a file for deletion
    pub fn register(&mut self, path: impl Into<PathBuf>) {
        self.paths.push(path.into());
    }

    /// Registered files, in registration order
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

impl Drop for IntermediateFiles {
    fn drop(&mut self) {
        for path in &self.paths {
            remove_if_exists(path);
        }
    }
}

fn remove_if_exists(path: &Path) {
    if !path.exists() {
        return;
    }

    match std::fs::remove_file(path) {
        Ok(()) => debug!("Removed intermediate file {}", path.display()),
        Err(e) => warn!("Failed to remove {}: {}", path.display(), e),
    }
}
