//! Per-request working directory.

use crate::error::Result;
use log::debug;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const SOURCE_DIR: &str = "source";
const PROJECT_DIR: &str = "project";

/// Fresh directory owned by one request, removed when dropped.
///
/// Holds the cloned source tree and the cloned target project side by side.
#[derive(Debug)]
pub struct WorkingDirectory {
    dir: TempDir,
}

impl WorkingDirectory {
    /// Creates `base` if needed and a new directory under it named after
    /// `request_id`.
    pub fn acquire<P: AsRef<Path>>(base: P, request_id: &str) -> Result<Self> {
        let base = base.as_ref();
        fs::create_dir_all(base)?;
        let prefix = format!("{}-", sanitize(request_id));
        let dir = tempfile::Builder::new().prefix(&prefix).tempdir_in(base)?;
        debug!("Acquired working directory {}", dir.path().display());
        Ok(Self { dir })
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn source_dir(&self) -> PathBuf {
        self.dir.path().join(SOURCE_DIR)
    }

    pub fn project_dir(&self) -> PathBuf {
        self.dir.path().join(PROJECT_DIR)
    }

    /// Removes the directory, reporting failures that drop would ignore.
    pub fn close(self) -> Result<()> {
        let path = self.dir.path().to_path_buf();
        self.dir.close()?;
        debug!("Removed working directory {}", path.display());
        Ok(())
    }
}

fn sanitize(request_id: &str) -> String {
    let cleaned: String = request_id
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect();
    if cleaned.is_empty() {
        "request".to_string()
    } else {
        cleaned
    }
}
