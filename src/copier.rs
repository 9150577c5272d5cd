//! Copies a located provider directory into the destination tree.

use crate::config::OverwritePolicy;
use crate::error::{Error, Result};
use crate::ignore::IgnoreSet;
use log::{debug, warn};
use std::fs::{self, FileTimes};
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Mirrors every file under a provider directory at the same relative path
/// under a destination root.
///
/// Copies are not transactional: a failure leaves whatever was already
/// written in place.
pub struct TreeCopier<'a> {
    policy: OverwritePolicy,
    ignore: &'a IgnoreSet,
}

impl<'a> TreeCopier<'a> {
    pub fn new(policy: OverwritePolicy, ignore: &'a IgnoreSet) -> Self {
        Self { policy, ignore }
    }

    /// Copies the tree and returns the copied file paths, relative to
    /// `provider_path`, in walk order.
    pub fn copy_tree<P: AsRef<Path>, Q: AsRef<Path>>(
        &self,
        provider_path: P,
        destination_root: Q,
    ) -> Result<Vec<PathBuf>> {
        let provider_path = provider_path.as_ref();
        let destination_root = destination_root.as_ref();
        let mut copied = Vec::new();

        let walker = WalkDir::new(provider_path)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                let relative = entry.path().strip_prefix(provider_path).unwrap_or(entry.path());
                !self.ignore.is_ignored(relative)
            });

        for entry in walker {
            let entry = entry.map_err(|e| Error::CopyFailed {
                path: e.path().map(Path::to_path_buf).unwrap_or_else(|| provider_path.into()),
                source: e.into(),
            })?;
            let source = entry.path();
            let relative = source.strip_prefix(provider_path).map_err(|e| Error::CopyFailed {
                path: source.to_path_buf(),
                source: io::Error::new(io::ErrorKind::InvalidInput, e),
            })?;
            let target = destination_root.join(relative);

            if entry.file_type().is_dir() {
                self.prepare_dir(&target)?;
                continue;
            }

            if let Some(parent) = target.parent() {
                if !parent.is_dir() {
                    create_dir(parent)?;
                }
            }
            self.copy_file(source, &target)?;
            debug!("File copied to {}", target.display());
            copied.push(relative.to_path_buf());
        }

        Ok(copied)
    }

    fn prepare_dir(&self, target: &Path) -> Result<()> {
        if target.is_dir() {
            warn!(
                "Directory {} already exists - contents may be overwritten.",
                target.display()
            );
            return Ok(());
        }
        debug!("Directory {} did not exist... Creating...", target.display());
        create_dir(target)
    }

    fn copy_file(&self, source: &Path, target: &Path) -> Result<()> {
        if self.policy == OverwritePolicy::Strict && target.exists() {
            return Err(Error::CopyFailed {
                path: target.to_path_buf(),
                source: io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    "refusing to overwrite an existing file",
                ),
            });
        }

        fs::copy(source, target).map_err(|e| {
            // Blame the side that failed: a readable source means the target did.
            let path = if fs::metadata(source).is_ok() { target } else { source };
            Error::CopyFailed { path: path.to_path_buf(), source: e }
        })?;

        if let Err(e) = copy_times(source, target) {
            debug!("Could not preserve timestamps on {}: {e}", target.display());
        }
        Ok(())
    }
}

fn create_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path)
        .map_err(|e| Error::CopyFailed { path: path.to_path_buf(), source: e })
}

/// Permissions travel with `fs::copy`; access and modification times do not.
fn copy_times(source: &Path, target: &Path) -> io::Result<()> {
    let metadata = fs::metadata(source)?;
    let mut times = FileTimes::new().set_modified(metadata.modified()?);
    if let Ok(accessed) = metadata.accessed() {
        times = times.set_accessed(accessed);
    }
    fs::File::options().write(true).open(target)?.set_times(times)
}
