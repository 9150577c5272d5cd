//! Source-control collaborator used around the copy pipeline.

pub mod git;

pub use git::GitSourceControl;

use crate::error::Result;
use std::path::Path;

/// Operations the pipeline needs from a version-control backend.
///
/// `checkout` runs before any file is copied; `commit` and `push` run after
/// rendering finished.
pub trait SourceControl {
    /// A cloned working tree.
    type Handle;

    fn clone_repo(&self, repository: &str, local_path: &Path) -> Result<Self::Handle>;

    /// Creates (or reuses) `branch` and makes it current. Returns the branch name.
    fn checkout(&self, handle: &Self::Handle, branch: &str) -> Result<String>;

    /// Stages everything under `path` and commits it.
    ///
    /// Returns `false` when there was nothing to commit.
    fn commit(&self, handle: &Self::Handle, path: &Path, message: &str) -> Result<bool>;

    fn push(&self, handle: &Self::Handle, branch: &str) -> Result<()>;
}
