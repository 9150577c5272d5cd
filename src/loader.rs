//! Resolves where the module source tree comes from.

use crate::error::{Error, Result};
use crate::vcs::SourceControl;
use log::debug;
use std::fmt;
use std::path::{Path, PathBuf};
use url::Url;

/// Location of a source tree or target repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModuleSource {
    /// Local filesystem path
    FileSystem(PathBuf),
    /// Git repository URL (HTTPS or SSH)
    Git(String),
}

impl fmt::Display for ModuleSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModuleSource::FileSystem(path) => write!(f, "local path: '{}'", path.display()),
            ModuleSource::Git(repo) => write!(f, "git repository: '{repo}'"),
        }
    }
}

impl ModuleSource {
    pub fn from_string(s: &str) -> Self {
        if is_git_url(s) {
            Self::Git(s.to_string())
        } else {
            Self::FileSystem(PathBuf::from(s))
        }
    }

    /// Makes the tree available locally.
    ///
    /// Local paths are used in place; repositories are cloned into
    /// `clone_path`.
    pub fn load<S: SourceControl>(&self, scm: &S, clone_path: &Path) -> Result<PathBuf> {
        match self {
            ModuleSource::FileSystem(path) => {
                if !path.is_dir() {
                    return Err(Error::SourceNotFound { path: path.clone() });
                }
                debug!("Using {self}");
                Ok(path.clone())
            }
            ModuleSource::Git(repo) => {
                debug!("Loading {self}");
                scm.clone_repo(repo, clone_path)?;
                Ok(clone_path.to_path_buf())
            }
        }
    }
}

/// Whether `s` names a remote repository rather than a local path.
pub fn is_git_url(s: &str) -> bool {
    if let Ok(url) = Url::parse(s) {
        return matches!(url.scheme(), "http" | "https" | "git" | "ssh" | "file");
    }

    // scp-like syntax: user@host:path
    if s.contains("://") {
        return false;
    }
    let (Some(at), Some(colon)) = (s.find('@'), s.rfind(':')) else {
        return false;
    };
    if colon < at {
        return false;
    }
    let user = &s[..at];
    let host = &s[at + 1..colon];
    let path = &s[colon + 1..];
    !user.is_empty() && host.contains('.') && path.contains('/')
}
