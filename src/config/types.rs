//! Section types for the configuration file

use crate::constants::{
    DEFAULT_AUTHOR_EMAIL, DEFAULT_AUTHOR_NAME, DEFAULT_BRANCH_PREFIX,
    DEFAULT_IDENTITY_FILES, DEFAULT_REMOTE, DEFAULT_TEMPLATE_MARKERS,
};
use serde::Deserialize;

/// What to do when a copied file lands on a path that already exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OverwritePolicy {
    /// Reuse existing directories and let the last write win.
    #[default]
    Lenient,
    /// Refuse to overwrite any existing file.
    Strict,
}

/// Where module templates are cloned from.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Git URL or local path of the module template repository
    pub repository: Option<String>,
}

/// Source-control collaborator settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ScmConfig {
    pub endpoint: Option<String>,
    pub organization: Option<String>,
    pub branch_prefix: String,
    pub remote: String,
    pub author_name: String,
    pub author_email: String,
    /// Opaque credential; only ever read from the environment.
    #[serde(skip)]
    pub token: Option<String>,
}

impl Default for ScmConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            organization: None,
            branch_prefix: DEFAULT_BRANCH_PREFIX.to_string(),
            remote: DEFAULT_REMOTE.to_string(),
            author_name: DEFAULT_AUTHOR_NAME.to_string(),
            author_email: DEFAULT_AUTHOR_EMAIL.to_string(),
            token: None,
        }
    }
}

impl ScmConfig {
    pub fn branch_name(&self, request_id: &str) -> String {
        format!("{}/{}", self.branch_prefix, request_id)
    }
}

/// Template discovery and naming rules.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TemplateConfig {
    pub markers: Vec<String>,
    pub identity_files: Vec<String>,
    /// Extra glob patterns skipped by copy and scan
    pub ignore: Vec<String>,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            markers: DEFAULT_TEMPLATE_MARKERS.iter().map(|m| m.to_string()).collect(),
            identity_files: DEFAULT_IDENTITY_FILES.iter().map(|f| f.to_string()).collect(),
            ignore: Vec::new(),
        }
    }
}
