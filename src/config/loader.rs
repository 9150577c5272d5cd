//! Configuration loading and management

use crate::config::types::{OverwritePolicy, ScmConfig, SourceConfig, TemplateConfig};
use crate::constants::CONFIG_FILENAMES;
use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Explicit run configuration handed to the pipeline and its collaborators.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    pub source: SourceConfig,
    pub scm: ScmConfig,
    pub templates: TemplateConfig,
    pub overwrite: OverwritePolicy,
    /// Full environment name to directory abbreviation
    pub environments: IndexMap<String, String>,
    /// Base for per-request working directories
    pub work_dir: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        let environments = [("development", "dev"), ("test", "tst"), ("production", "prd")]
            .into_iter()
            .map(|(name, abbr)| (name.to_string(), abbr.to_string()))
            .collect();

        Self {
            source: SourceConfig::default(),
            scm: ScmConfig::default(),
            templates: TemplateConfig::default(),
            overwrite: OverwritePolicy::default(),
            environments,
            work_dir: None,
        }
    }
}

impl Config {
    /// Loads the first configuration file found in `dir`, or the defaults.
    pub fn load_config<P: AsRef<Path>>(dir: P) -> Result<Self> {
        let dir = dir.as_ref();

        for config_file_name in CONFIG_FILENAMES.iter() {
            let config_file_path = dir.join(config_file_name);

            if config_file_path.exists() {
                log::debug!("Loading configuration from '{}'", config_file_path.display());
                return Self::from_file(config_file_path);
            }
        }

        log::debug!("No configuration file found in '{}', using defaults", dir.display());
        Ok(Self::default())
    }

    /// Loads a configuration file, picking the format from its extension.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;

        let config = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::from_str(&content)?,
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)?,
            _ => {
                return Err(Error::ConfigValidation(format!(
                    "unsupported configuration format '{}'",
                    path.display()
                )))
            }
        };

        Ok(config)
    }

    /// Applies `GITHUB_ENDPOINT`, `GITHUB_ORGANIZATION` and `GITHUB_TOKEN`.
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    fn with_overrides<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(endpoint) = lookup("GITHUB_ENDPOINT") {
            self.scm.endpoint = Some(endpoint);
        }
        if let Some(organization) = lookup("GITHUB_ORGANIZATION") {
            self.scm.organization = Some(organization);
        }
        if let Some(token) = lookup("GITHUB_TOKEN").filter(|t| !t.is_empty()) {
            self.scm.token = Some(token);
        }
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.templates.markers.is_empty() {
            return Err(Error::ConfigValidation(
                "templates.markers must not be empty".into(),
            ));
        }
        if let Some(marker) =
            self.templates.markers.iter().find(|m| !m.starts_with('.') || m.len() < 2)
        {
            return Err(Error::ConfigValidation(format!(
                "template marker '{marker}' must start with '.' and have at least 1 character after it"
            )));
        }
        if self.scm.branch_prefix.trim().is_empty() {
            return Err(Error::ConfigValidation("scm.branch_prefix must not be empty".into()));
        }
        Ok(())
    }

    /// Maps a full environment name (case-insensitive) to its abbreviation.
    pub fn environment_abbreviation(&self, environment: &str) -> Option<&str> {
        self.environments.get(&environment.to_lowercase()).map(String::as_str)
    }

    pub fn work_dir(&self) -> PathBuf {
        self.work_dir.clone().unwrap_or_else(std::env::temp_dir)
    }
}
