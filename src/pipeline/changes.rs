use crate::locator::ModuleLocation;
use crate::template::Materialized;
use std::path::{Path, PathBuf};

/// Everything one run wrote into the destination tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeSet {
    pub destination_root: PathBuf,
    pub location: ModuleLocation,
    /// Copied files, relative to the provider directory.
    pub copied: Vec<PathBuf>,
    pub rendered: Vec<Materialized>,
}

impl ChangeSet {
    /// Files present in the destination after the run, relative to its root.
    ///
    /// Rendered outputs replace the templates they came from.
    pub fn files(&self) -> Vec<PathBuf> {
        let relative = |path: &Path| {
            path.strip_prefix(&self.destination_root).unwrap_or(path).to_path_buf()
        };

        let templates: Vec<PathBuf> = self
            .rendered
            .iter()
            .filter(|m| m.template_removed)
            .map(|m| relative(&m.template))
            .collect();

        let mut files: Vec<PathBuf> =
            self.copied.iter().filter(|p| !templates.contains(p)).cloned().collect();
        for output in self.rendered.iter().map(|m| relative(&m.output)) {
            if !files.contains(&output) {
                files.push(output);
            }
        }
        files.sort();
        files
    }

    /// Templates that could not be deleted after rendering.
    pub fn orphaned_templates(&self) -> impl Iterator<Item = &Path> {
        self.rendered.iter().filter(|m| !m.template_removed).map(|m| m.template.as_path())
    }
}
