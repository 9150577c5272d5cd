//! Template marker detection and output naming.

use crate::config::TemplateConfig;

/// Decides which files are templates and what their rendered files are called.
#[derive(Debug, Clone)]
pub struct TemplateNaming {
    /// Longest first, so a marker that contains another wins.
    markers: Vec<String>,
    identity_files: Vec<String>,
}

impl TemplateNaming {
    pub fn new<S: AsRef<str>>(markers: &[S], identity_files: &[S]) -> Self {
        let mut markers: Vec<String> = markers.iter().map(|m| m.as_ref().to_string()).collect();
        markers.sort_by_key(|m| std::cmp::Reverse(m.len()));
        Self {
            markers,
            identity_files: identity_files.iter().map(|f| f.as_ref().to_string()).collect(),
        }
    }

    pub fn from_config(config: &TemplateConfig) -> Self {
        Self::new(&config.markers, &config.identity_files)
    }

    fn matched_marker(&self, file_name: &str) -> Option<&str> {
        self.markers.iter().map(String::as_str).find(|m| file_name.contains(m))
    }

    /// A file is a template when any marker appears anywhere in its name.
    pub fn is_template(&self, file_name: &str) -> bool {
        self.matched_marker(file_name).is_some()
    }

    /// The file name with the last occurrence of its marker removed, along
    /// with any alphanumeric run glued to it (`.jinja2` counts as `.jinja`).
    ///
    /// `main.tf.j2` and `main.tf.jinja` both yield `main.tf`.
    pub fn logical_name(&self, file_name: &str) -> Option<String> {
        let marker = self.matched_marker(file_name)?;
        let at = file_name.rfind(marker)?;
        let rest = &file_name[at + marker.len()..];
        let glued = rest.find(|c: char| !c.is_ascii_alphanumeric()).unwrap_or(rest.len());

        let mut name = String::with_capacity(file_name.len());
        name.push_str(&file_name[..at]);
        name.push_str(&rest[glued..]);
        Some(name)
    }

    pub fn is_identity_bearing(&self, logical_name: &str) -> bool {
        self.identity_files.iter().any(|f| f == logical_name)
    }

    /// Output file name for a template, prefixed with `{request_id}-` for
    /// identity-bearing names.
    pub fn output_name(&self, file_name: &str, request_id: &str) -> Option<String> {
        let logical = self.logical_name(file_name)?;
        if self.is_identity_bearing(&logical) {
            Some(format!("{request_id}-{logical}"))
        } else {
            Some(logical)
        }
    }
}

impl Default for TemplateNaming {
    fn default() -> Self {
        Self::from_config(&TemplateConfig::default())
    }
}
