use crate::{constants::DEFAULT_IGNORE_PATTERNS, error::Result};
use globset::{Glob, GlobSet, GlobSetBuilder};
use log::debug;
use std::path::Path;

/// Paths skipped while copying module trees and scanning for templates.
///
/// Patterns are matched against paths relative to the walked root.
#[derive(Debug, Clone)]
pub struct IgnoreSet {
    globs: GlobSet,
}

impl IgnoreSet {
    /// Builds the set from the default VCS patterns plus `extra`.
    pub fn new<S: AsRef<str>>(extra: &[S]) -> Result<Self> {
        let mut builder = GlobSetBuilder::new();
        let patterns = DEFAULT_IGNORE_PATTERNS
            .iter()
            .copied()
            .chain(extra.iter().map(AsRef::as_ref))
            .map(str::trim)
            .filter(|line| !line.is_empty() && !line.starts_with('#'));

        for pattern in patterns {
            debug!("Adding ignore pattern: {pattern} to globset");
            builder.add(Glob::new(pattern)?);
        }
        Ok(Self { globs: builder.build()? })
    }

    pub fn is_ignored<P: AsRef<Path>>(&self, relative: P) -> bool {
        self.globs.is_match(relative.as_ref())
    }
}

impl Default for IgnoreSet {
    fn default() -> Self {
        let no_extra: [&str; 0] = [];
        // The built-in patterns are static and always valid.
        Self::new(&no_extra).unwrap_or_else(|_| Self { globs: GlobSet::empty() })
    }
}
