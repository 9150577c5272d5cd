//! Finds a module directory and its provider subdirectory inside a source tree.

use crate::error::{Error, Result};
use crate::ignore::IgnoreSet;
use log::debug;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Resolved module and provider paths for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleLocation {
    pub module_path: PathBuf,
    pub provider_path: PathBuf,
}

/// Depth-first, alphabetical search for exactly named directories.
///
/// The first directory whose name equals the query wins; names are compared
/// case-sensitively with no partial matching.
pub struct ModuleLocator<'a> {
    ignore: &'a IgnoreSet,
}

impl<'a> ModuleLocator<'a> {
    pub fn new(ignore: &'a IgnoreSet) -> Self {
        Self { ignore }
    }

    pub fn locate<P: AsRef<Path>>(
        &self,
        source_root: P,
        module_name: &str,
        provider_name: &str,
    ) -> Result<ModuleLocation> {
        let source_root = source_root.as_ref();
        debug!("Searching for requested module {module_name} in {}", source_root.display());

        let module_path = self.find_dir(source_root, module_name)?.ok_or_else(|| {
            Error::ModuleNotFound {
                module: module_name.to_string(),
                source_root: source_root.to_path_buf(),
            }
        })?;
        debug!("Module path: {}", module_path.display());

        let provider_path = self.find_dir(&module_path, provider_name)?.ok_or_else(|| {
            Error::ProviderNotFound {
                provider: provider_name.to_string(),
                module_path: module_path.clone(),
            }
        })?;
        debug!("Provider path: {}", provider_path.display());

        Ok(ModuleLocation { module_path, provider_path })
    }

    /// Returns the first directory strictly below `root` named `name`.
    fn find_dir(&self, root: &Path, name: &str) -> Result<Option<PathBuf>> {
        if !root.is_dir() {
            return Ok(None);
        }

        let walker = WalkDir::new(root)
            .min_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
                !self.ignore.is_ignored(relative)
            });

        for entry in walker {
            let entry = entry?;
            if entry.file_type().is_dir() && entry.file_name().to_str() == Some(name) {
                return Ok(Some(entry.into_path()));
            }
        }
        Ok(None)
    }
}

/// Convenience wrapper using the default ignore patterns.
pub fn locate<P: AsRef<Path>>(
    source_root: P,
    module_name: &str,
    provider_name: &str,
) -> Result<ModuleLocation> {
    let ignore = IgnoreSet::default();
    ModuleLocator::new(&ignore).locate(source_root, module_name, provider_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use std::fs;
    use tempfile::TempDir;

    fn tree(dirs: &[&str]) -> TempDir {
        let root = TempDir::new().unwrap();
        for dir in dirs {
            fs::create_dir_all(root.path().join(dir)).unwrap();
        }
        root
    }

    #[test]
    fn finds_module_and_provider() {
        let root = tree(&["modules/ec2/terraform", "modules/rds/terraform"]);
        let location = locate(root.path(), "ec2", "terraform").unwrap();

        assert_eq!(location.module_path, root.path().join("modules/ec2"));
        assert_eq!(location.provider_path, root.path().join("modules/ec2/terraform"));
    }

    #[test]
    fn missing_module_fails() {
        let root = tree(&["modules/rds/terraform"]);
        let err = locate(root.path(), "ec2", "terraform").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ModuleNotFound);
    }

    #[test]
    fn missing_provider_fails() {
        let root = tree(&["modules/ec2/cloudformation"]);
        let err = locate(root.path(), "ec2", "terraform").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ProviderNotFound);
    }

    #[test]
    fn provider_outside_module_is_not_matched() {
        let root = tree(&["modules/ec2", "modules/rds/terraform"]);
        let err = locate(root.path(), "ec2", "terraform").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ProviderNotFound);
    }

    #[test]
    fn matching_is_exact_and_case_sensitive() {
        let root = tree(&["modules/EC2/terraform", "modules/ec2-legacy/terraform"]);
        let err = locate(root.path(), "ec2", "terraform").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ModuleNotFound);
    }

    #[test]
    fn first_match_is_alphabetical_depth_first() {
        let root = tree(&["a/deep/ec2/terraform", "b/ec2/terraform"]);
        let first = locate(root.path(), "ec2", "terraform").unwrap();
        let second = locate(root.path(), "ec2", "terraform").unwrap();

        assert_eq!(first.module_path, root.path().join("a/deep/ec2"));
        assert_eq!(first, second);
    }

    #[test]
    fn module_root_itself_is_not_a_provider_match() {
        let root = tree(&["terraform/other"]);
        let err = locate(root.path(), "terraform", "terraform").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ProviderNotFound);
    }

    #[test]
    fn files_with_the_module_name_are_skipped() {
        let root = tree(&["x/ec2/terraform"]);
        fs::write(root.path().join("ec2"), "not a directory").unwrap();
        let location = locate(root.path(), "ec2", "terraform").unwrap();
        assert_eq!(location.module_path, root.path().join("x/ec2"));
    }

    #[test]
    fn missing_source_root_is_module_not_found() {
        let err = locate("/path/that/does/not/exist", "ec2", "terraform").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ModuleNotFound);
    }
}
