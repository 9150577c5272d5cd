use crate::error::Result;
use crate::ignore::IgnoreSet;
use crate::template::naming::TemplateNaming;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Collects every templated file under `root`, in alphabetical walk order.
pub fn scan_templates<P: AsRef<Path>>(
    root: P,
    naming: &TemplateNaming,
    ignore: &IgnoreSet,
) -> Result<Vec<PathBuf>> {
    let root = root.as_ref();
    let mut templates = Vec::new();

    let walker = WalkDir::new(root).min_depth(1).sort_by_file_name().into_iter().filter_entry(
        |entry| {
            let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
            !ignore.is_ignored(relative)
        },
    );

    for entry in walker {
        let entry = entry?;
        if !entry.file_type().is_file() {
            continue;
        }
        if entry.file_name().to_str().is_some_and(|name| naming.is_template(name)) {
            templates.push(entry.into_path());
        }
    }

    Ok(templates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn finds_templates_at_any_depth() {
        let root = TempDir::new().unwrap();
        fs::create_dir_all(root.path().join("sub")).unwrap();
        fs::write(root.path().join("main.tf.j2"), "").unwrap();
        fs::write(root.path().join("variables.tf"), "").unwrap();
        fs::write(root.path().join("sub/config.tf.jinja"), "").unwrap();

        let found =
            scan_templates(root.path(), &TemplateNaming::default(), &IgnoreSet::default())
                .unwrap();

        assert_eq!(
            found,
            vec![root.path().join("main.tf.j2"), root.path().join("sub/config.tf.jinja")]
        );
    }

    #[test]
    fn directories_named_like_templates_are_skipped() {
        let root = TempDir::new().unwrap();
        fs::create_dir_all(root.path().join("charts.j2")).unwrap();

        let found =
            scan_templates(root.path(), &TemplateNaming::default(), &IgnoreSet::default())
                .unwrap();
        assert!(found.is_empty());
    }

    #[test]
    fn vcs_metadata_is_not_scanned() {
        let root = TempDir::new().unwrap();
        fs::create_dir_all(root.path().join(".git/hooks")).unwrap();
        fs::write(root.path().join(".git/hooks/pre-commit.j2"), "").unwrap();

        let found =
            scan_templates(root.path(), &TemplateNaming::default(), &IgnoreSet::default())
                .unwrap();
        assert!(found.is_empty());
    }
}
