#![allow(dead_code)]

use iac_scaffold::context::SubstitutionContext;
use log::debug;
use serde_json::json;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

pub fn fixtures() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures")
}

pub fn source_fixture() -> PathBuf {
    fixtures().join("source")
}

pub fn expected_fixture(name: &str) -> PathBuf {
    fixtures().join("expected").join(name)
}

/// Context for the `billing-api` request used across the suites.
pub fn billing_context() -> SubstitutionContext {
    SubstitutionContext::from_value(json!({
        "apms_id": "12345",
        "application_name": "billing",
        "entity_name": "billing-api",
        "environment": "development",
        "instance_type": "t3.micro",
        "tags": {"team": "billing", "owner": "platform"}
    }))
    .unwrap()
}

fn files_under(dir: &Path) -> BTreeSet<PathBuf> {
    WalkDir::new(dir)
        .into_iter()
        .filter_map(Result::ok)
        .filter(|e| e.file_type().is_file())
        .filter(|e| !e.path().components().any(|c| c.as_os_str() == ".git"))
        .map(|e| e.path().strip_prefix(dir).unwrap().to_path_buf())
        .collect()
}

/// Prints a diff of files and their contents between two directories.
/// Shows files only present in one directory and content differences for files present in both.
///
/// # Arguments
/// * `actual` - The generated directory.
/// * `expected` - The directory with the expected output.
pub fn print_dir_diff(actual: &Path, expected: &Path) {
    let files1 = files_under(actual);
    let files2 = files_under(expected);

    println!("\n=== Directory Comparison ===");
    println!("Actual output:   {:?}", actual);
    println!("Expected output: {:?}", expected);

    for file in files1.difference(&files2) {
        println!("  + {:?}", file);
    }
    for file in files2.difference(&files1) {
        println!("  - {:?}", file);
    }
    for file in files1.intersection(&files2) {
        let content1 = fs::read_to_string(actual.join(file)).unwrap_or_default();
        let content2 = fs::read_to_string(expected.join(file)).unwrap_or_default();
        if content1 != content2 {
            println!("\n  File: {:?}", file);
            println!("  --- Actual content:\n{content1}");
            println!("  --- Expected content:\n{content2}");
        }
    }
    println!("=== End of Comparison ===\n");
}

/// Asserts that two trees hold the same files with the same content.
pub fn assert_same_tree(actual: &Path, expected: &Path) {
    match dir_diff::is_different(actual, expected) {
        Ok(false) => {}
        Ok(true) => {
            print_dir_diff(actual, expected);
            panic!("Directories differ. See above for details.");
        }
        Err(e) => {
            debug!("Error comparing directories: {e:?}");
            panic!("Failed to compare {} and {}", actual.display(), expected.display());
        }
    }
}
