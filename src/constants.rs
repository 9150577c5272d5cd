//! Constants used throughout iac-scaffold

/// Configuration file names in order of preference
pub const CONFIG_FILENAMES: &[&str] =
    &["iac-scaffold.json", "iac-scaffold.yaml", "iac-scaffold.yml"];

/// Substrings that mark a file as a template. Both forms are equivalent.
pub const DEFAULT_TEMPLATE_MARKERS: &[&str] = &[".j2", ".jinja"];

/// Logical file names whose rendered output is prefixed with the request id
pub const DEFAULT_IDENTITY_FILES: &[&str] = &["main.tf", "outputs.tf", "README.md"];

/// Branches are created as `{prefix}/{request_id}`
pub const DEFAULT_BRANCH_PREFIX: &str = "servicecatalog";

pub const DEFAULT_REMOTE: &str = "origin";

pub const DEFAULT_AUTHOR_NAME: &str = "svc-servicecatalog";

pub const DEFAULT_AUTHOR_EMAIL: &str = "svc-servicecatalog@users.noreply.github.com";

/// Paths never copied or scanned
pub const DEFAULT_IGNORE_PATTERNS: &[&str] =
    &[".git", ".git/**", ".hg", ".hg/**", ".svn", ".svn/**", "**/.DS_Store"];

/// Length of a generated entity name
pub const GENERATED_NAME_LEN: usize = 10;

/// STDIN indicator for CLI arguments
pub const STDIN_INDICATOR: &str = "-";

/// Exit codes
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const FAILURE: i32 = 1;
}

/// Verbosity levels
pub mod verbosity {
    pub const OFF: u8 = 0;
    pub const INFO: u8 = 1;
    pub const DEBUG: u8 = 2;
    pub const TRACE: u8 = 3;
}
