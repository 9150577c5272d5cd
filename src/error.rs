use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Source tree '{}' does not exist.", path.display())]
    SourceNotFound { path: PathBuf },

    #[error("Module '{module}' was not found under '{}'.", source_root.display())]
    ModuleNotFound { module: String, source_root: PathBuf },

    #[error("Provider '{provider}' was not found under module '{}'.", module_path.display())]
    ProviderNotFound { provider: String, module_path: PathBuf },

    #[error("Cannot create destination directory '{}'. Original error: {source}", path.display())]
    DestinationCreateFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to copy '{}'. Original error: {source}", path.display())]
    CopyFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Template '{}' references '{key}', which is not in the substitution context.", template.display())]
    UnresolvedPlaceholder { key: String, template: PathBuf },

    #[error("Failed to render '{}'. Original error: {source}", template.display())]
    RenderFailed {
        template: PathBuf,
        #[source]
        source: minijinja::Error,
    },

    #[error("Failed to write rendered file '{}'. Original error: {source}", path.display())]
    RenderWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Never aborts a run; reported through logs only.
    #[error("Failed to remove template '{}' after rendering. Original error: {source}", path.display())]
    TemplateDeleteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to clone '{repository}'. Original error: {source}")]
    CloneFailed {
        repository: String,
        #[source]
        source: git2::Error,
    },

    #[error("Failed to check out branch '{branch}'. Original error: {source}")]
    CheckoutFailed {
        branch: String,
        #[source]
        source: git2::Error,
    },

    #[error("Failed to commit '{}'. Original error: {source}", path.display())]
    CommitFailed {
        path: PathBuf,
        #[source]
        source: git2::Error,
    },

    #[error("Failed to push branch '{branch}': {reason}")]
    PushFailed { branch: String, reason: String },

    #[error("Invalid request: {0}.")]
    InvalidRequest(String),

    #[error("Invalid configuration: {0}.")]
    ConfigValidation(String),

    #[error("IO error: {0}.")]
    IoError(#[from] std::io::Error),

    #[error("Failed to walk directory tree. Original error: {0}")]
    WalkError(#[from] walkdir::Error),

    #[error("Failed to parse ignore pattern. Original error: {0}")]
    GlobSetParseError(#[from] globset::Error),

    #[error("Failed to parse JSON. Original error: {0}")]
    JSONParseError(#[from] serde_json::Error),

    #[error("Failed to parse YAML. Original error: {0}")]
    YAMLParseError(#[from] serde_yaml::Error),
}

/// Fieldless mirror of [`Error`], for callers that branch on the failure class.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    SourceNotFound,
    ModuleNotFound,
    ProviderNotFound,
    DestinationCreateFailed,
    CopyFailed,
    UnresolvedPlaceholder,
    RenderFailed,
    RenderWriteFailed,
    TemplateDeleteFailed,
    CloneFailed,
    CheckoutFailed,
    CommitFailed,
    PushFailed,
    InvalidRequest,
    Config,
    Io,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::SourceNotFound { .. } => ErrorKind::SourceNotFound,
            Error::ModuleNotFound { .. } => ErrorKind::ModuleNotFound,
            Error::ProviderNotFound { .. } => ErrorKind::ProviderNotFound,
            Error::DestinationCreateFailed { .. } => ErrorKind::DestinationCreateFailed,
            Error::CopyFailed { .. } => ErrorKind::CopyFailed,
            Error::UnresolvedPlaceholder { .. } => ErrorKind::UnresolvedPlaceholder,
            Error::RenderFailed { .. } => ErrorKind::RenderFailed,
            Error::RenderWriteFailed { .. } => ErrorKind::RenderWriteFailed,
            Error::TemplateDeleteFailed { .. } => ErrorKind::TemplateDeleteFailed,
            Error::CloneFailed { .. } => ErrorKind::CloneFailed,
            Error::CheckoutFailed { .. } => ErrorKind::CheckoutFailed,
            Error::CommitFailed { .. } => ErrorKind::CommitFailed,
            Error::PushFailed { .. } => ErrorKind::PushFailed,
            Error::InvalidRequest(_) | Error::JSONParseError(_) => ErrorKind::InvalidRequest,
            Error::ConfigValidation(_) | Error::YAMLParseError(_) | Error::GlobSetParseError(_) => {
                ErrorKind::Config
            }
            Error::IoError(_) | Error::WalkError(_) => ErrorKind::Io,
        }
    }

    /// HTTP-style status reported in the response envelope.
    pub fn status_code(&self) -> u16 {
        match self.kind() {
            ErrorKind::InvalidRequest => 400,
            _ => 500,
        }
    }
}

/// Convenience type alias for Results with [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Default error handler that prints the error and exits the program.
///
/// # Arguments
/// * `err` - The error to handle
pub fn default_error_handler(err: Error) {
    eprintln!("{}", err);
    std::process::exit(crate::constants::exit_codes::FAILURE);
}
