//! Configuration for iac-scaffold
//!
//! This module replaces process-wide constants with an explicit structure:
//! - `types`: Section types and the overwrite policy
//! - `loader`: Configuration file loading, environment overrides and validation

pub mod loader;
pub mod types;

pub use loader::Config;
pub use types::{OverwritePolicy, ScmConfig, SourceConfig, TemplateConfig};
