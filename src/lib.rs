/// Handles argument parsing and the command runners.
pub mod cli;

/// Run configuration and its file formats.
pub mod config;

pub mod constants;

/// The placeholder mapping handed to templates.
pub mod context;

/// Copies a provider directory into the destination tree.
pub mod copier;

/// Defines custom error types.
pub mod error;

/// Glob patterns skipped while walking trees.
pub mod ignore;

/// A set of helpers for reading input.
pub mod ioutils;

/// Resolves local or remote module sources.
pub mod loader;

/// Finds the module and provider directories.
pub mod locator;

/// Located → Copied → Scanned → Rendered → Finalized orchestration.
pub mod pipeline;

/// Template parsing and rendering functionality.
pub mod renderer;

/// Service-catalog event parsing.
pub mod request;

/// Template detection, naming and materialisation.
pub mod template;

/// Source-control collaborator.
pub mod vcs;

/// Per-request working directories.
pub mod workspace;
