//! Template rendering
//!
//! - `interface`: the `TemplateRenderer` trait the pipeline depends on
//! - `minijinja`: the strict MiniJinja-backed implementation
//! - `filters`: extra filters registered in every environment

pub mod filters;
pub mod interface;
pub mod minijinja;

pub use interface::TemplateRenderer;
pub use minijinja::MiniJinjaRenderer;
