//! Templated files in the destination tree
//!
//! - `naming`: marker detection and output names
//! - `scanner`: finding templated files after the copy
//! - `materialize`: render to disk, then delete the template

pub mod materialize;
pub mod naming;
pub mod scanner;

pub use materialize::{materialize, Materialized};
pub use naming::TemplateNaming;
pub use scanner::scan_templates;
