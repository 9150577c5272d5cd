pub mod args;
pub mod response;
pub mod runner;

pub use args::{
    get_log_level_from_verbose, parse_cli, Cli, Commands, CopyArgs, ProvisionArgs,
};
pub use response::Response;
pub use runner::{run_copy, run_provision};
