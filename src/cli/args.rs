use crate::constants::{exit_codes, verbosity};
use clap::{error::ErrorKind, Args, CommandFactory, Parser, Subcommand};
use log::LevelFilter;
use std::path::PathBuf;

const HELP_TEMPLATE: &str = r#"{about-section}
{usage-heading} {usage}

{all-args}
{after-help}
"#;

/// Copies infrastructure modules into project repositories.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Copy and render one module into a local directory.
    Copy(CopyArgs),
    /// Handle a service-catalog event end to end.
    Provision(ProvisionArgs),
}

impl Commands {
    pub fn verbose(&self) -> u8 {
        match self {
            Commands::Copy(args) => args.verbose,
            Commands::Provision(args) => args.verbose,
        }
    }
}

#[derive(Args, Debug, Clone)]
pub struct CopyArgs {
    /// Source tree directory or Git repository.
    #[arg(value_name = "SOURCE")]
    pub source: String,

    /// Directory the module is copied into.
    #[arg(value_name = "DESTINATION")]
    pub destination: PathBuf,

    /// Module directory to look for.
    #[arg(short, long)]
    pub module: String,

    /// Provider directory inside the module.
    #[arg(short, long)]
    pub provider: String,

    /// Prefix for identity-bearing output files.
    #[arg(short, long = "request-id")]
    pub request_id: String,

    /// Substitution context as a JSON object, or `-` to read from stdin.
    #[arg(short, long)]
    pub context: Option<String>,

    /// Configuration file; defaults to one in the current directory.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Refuse to overwrite files already in the destination.
    #[arg(long)]
    pub strict: bool,

    /// Increase logging verbosity (`-v`, `-vv`, `-vvv`).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Args, Debug, Clone)]
pub struct ProvisionArgs {
    /// Event file, or `-` to read it from stdin.
    #[arg(value_name = "EVENT")]
    pub event: PathBuf,

    /// Project repository the module is committed to.
    #[arg(long = "target-repo")]
    pub target_repo: String,

    /// Module source repository; overrides `source.repository`.
    #[arg(long = "source-repo")]
    pub source_repo: Option<String>,

    /// Configuration file; defaults to one in the current directory.
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Increase logging verbosity (`-v`, `-vv`, `-vvv`).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

/// Parse command line arguments with custom handling for missing required inputs.
pub fn parse_cli() -> Cli {
    Cli::try_parse().unwrap_or_else(|e| {
        if e.kind() == ErrorKind::MissingRequiredArgument {
            let mut command = Cli::command().help_template(HELP_TEMPLATE);
            if let Err(print_err) = command.print_help() {
                eprintln!("Failed to display help information: {print_err}");
            } else {
                println!();
            }
            std::process::exit(exit_codes::FAILURE);
        } else {
            e.exit();
        }
    })
}

/// Map `-v` counts to the appropriate log level.
pub fn get_log_level_from_verbose(verbose_count: u8) -> LevelFilter {
    match verbose_count {
        verbosity::OFF => LevelFilter::Error,
        verbosity::INFO => LevelFilter::Info,
        verbosity::DEBUG => LevelFilter::Debug,
        verbosity::TRACE.. => LevelFilter::Trace,
    }
}
