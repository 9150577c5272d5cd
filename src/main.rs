use iac_scaffold::{
    cli::{get_log_level_from_verbose, parse_cli, run_copy, run_provision, Commands, Response},
    constants::exit_codes,
    error::default_error_handler,
};

fn main() {
    let cli = parse_cli();
    let lvl = get_log_level_from_verbose(cli.command.verbose());
    env_logger::Builder::new().filter_level(lvl).init();

    match cli.command {
        Commands::Copy(args) => match run_copy(&args) {
            Ok(changes) => {
                println!(
                    "Module {}/{} rendered into {}.",
                    args.module,
                    args.provider,
                    changes.destination_root.display()
                );
                for file in changes.files() {
                    println!("  {}", file.display());
                }
                for orphan in changes.orphaned_templates() {
                    eprintln!("Template left behind: {}", orphan.display());
                }
            }
            Err(err) => default_error_handler(err),
        },
        Commands::Provision(args) => {
            let response = run_provision(&args).unwrap_or_else(|err| {
                log::error!("{err}");
                Response::failure(&err)
            });
            match response.to_json() {
                Ok(json) => println!("{json}"),
                Err(err) => default_error_handler(err),
            }
            if !response.is_success() {
                std::process::exit(exit_codes::FAILURE);
            }
        }
    }
}
