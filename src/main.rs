use clap::Parser;
use ecommerce_playground::cli::commands::{cmd_list, cmd_run};
use ecommerce_playground::cli::config::{Cli, Commands, load_config, resolve_settings};
use ecommerce_playground::init_tracing;
use ecommerce_playground::scenario::catalog::CATALOG;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let config = load_config(cli.config.as_deref());

    match cli.command {
        Commands::Run { .. } => {
            // Resolve: CLI > env > config > defaults
            let settings = resolve_settings(&cli, &config, |key| std::env::var(key).ok());
            let all_passed = cmd_run(&settings)?;
            if !all_passed {
                std::process::exit(1);
            }
        }
        Commands::List => {
            print!("{}", cmd_list(CATALOG));
        }
    }

    Ok(())
}
