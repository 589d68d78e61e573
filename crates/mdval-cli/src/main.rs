mod cli;
mod commands;
mod config;
mod display;
mod error;
mod logging;
mod report;
mod utils;

use crate::cli::{Cli, Commands};
use crate::error::{CliError, Result};
use clap::Parser;
use tracing::{debug, error, info};

fn main() {
    if let Err(e) = run_app() {
        eprintln!("\n❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn run_app() -> Result<()> {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())?;

    let (panic_hook, eyre_hook) = color_eyre::config::HookBuilder::default().into_hooks();
    eyre_hook
        .install()
        .map_err(|e| CliError::Other(anyhow::anyhow!("{}", e)))?;
    std::panic::set_hook(Box::new(move |pi| {
        error!("{}", panic_hook.panic_report(pi));
    }));

    info!("mdval v{} starting up.", env!("CARGO_PKG_VERSION"));
    debug!("Full CLI arguments parsed: {:?}", &cli);

    let load_config = || {
        let evaluation = config::build_config(cli.config.as_deref(), &cli.set_values)?;
        debug!("Evaluation config: {:?}", evaluation);
        Ok::<_, CliError>(evaluation)
    };

    let command_result = match cli.command {
        Commands::Energy(args) => {
            info!("Dispatching to 'energy' command.");
            load_config().and_then(|config| commands::energy::run(args, &config))
        }
        Commands::Parse(args) => {
            info!("Dispatching to 'parse' command.");
            commands::parse::run(args)
        }
        Commands::Compare(args) => {
            info!("Dispatching to 'compare' command.");
            load_config().and_then(|config| commands::compare::run(args, &config))
        }
        Commands::Suite(args) => {
            info!("Dispatching to 'suite' command.");
            load_config().and_then(|config| commands::suite::run(args, &config))
        }
    };

    match &command_result {
        Ok(_) => info!("✅ Command completed successfully."),
        Err(e) => error!("❌ Command failed: {}", e),
    }
    command_result
}
