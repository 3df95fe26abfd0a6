mod cli;
mod commands;
mod config;
mod error;
mod logging;
mod ui;

use crate::cli::Cli;
use crate::error::Result;
use tracing::{debug, error, info};

fn main() {
    if let Err(e) = run_app() {
        eprintln!("\n❌ Error: {}", e);
        std::process::exit(1);
    }
}

fn run_app() -> Result<()> {
    let cli = Cli::parse_normalized();
    logging::setup_logging(cli.verbose, cli.quiet, cli.log_file.as_deref())?;

    info!("🚀 actbuild v{} starting up.", env!("CARGO_PKG_VERSION"));
    debug!("Full CLI arguments parsed: {:?}", &cli);

    let command_result = if cli.list_hosts {
        info!("Dispatching to host listing.");
        commands::hosts::run(cli.config.as_deref())
    } else {
        info!("Dispatching to install.");
        commands::install::run(cli.build, cli.config.as_deref())
    };

    match &command_result {
        Ok(_) => info!("✅ Command completed successfully."),
        Err(e) => error!("❌ Command failed: {}", e),
    }

    command_result
}
