use crate::cli::BuildArgs;
use crate::config::builder;
use crate::error::Result;
use crate::ui::CliProgressHandler;
use actbuild::core::models::environment::Environment;
use actbuild::core::tools::locate::PathLocator;
use actbuild::core::tools::process::SystemRunner;
use actbuild::engine::progress::ProgressReporter;
use actbuild::engine::resolver::BuildConfiguration;
use actbuild::workflows::install::{self, InstallContext, InstallReport};
use anyhow::Context;
use std::path::Path;
use tracing::{info, warn};

pub fn run(args: BuildArgs, config_path: Option<&Path>) -> Result<()> {
    let file_config = builder::load_file_config(config_path)?;
    let app_config = builder::build_config(&args, file_config)?;

    let env = Environment::capture();
    let workspace =
        std::env::current_dir().context("Cannot determine the current working directory")?;
    let locator = PathLocator::from_environment(&env);
    let runner = SystemRunner;
    let ctx = InstallContext {
        env: &env,
        hosts: &app_config.hosts,
        locator: &locator,
        runner: &runner,
        workspace: &workspace,
    };

    if app_config.dry_run {
        info!("Dry run: resolving the build configuration only.");
        let configuration = install::plan(&app_config.request, &ctx)?;
        print_plan(&configuration);
        return Ok(());
    }

    let progress = CliProgressHandler::new();
    let reporter = ProgressReporter::with_callback(progress.get_callback());
    let result = install::run(&app_config.request, &ctx, &reporter);
    progress.finish();

    print_summary(&result?);
    Ok(())
}

fn print_plan(configuration: &BuildConfiguration) {
    println!("FLAGS: {}", configuration.flags);
    println!(
        "Host:           {} (profile '{}')",
        configuration.host.identifier, configuration.host.profile
    );
    println!(
        "Source:         {}",
        configuration.layout.source_dir.display()
    );
    println!("Build dir:      {}", configuration.layout.build_dir.display());
    println!("Install prefix: {}", configuration.install_prefix.display());
    println!(
        "Build command:  make -j {} install tests",
        configuration.ncores
    );
}

fn print_summary(report: &InstallReport) {
    for command in &report.tolerated_failures {
        warn!("Ignored failure of '{}'", command);
        eprintln!("⚠️  '{}' failed; continuing as requested.", command);
    }
    println!(
        "Installed {} ({}) to {}",
        report.configuration.target,
        report.configuration.branch,
        report.configuration.install_prefix.display()
    );
    for log in &report.logs {
        println!("  log: {}", log.display());
    }
}
