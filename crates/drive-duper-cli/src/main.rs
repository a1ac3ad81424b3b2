mod commands;
mod logging;
mod progress;
mod prompt;

use std::path::Path;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use colored::*;
use commands::{Cli, Commands};
use dotenv::dotenv;
use drive_duper_core::config::load_configuration;
use drive_duper_core::remote::GraphSearch;
use drive_duper_core::{AppConfig, SweepEngine};
use progress::{CliReporter, SharedBar};
use prompt::{prompt_confirm, prompt_line};
use tracing::{error, info};

fn main() -> ExitCode {
    dotenv().ok();

    let bar = SharedBar::default();
    let _guard = logging::init_logger(bar.clone());

    let args = Cli::parse();

    let config = match load_configuration() {
        Ok(config) => config,
        Err(err) => {
            error!("Error loading configuration: {}", err);
            return ExitCode::FAILURE;
        }
    };

    match args.command {
        Some(Commands::PrintConfig) => {
            println!("Configuration: {:?}", config);
            ExitCode::SUCCESS
        }
        Some(Commands::Sweep) | None => match run_sweep(&config, bar) {
            Ok(()) => ExitCode::SUCCESS,
            Err(err) => {
                error!("Error: {:#}", err);
                ExitCode::FAILURE
            }
        },
    }
}

fn run_sweep(config: &AppConfig, bar: SharedBar) -> anyhow::Result<()> {
    let search = GraphSearch::new(config).context("Remote drive search is not configured")?;

    let root = prompt_line("Enter Drive location: ")?;
    let backup = if prompt_confirm("Would you like to back up files before deleting?", None)? {
        Some(prompt_line("Enter Backup location: ")?)
    } else {
        None
    };

    let mut engine = SweepEngine::new(config, Path::new(&root))?;
    if let Some(backup) = backup {
        engine = engine
            .with_backup_dir(Path::new(&backup))
            .context("Invalid backup location")?;
    }

    let reporter = CliReporter::new(bar);
    let result = engine.sweep(&search, &reporter)?;

    println!();
    info!(
        "{} deleted ({} backed up), {} kept, {} failed, {} bytes reclaimed in {}",
        format!("{}", result.deleted).red(),
        format!("{}", result.backed_up).cyan(),
        format!("{}", result.no_match).green(),
        format!("{}", result.failed).yellow(),
        format!("{}", result.bytes_reclaimed).red(),
        format!("{:.2}s", result.duration.as_secs_f64()).green(),
    );

    Ok(())
}
