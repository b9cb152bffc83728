// ABOUTME: Entry point for the gitship CLI application.
// ABOUTME: Parses arguments and dispatches to appropriate command handlers.

mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands};
use gitship::config;
use gitship::error::{Error, Result};
use gitship::output::{Output, OutputMode};
use std::env;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // RUST_LOG wins over the verbose flag when set.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("debug")
        } else {
            EnvFilter::new("warn")
        }
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let result = run(cli).await;

    if let Err(e) = result {
        // A failed deployment has already reported its error.
        if !matches!(e, Error::Deploy(_)) {
            eprintln!("Error: {e}");
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let cwd = env::current_dir()?;
    match cli.command {
        Commands::Init {
            repository,
            target,
            force,
        } => {
            config::init_config(&cwd, repository.as_deref(), target.as_deref(), force)?;
            println!("Created {}", cwd.join(config::CONFIG_FILENAME).display());
            Ok(())
        }
        Commands::Deploy {
            config,
            quiet,
            json,
        } => {
            let config = commands::load_config(config.as_deref(), &cwd)?;
            let mode = if json {
                OutputMode::Json
            } else if quiet {
                OutputMode::Quiet
            } else {
                OutputMode::Normal
            };
            commands::deploy(config, Output::new(mode)).await
        }
        Commands::Check { config } => {
            let config = commands::load_config(config.as_deref(), &cwd)?;
            commands::check(config, Output::new(OutputMode::Normal)).await
        }
    }
}
