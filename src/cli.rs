// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gitship")]
#[command(about = "Unattended deployment of a git branch to a directory")]
#[command(version)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new gitship.yml configuration file
    Init {
        /// Remote repository to deploy from
        #[arg(short, long)]
        repository: Option<String>,

        /// Directory to deploy into
        #[arg(short, long)]
        target: Option<PathBuf>,

        /// Overwrite an existing gitship.yml
        #[arg(short, long)]
        force: bool,
    },

    /// Deploy the configured branch to the target directory
    Deploy {
        /// Configuration file (default: discovered in the current directory)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Only print warnings, errors, and the result
        #[arg(short, long, conflicts_with = "json")]
        quiet: bool,

        /// Print progress as JSON lines
        #[arg(long)]
        json: bool,
    },

    /// Validate the configuration and check required tools without deploying
    Check {
        /// Configuration file (default: discovered in the current directory)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}
