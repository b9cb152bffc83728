// ABOUTME: Command module aggregator for the gitship CLI.
// ABOUTME: Re-exports deploy and check command handlers.

mod check;
mod deploy;

pub use check::check;
pub use deploy::deploy;

use gitship::config::DeploymentConfig;
use gitship::error::Result;
use std::path::Path;

/// Load an explicit config file, or discover one in `cwd`.
pub fn load_config(explicit: Option<&Path>, cwd: &Path) -> Result<DeploymentConfig> {
    match explicit {
        Some(path) => DeploymentConfig::load(path),
        None => DeploymentConfig::discover(cwd),
    }
}
