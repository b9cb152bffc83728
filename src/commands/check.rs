// ABOUTME: Check command implementation.
// ABOUTME: Validates the config and probes required tools; changes nothing.

use gitship::config::DeploymentConfig;
use gitship::deploy::Deployment;
use gitship::error::{Error, Result};
use gitship::output::Output;
use gitship::report::Reporter;
use gitship::runner::ProcessRunner;

pub async fn check(config: DeploymentConfig, output: Output) -> Result<()> {
    let mut reporter = Reporter::new(output);

    let validated = Deployment::new(config)
        .validate()
        .map_err(|(_, e)| Error::from(e))?;
    reporter.line("Configuration OK.");

    let runner = ProcessRunner::new();
    validated
        .check_environment(&runner, &mut reporter)
        .await
        .map_err(|(_, e)| Error::from(e))?;

    reporter.success("Ready to deploy.");
    Ok(())
}
