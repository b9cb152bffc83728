// ABOUTME: Deploy command implementation.
// ABOUTME: Runs the pipeline with local processes and sendmail.

use gitship::config::DeploymentConfig;
use gitship::deploy::run_deployment;
use gitship::error::{Error, Result};
use gitship::notify::SendmailMailer;
use gitship::output::Output;
use gitship::runner::ProcessRunner;

/// Run one deployment. The transcript has already been printed when this returns.
pub async fn deploy(config: DeploymentConfig, output: Output) -> Result<()> {
    let mailer = SendmailMailer::new().with_timeout(config.time_limit.as_duration());
    let outcome = run_deployment(&config, ProcessRunner::new(), mailer, output).await;

    for warning in &outcome.warnings {
        tracing::debug!(kind = ?warning.kind, "{}", warning.message);
    }

    outcome.into_result().map(|_| ()).map_err(Error::from)
}
