// ABOUTME: Drives one deployment run from raw config to notification.
// ABOUTME: Every exit path goes through a single finish routine that cleans up and notifies.

use std::path::PathBuf;

use crate::config::DeploymentConfig;
use crate::diagnostics::Warning;
use crate::environment::EnvironmentReport;
use crate::notify::{Mailer, Notifier, NotifyReport, Outcome};
use crate::output::Output;
use crate::report::{Reporter, RunTranscript};
use crate::runner::CommandRunner;
use crate::validate::EmailSettings;

use super::Deployment;
use super::error::DeployError;
use super::stages::StageContext;
use super::state::{Phase, Ready, Stage};
use super::workspace::Workspace;

/// What a successful run produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Deployed {
    /// Revision written to the version file, when one is configured.
    pub revision: Option<String>,
    pub backup: Option<PathBuf>,
    pub pruned: Vec<PathBuf>,
}

/// Everything known about a finished run.
#[derive(Debug)]
pub struct RunOutcome {
    pub result: Result<Deployed, DeployError>,
    pub transcript: RunTranscript,
    pub phases: Vec<Phase>,
    pub warnings: Vec<Warning>,
    /// Tools found by the pre-flight check, when it passed.
    pub environment: Option<EnvironmentReport>,
    pub notification: Option<NotifyReport>,
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }

    pub fn deployed(&self) -> Option<&Deployed> {
        self.result.as_ref().ok()
    }

    pub fn error(&self) -> Option<&DeployError> {
        self.result.as_ref().err()
    }

    pub fn transcript(&self) -> &RunTranscript {
        &self.transcript
    }

    pub fn phases(&self) -> &[Phase] {
        &self.phases
    }

    /// Stages that started, in order.
    pub fn stages(&self) -> Vec<Stage> {
        self.phases
            .iter()
            .filter_map(|p| match p {
                Phase::Running(stage) => Some(*stage),
                _ => None,
            })
            .collect()
    }

    pub fn into_result(self) -> Result<Deployed, DeployError> {
        self.result
    }
}

/// Runs deployments with one command runner and one mail transport.
pub struct Pipeline<R, M> {
    runner: R,
    notifier: Notifier<M>,
}

impl<R: CommandRunner, M: Mailer> Pipeline<R, M> {
    pub fn new(runner: R, mailer: M) -> Self {
        Self {
            runner,
            notifier: Notifier::new(mailer),
        }
    }

    /// Override the host name used in notification subjects.
    pub fn with_host(mut self, host: impl Into<String>) -> Self {
        self.notifier = self.notifier.with_host(host);
        self
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    pub fn mailer(&self) -> &M {
        self.notifier.mailer()
    }

    pub async fn run(&self, config: &DeploymentConfig, output: Output) -> RunOutcome {
        let mut run = Run {
            reporter: Reporter::new(output),
            phases: Vec::new(),
            environment: None,
        };
        run.reporter.output_mut().start_timer();
        run.reporter.line("gitship");

        run.enter(Phase::Validating);
        let validated = match Deployment::new(config.clone()).validate() {
            Ok(deployment) => deployment,
            Err((deployment, e)) => {
                // Best effort: the email settings may themselves be what failed.
                let email = EmailSettings::from_config(&deployment.raw_config().email);
                return self.finish(run, None, Err(e.into()), &email).await;
            }
        };

        run.enter(Phase::CheckingEnvironment);
        let ready = match validated
            .check_environment(&self.runner, &mut run.reporter)
            .await
        {
            Ok(deployment) => deployment,
            Err((deployment, e)) => {
                let email = deployment.config().email().clone();
                return self.finish(run, None, Err(e.into()), &email).await;
            }
        };

        run.environment = Some(ready.environment().clone());
        let config = ready.config();
        run.reporter.lines([
            format!(
                "Deploying {} {}",
                config.remote_repository(),
                config.branch()
            ),
            format!("To {}", config.target_dir().display()),
        ]);

        let workspace = Workspace::scoped(config.temp_dir(), config.clean_up());
        let result = self.run_stages(&ready, &mut run).await;
        let email = config.email().clone();
        self.finish(run, Some(workspace), result, &email).await
    }

    async fn run_stages(
        &self,
        deployment: &Deployment<Ready>,
        run: &mut Run,
    ) -> Result<Deployed, DeployError> {
        let mut ctx = StageContext {
            runner: &self.runner,
            config: deployment.config(),
            reporter: &mut run.reporter,
        };
        let phases = &mut run.phases;

        phases.push(Phase::Running(Stage::FetchSource));
        ctx.fetch_source().await?;

        phases.push(Phase::Running(Stage::Submodules));
        ctx.update_submodules().await?;

        if deployment.config().composer().is_some() {
            phases.push(Phase::Running(Stage::Composer));
            ctx.install_composer().await?;
        }

        if deployment.config().npm() {
            phases.push(Phase::Running(Stage::Npm));
            ctx.install_npm().await?;
        }

        let mut deployed = Deployed::default();
        if deployment.config().backup_dir().is_some() {
            phases.push(Phase::Running(Stage::Backup));
            deployed.backup = ctx.back_up().await?;
        }

        phases.push(Phase::Running(Stage::Synchronize));
        ctx.synchronize().await?;

        if deployment.config().git_rm() {
            phases.push(Phase::Running(Stage::Prune));
            deployed.pruned = ctx.prune().await?;
        }

        if deployment.config().version_file().is_some() {
            phases.push(Phase::Running(Stage::RecordVersion));
            deployed.revision = ctx.record_version().await?;
        }

        Ok(deployed)
    }

    /// The single termination path: record the error, clean up, notify.
    async fn finish(
        &self,
        mut run: Run,
        workspace: Option<Workspace>,
        result: Result<Deployed, DeployError>,
        email: &EmailSettings,
    ) -> RunOutcome {
        if let Err(e) = &result {
            tracing::info!(kind = ?e.kind(), "deployment failed");
            run.reporter.error(e.to_string());
            if let DeployError::Stage(stage_error) = e
                && stage_error.stage().touches_target()
            {
                run.reporter
                    .line("Stopped to prevent further changes. Check the data in the target directory.");
            }
        }

        if let Some(workspace) = workspace {
            run.enter(Phase::CleaningUp);
            workspace.release(&mut run.reporter).await;
        }

        let outcome = match &result {
            Ok(_) => {
                run.reporter.success("Deploy complete.");
                Outcome::Success
            }
            Err(_) => Outcome::Error,
        };

        run.enter(Phase::Notifying);
        let transcript = run.reporter.snapshot();
        let notification = self.notifier.notify(&transcript, outcome, email).await;
        if let Some(report) = &notification {
            for problem in report.problems() {
                run.reporter.warn(Warning::notification(problem));
            }
        }

        run.enter(Phase::Done);
        let warnings = run.reporter.diagnostics().warnings().to_vec();
        RunOutcome {
            result,
            transcript: run.reporter.into_transcript(),
            phases: run.phases,
            warnings,
            environment: run.environment,
            notification,
        }
    }
}

/// Per-run mutable state threaded through the pipeline.
struct Run {
    reporter: Reporter,
    phases: Vec<Phase>,
    environment: Option<EnvironmentReport>,
}

impl Run {
    fn enter(&mut self, phase: Phase) {
        tracing::info!(%phase, "entering phase");
        self.phases.push(phase);
    }
}

/// Run one deployment with the given runner and mail transport.
pub async fn run_deployment<R: CommandRunner, M: Mailer>(
    config: &DeploymentConfig,
    runner: R,
    mailer: M,
    output: Output,
) -> RunOutcome {
    Pipeline::new(runner, mailer).run(config, output).await
}
