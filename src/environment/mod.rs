// ABOUTME: Pre-flight check for the external tools a deployment needs.
// ABOUTME: Confirms process execution works and records each tool's version.

mod error;

pub use error::EnvironmentError;

use std::path::PathBuf;
use std::time::Duration;

use crate::report::Reporter;
use crate::runner::{CommandRunner, CommandSpec};
use crate::validate::ValidatedConfig;

/// A resolved external tool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInfo {
    pub name: String,
    pub path: PathBuf,
    pub version: String,
}

/// What the pre-flight check found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentReport {
    pub user: String,
    pub tools: Vec<ToolInfo>,
}

impl EnvironmentReport {
    pub fn tool(&self, name: &str) -> Option<&ToolInfo> {
        self.tools.iter().find(|t| t.name == name)
    }
}

struct Requirement {
    name: &'static str,
    version_args: &'static [&'static str],
}

const GIT: Requirement = Requirement {
    name: "git",
    version_args: &["--version"],
};
const RSYNC: Requirement = Requirement {
    name: "rsync",
    version_args: &["--version"],
};
const TAR: Requirement = Requirement {
    name: "tar",
    version_args: &["--version"],
};
const COMPOSER: Requirement = Requirement {
    name: "composer",
    version_args: &["--no-ansi", "--version"],
};
const NPM: Requirement = Requirement {
    name: "npm",
    version_args: &["--version"],
};

fn requirements(config: &ValidatedConfig) -> Vec<&'static Requirement> {
    let mut required = vec![&GIT, &RSYNC];
    if config.backup_dir().is_some() {
        required.push(&TAR);
    }
    if config.composer().is_some() {
        required.push(&COMPOSER);
    }
    if config.npm() {
        required.push(&NPM);
    }
    required
}

/// Names of the binaries `config` needs, in check order.
pub fn required_binaries(config: &ValidatedConfig) -> Vec<&'static str> {
    requirements(config).into_iter().map(|r| r.name).collect()
}

pub struct EnvironmentChecker<'a> {
    runner: &'a dyn CommandRunner,
}

impl<'a> EnvironmentChecker<'a> {
    pub fn new(runner: &'a dyn CommandRunner) -> Self {
        Self { runner }
    }

    /// Verify every tool `config` needs, stopping at the first missing one.
    ///
    /// Probe output goes to a scratch reporter; only the summary lines reach
    /// `reporter`.
    pub async fn check(
        &self,
        config: &ValidatedConfig,
        reporter: &mut Reporter,
    ) -> Result<EnvironmentReport, EnvironmentError> {
        reporter.line("Checking the environment ...");
        let limit = config.time_limit();
        let user = self.current_user(limit).await?;
        reporter.line(format!("Running as {user}"));

        let mut tools = Vec::new();
        for requirement in requirements(config) {
            let tool = self.probe(requirement, limit).await?;
            reporter.line(format!(
                "{} ({}) installed: {}",
                tool.name,
                tool.version,
                tool.path.display()
            ));
            tools.push(tool);
        }
        reporter.line("Environment OK.");

        Ok(EnvironmentReport { user, tools })
    }

    async fn current_user(&self, limit: Option<Duration>) -> Result<String, EnvironmentError> {
        let mut scratch = Reporter::detached();
        let result = self
            .runner
            .run(&CommandSpec::new("whoami"), None, limit, &mut scratch)
            .await
            .map_err(EnvironmentError::ProcessExecution)?;
        if !result.succeeded() {
            return Err(EnvironmentError::UnknownUser);
        }
        result
            .first_line()
            .map(str::to_string)
            .ok_or(EnvironmentError::UnknownUser)
    }

    async fn probe(
        &self,
        requirement: &Requirement,
        limit: Option<Duration>,
    ) -> Result<ToolInfo, EnvironmentError> {
        let path = self
            .runner
            .locate(requirement.name)
            .ok_or_else(|| EnvironmentError::MissingBinary(requirement.name.to_string()))?;

        let command = CommandSpec::new(path.to_string_lossy())
            .args(requirement.version_args.iter().copied());
        let mut scratch = Reporter::detached();
        let result = self
            .runner
            .run(&command, None, limit, &mut scratch)
            .await
            .map_err(|e| EnvironmentError::VersionCheck {
                binary: requirement.name.to_string(),
                reason: e.to_string(),
            })?;

        if !result.succeeded() {
            return Err(EnvironmentError::VersionCheck {
                binary: requirement.name.to_string(),
                reason: format!("exited with status {}", result.exit_code),
            });
        }
        let version = result
            .first_line()
            .ok_or_else(|| EnvironmentError::VersionCheck {
                binary: requirement.name.to_string(),
                reason: "no output".to_string(),
            })?
            .to_string();

        tracing::debug!(tool = requirement.name, path = %path.display(), %version, "found tool");
        Ok(ToolInfo {
            name: requirement.name.to_string(),
            path,
            version,
        })
    }
}
