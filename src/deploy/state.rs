// ABOUTME: Deployment state markers and the run's phase machine.
// ABOUTME: Typestate markers carry the data each step has earned so far.

use std::fmt;

use crate::config::DeploymentConfig;
use crate::environment::EnvironmentReport;
use crate::validate::ValidatedConfig;

/// Initial state: raw config as written by the operator.
/// Available actions: `validate()`
#[derive(Debug, Clone)]
pub struct Unvalidated {
    pub(crate) config: DeploymentConfig,
}

/// Config passed validation.
/// Available actions: `check_environment()`
#[derive(Debug, Clone)]
pub struct Validated {
    pub(crate) config: ValidatedConfig,
}

/// Every required tool is present; stages may run.
#[derive(Debug, Clone)]
pub struct Ready {
    pub(crate) config: ValidatedConfig,
    pub(crate) environment: EnvironmentReport,
}

/// One step of the deployment proper, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    FetchSource,
    Submodules,
    Composer,
    Npm,
    Backup,
    Synchronize,
    Prune,
    RecordVersion,
}

impl Stage {
    pub fn name(self) -> &'static str {
        match self {
            Stage::FetchSource => "fetch source",
            Stage::Submodules => "update submodules",
            Stage::Composer => "composer install",
            Stage::Npm => "npm install",
            Stage::Backup => "backup",
            Stage::Synchronize => "synchronize",
            Stage::Prune => "prune deleted files",
            Stage::RecordVersion => "record version",
        }
    }

    /// True once files in the target directory may have changed.
    pub fn touches_target(self) -> bool {
        matches!(self, Stage::Synchronize | Stage::Prune | Stage::RecordVersion)
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Where a run is. Runs only move forward through these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Validating,
    CheckingEnvironment,
    Running(Stage),
    CleaningUp,
    Notifying,
    Done,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Phase::Validating => f.write_str("validating"),
            Phase::CheckingEnvironment => f.write_str("checking environment"),
            Phase::Running(stage) => write!(f, "running {stage}"),
            Phase::CleaningUp => f.write_str("cleaning up"),
            Phase::Notifying => f.write_str("notifying"),
            Phase::Done => f.write_str("done"),
        }
    }
}
