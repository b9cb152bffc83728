// ABOUTME: Error types for a deployment run.
// ABOUTME: Splits failures into config, environment, and stage errors.

use super::state::Stage;
use crate::environment::EnvironmentError;
use crate::runner::CommandError;
use crate::validate::ConfigError;

/// A stage could not complete.
#[derive(Debug, thiserror::Error)]
pub enum StageError {
    /// The command could not be started, was lost, or timed out.
    #[error("{stage} failed: {source}")]
    Command {
        stage: Stage,
        #[source]
        source: CommandError,
    },

    #[error("{stage} failed: `{command}` exited with status {exit_code}")]
    NonZeroExit {
        stage: Stage,
        command: String,
        exit_code: i32,
    },

    #[error("{stage} failed: {context}: {source}")]
    Io {
        stage: Stage,
        context: String,
        #[source]
        source: std::io::Error,
    },

    #[error("record version failed: `git describe` printed nothing")]
    EmptyRevision,
}

impl StageError {
    pub fn stage(&self) -> Stage {
        match self {
            StageError::Command { stage, .. }
            | StageError::NonZeroExit { stage, .. }
            | StageError::Io { stage, .. } => *stage,
            StageError::EmptyRevision => Stage::RecordVersion,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, StageError::Command { source, .. } if source.is_timeout())
    }
}

/// Why a deployment run failed.
#[derive(Debug, thiserror::Error)]
pub enum DeployError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("environment check failed: {0}")]
    Environment(#[from] EnvironmentError),

    #[error(transparent)]
    Stage(#[from] StageError),
}

/// Coarse classification of a [`DeployError`] for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployErrorKind {
    Config,
    Environment,
    Stage(Stage),
}

impl DeployError {
    pub fn kind(&self) -> DeployErrorKind {
        match self {
            DeployError::Config(_) => DeployErrorKind::Config,
            DeployError::Environment(_) => DeployErrorKind::Environment,
            DeployError::Stage(e) => DeployErrorKind::Stage(e.stage()),
        }
    }

    /// True when the workspace and target were never touched.
    pub fn before_any_stage(&self) -> bool {
        !matches!(self, DeployError::Stage(_))
    }
}
