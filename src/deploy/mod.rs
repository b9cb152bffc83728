// ABOUTME: Deployment orchestration using the type state pattern.
// ABOUTME: Exports the pipeline, its state markers, stages, and error types.

mod backup;
mod deployment;
mod error;
mod pipeline;
mod prune;
mod stages;
mod state;
mod transitions;
mod workspace;

pub use backup::{archive_command, archive_path};
pub use deployment::Deployment;
pub use error::{DeployError, DeployErrorKind, StageError};
pub use pipeline::{Deployed, Pipeline, RunOutcome, run_deployment};
pub use prune::{deleted_paths, prune_deleted};
pub use state::{Phase, Ready, Stage, Unvalidated, Validated};
pub use transitions::TransitionResult;
pub use workspace::Workspace;
