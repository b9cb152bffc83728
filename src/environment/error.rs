// ABOUTME: Errors for missing tools or capabilities on the deploy host.
// ABOUTME: Raised before anything touches the workspace or the target.

use thiserror::Error;

use crate::runner::CommandError;

#[derive(Debug, Error)]
pub enum EnvironmentError {
    #[error("cannot execute external commands: {0}")]
    ProcessExecution(#[source] CommandError),

    #[error("could not determine the user running the deployment")]
    UnknownUser,

    #[error("`{0}` is not installed or not on PATH")]
    MissingBinary(String),

    #[error("`{binary}` did not report a version: {reason}")]
    VersionCheck { binary: String, reason: String },
}
