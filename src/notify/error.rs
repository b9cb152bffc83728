// ABOUTME: Errors raised while handing a notification to the mail transport.
// ABOUTME: These are reported as warnings and never fail a deployment.

use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("could not start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("could not write the message to `{program}`: {source}")]
    Write {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("`{program}` exited with status {status}")]
    Rejected { program: String, status: i32 },

    #[error("`{program}` did not finish within {limit:?}")]
    TimedOut { program: String, limit: Duration },

    #[error("mail transport failed: {0}")]
    Transport(String),
}
