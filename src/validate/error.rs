// ABOUTME: The error raised when a deployment config fails validation.
// ABOUTME: Names the offending field and why it was rejected.

use thiserror::Error;

/// First violation found while validating a deployment config.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("invalid `{field}`: {reason}")]
pub struct ConfigError {
    pub field: String,
    pub reason: String,
}

impl ConfigError {
    pub fn new(field: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            reason: reason.into(),
        }
    }
}
