// ABOUTME: Validated git remote URL for the repository being deployed.
// ABOUTME: Accepts ssh `git@host:owner/repo[.git]` and http(s) remote shapes.

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;
use thiserror::Error;

static REMOTE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^((git@|https?://)([\w.@]+)([/:]))([\w,\-_]+)/([\w,\-_]+)(\.git)?(/)?$")
        .expect("remote repository pattern is valid")
});

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RemoteRepositoryError {
    #[error("remote repository cannot be empty")]
    Empty,

    #[error("`{0}` is not a valid SSH or HTTP(S) git remote")]
    InvalidShape(String),
}

/// A git remote in one of the shapes the deployer knows how to clone.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RemoteRepository(String);

impl RemoteRepository {
    pub fn new(value: &str) -> Result<Self, RemoteRepositoryError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(RemoteRepositoryError::Empty);
        }

        if !REMOTE_PATTERN.is_match(trimmed) {
            return Err(RemoteRepositoryError::InvalidShape(trimmed.to_string()));
        }

        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Owner and repository name, e.g. `("acme", "site")`.
    pub fn owner_and_name(&self) -> (&str, &str) {
        match REMOTE_PATTERN.captures(&self.0) {
            Some(caps) => {
                let owner = caps.get(5).map_or("", |m| m.as_str());
                let name = caps.get(6).map_or("", |m| m.as_str());
                (owner, name)
            }
            None => ("", ""),
        }
    }
}

impl fmt::Display for RemoteRepository {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
