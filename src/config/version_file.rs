// ABOUTME: Where the deployed revision is recorded.
// ABOUTME: Accepts `false` to disable, `true` or empty for the default, or a path.

use serde::{Deserialize, Deserializer};
use std::path::PathBuf;

/// File that receives the deployed revision identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum VersionFile {
    /// Do not record the revision.
    Disabled,
    /// `VERSION` inside the target directory.
    #[default]
    TargetDefault,
    /// An explicit path; relative paths resolve against the target directory.
    Path(PathBuf),
}

impl<'de> Deserialize<'de> for VersionFile {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Flag(bool),
            Path(String),
        }

        Ok(match Option::<Raw>::deserialize(deserializer)? {
            None | Some(Raw::Flag(true)) => VersionFile::TargetDefault,
            Some(Raw::Flag(false)) => VersionFile::Disabled,
            Some(Raw::Path(p)) if p.trim().is_empty() => VersionFile::TargetDefault,
            Some(Raw::Path(p)) => VersionFile::Path(PathBuf::from(p.trim())),
        })
    }
}
