// ABOUTME: Pre-sync backup of the target directory.
// ABOUTME: A compressed archive is written to `dir` before any file is replaced.

use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Default, Deserialize)]
pub struct BackupConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub dir: Option<PathBuf>,
}
