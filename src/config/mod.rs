// ABOUTME: Configuration types and parsing for gitship.yml.
// ABOUTME: Handles YAML parsing, defaults, and config file discovery.

mod backup;
mod dependencies;
mod deserialize;
mod email;
mod init;
mod screen;
mod time_limit;
mod version_file;

pub use backup::BackupConfig;
pub use dependencies::{ComposerConfig, NpmConfig};
pub use email::EmailConfig;
pub use init::init_config;
pub use screen::TypeMismatch;
pub use time_limit::TimeLimit;
pub use version_file::VersionFile;

use crate::error::{Error, Result};
use deserialize::deserialize_branch;
use serde::Deserialize;
use std::path::{Path, PathBuf};

pub const CONFIG_FILENAME: &str = "gitship.yml";
pub const CONFIG_FILENAME_ALT: &str = "gitship.yaml";
pub const CONFIG_FILENAME_DIR: &str = ".gitship/config.yml";

pub const DEFAULT_BRANCH: &str = "master";

/// One deployment: which branch goes where, and what happens around it.
///
/// This is the raw record as written by the operator. It is never modified;
/// `validate` produces a normalized copy.
#[derive(Debug, Clone, Deserialize)]
pub struct DeploymentConfig {
    #[serde(default)]
    pub remote_repository: String,

    #[serde(default, deserialize_with = "deserialize_branch")]
    pub branch: String,

    #[serde(default)]
    pub target_dir: PathBuf,

    #[serde(default)]
    pub temp_dir: Option<PathBuf>,

    #[serde(default)]
    pub version_file: VersionFile,

    #[serde(default = "default_true")]
    pub git_rm: bool,

    #[serde(default)]
    pub delete_files: bool,

    #[serde(default = "default_exclude_files")]
    pub exclude_files: Vec<String>,

    #[serde(default = "default_true")]
    pub clean_up: bool,

    #[serde(default)]
    pub time_limit: TimeLimit,

    #[serde(default)]
    pub backup: BackupConfig,

    #[serde(default)]
    pub composer: ComposerConfig,

    #[serde(default)]
    pub npm: NpmConfig,

    #[serde(default)]
    pub email: EmailConfig,

    /// Fields dropped for having the wrong type; `validate` reports them in order.
    #[serde(skip)]
    pub type_mismatches: Vec<TypeMismatch>,
}

fn default_true() -> bool {
    true
}

fn default_exclude_files() -> Vec<String> {
    vec![
        ".git".to_string(),
        "LICENSE*".to_string(),
        "README*".to_string(),
    ]
}

impl DeploymentConfig {
    /// A config with every optional setting at its default.
    pub fn new(remote_repository: impl Into<String>, target_dir: impl Into<PathBuf>) -> Self {
        Self {
            remote_repository: remote_repository.into(),
            branch: DEFAULT_BRANCH.to_string(),
            target_dir: target_dir.into(),
            temp_dir: None,
            version_file: VersionFile::default(),
            git_rm: true,
            delete_files: false,
            exclude_files: default_exclude_files(),
            clean_up: true,
            time_limit: TimeLimit::default(),
            backup: BackupConfig::default(),
            composer: ComposerConfig::default(),
            npm: NpmConfig::default(),
            email: EmailConfig::default(),
            type_mismatches: Vec::new(),
        }
    }

    /// Parse a config document.
    ///
    /// Only a malformed document is an error here. Fields of the wrong type
    /// take their defaults and are listed in `type_mismatches`.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let mut document: serde_yaml::Value = serde_yaml::from_str(yaml)?;
        let type_mismatches = screen::screen(&mut document);
        let mut config: Self = serde_yaml::from_value(document)?;
        config.type_mismatches = type_mismatches;
        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn discover(dir: &Path) -> Result<Self> {
        let candidates = [
            dir.join(CONFIG_FILENAME),
            dir.join(CONFIG_FILENAME_ALT),
            dir.join(CONFIG_FILENAME_DIR),
        ];

        for path in &candidates {
            if path.exists() {
                tracing::debug!("Loading configuration from {}", path.display());
                return Self::load(path);
            }
        }

        Err(Error::ConfigNotFound(dir.to_path_buf()))
    }

    pub fn template() -> Self {
        let mut config = Self::new("git@github.com:owner/repository.git", "/var/www/html");
        config.email.recipients = vec!["ops@example.com".to_string()];
        config
    }
}
