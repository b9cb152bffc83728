// ABOUTME: Dependency installer settings for Composer and npm.
// ABOUTME: Both run inside the workspace before files reach the target.

use serde::Deserialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Deserialize)]
pub struct ComposerConfig {
    #[serde(default)]
    pub enabled: bool,

    /// Extra arguments for `composer install`, whitespace separated.
    #[serde(default = "default_composer_options")]
    pub options: String,

    /// Overrides `COMPOSER_HOME` for the install.
    #[serde(default)]
    pub home: Option<PathBuf>,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            options: default_composer_options(),
            home: None,
        }
    }
}

fn default_composer_options() -> String {
    "--no-dev".to_string()
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NpmConfig {
    #[serde(default)]
    pub enabled: bool,
}
