// ABOUTME: Configuration gate that runs before any destructive step.
// ABOUTME: Checks fields in a fixed order and returns a normalized ValidatedConfig.

mod error;
mod paths;

pub use error::ConfigError;

use nonempty::NonEmpty;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::config::{
    BackupConfig, ComposerConfig, DEFAULT_BRANCH, DeploymentConfig, EmailConfig, TimeLimit,
    VersionFile,
};
use crate::types::{RemoteRepository, short_digest};

/// Pattern that keeps git metadata out of the target directory.
pub const GIT_METADATA: &str = ".git";

const VERSION_FILENAME: &str = "VERSION";

/// Composer install settings after validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposerSettings {
    pub options: Vec<String>,
    pub home: Option<PathBuf>,
}

/// Who hears about which outcome.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmailSettings {
    pub on_success: bool,
    pub on_error: bool,
    pub recipients: Option<NonEmpty<String>>,
}

impl EmailSettings {
    /// Best-effort settings straight from a raw config, used when validation itself fails.
    pub fn from_config(config: &EmailConfig) -> Self {
        Self {
            on_success: config.on_success,
            on_error: config.on_error,
            recipients: NonEmpty::from_vec(config.recipients.clone()),
        }
    }
}

/// A deployment config that passed every check, with defaults applied.
///
/// Only [`validate`] constructs this type.
#[derive(Debug, Clone)]
pub struct ValidatedConfig {
    remote_repository: RemoteRepository,
    branch: String,
    target_dir: PathBuf,
    temp_dir: PathBuf,
    version_file: Option<PathBuf>,
    git_rm: bool,
    delete_files: bool,
    exclude_files: Vec<String>,
    clean_up: bool,
    time_limit: Option<Duration>,
    backup_dir: Option<PathBuf>,
    composer: Option<ComposerSettings>,
    npm: bool,
    email: EmailSettings,
}

impl ValidatedConfig {
    pub fn remote_repository(&self) -> &RemoteRepository {
        &self.remote_repository
    }

    pub fn branch(&self) -> &str {
        &self.branch
    }

    pub fn target_dir(&self) -> &Path {
        &self.target_dir
    }

    pub fn temp_dir(&self) -> &Path {
        &self.temp_dir
    }

    pub fn version_file(&self) -> Option<&Path> {
        self.version_file.as_deref()
    }

    pub fn git_rm(&self) -> bool {
        self.git_rm
    }

    pub fn delete_files(&self) -> bool {
        self.delete_files
    }

    pub fn exclude_files(&self) -> &[String] {
        &self.exclude_files
    }

    pub fn clean_up(&self) -> bool {
        self.clean_up
    }

    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit
    }

    pub fn backup_dir(&self) -> Option<&Path> {
        self.backup_dir.as_deref()
    }

    pub fn composer(&self) -> Option<&ComposerSettings> {
        self.composer.as_ref()
    }

    pub fn npm(&self) -> bool {
        self.npm
    }

    pub fn email(&self) -> &EmailSettings {
        &self.email
    }
}

/// Check `config` and return a normalized copy, stopping at the first violation.
///
/// Nothing on disk is changed. Writability is tested with a scratch file that
/// is removed straight away.
pub fn validate(config: &DeploymentConfig) -> Result<ValidatedConfig, ConfigError> {
    ensure_typed(config, &["remote_repository"])?;
    let remote_repository = RemoteRepository::new(&config.remote_repository)
        .map_err(|e| ConfigError::new("remote_repository", e.to_string()))?;

    ensure_typed(config, &["branch"])?;
    let branch = validate_branch(&config.branch)?;

    ensure_typed(config, &["target_dir"])?;
    let target_dir = validate_target_dir(&config.target_dir)?;

    ensure_typed(config, &["git_rm", "delete_files", "clean_up"])?;

    ensure_typed(config, &["exclude_files"])?;
    let exclude_files = normalize_excludes(&config.exclude_files)?;

    ensure_typed(config, &["temp_dir"])?;
    let temp_dir = resolve_temp_dir(config.temp_dir.as_deref(), &remote_repository, &target_dir)?;

    ensure_typed(config, &["version_file"])?;
    let version_file = resolve_version_file(&config.version_file, &target_dir)?;

    ensure_typed(config, &["time_limit"])?;
    let time_limit = validate_time_limit(config.time_limit)?;

    ensure_typed(config, &["backup", "backup.enabled", "backup.dir"])?;
    let backup_dir = validate_backup(&config.backup)?;

    ensure_typed(
        config,
        &[
            "composer",
            "composer.enabled",
            "composer.options",
            "composer.home",
            "npm",
            "npm.enabled",
        ],
    )?;
    let composer = validate_composer(&config.composer)?;

    ensure_typed(
        config,
        &["email", "email.on_success", "email.on_error", "email.recipients"],
    )?;
    let email = validate_email(&config.email)?;

    Ok(ValidatedConfig {
        remote_repository,
        branch,
        target_dir,
        temp_dir,
        version_file,
        git_rm: config.git_rm,
        delete_files: config.delete_files,
        exclude_files,
        clean_up: config.clean_up,
        time_limit,
        backup_dir,
        composer,
        npm: config.npm.enabled,
        email,
    })
}

/// Fail with the first of `fields` that had the wrong type in the document.
fn ensure_typed(config: &DeploymentConfig, fields: &[&str]) -> Result<(), ConfigError> {
    for field in fields {
        if let Some(mismatch) = config.type_mismatches.iter().find(|m| m.field == *field) {
            return Err(ConfigError::new(&mismatch.field, &mismatch.reason));
        }
    }
    Ok(())
}

fn validate_branch(branch: &str) -> Result<String, ConfigError> {
    let branch = branch.trim();
    if branch.is_empty() {
        return Ok(DEFAULT_BRANCH.to_string());
    }
    if branch.starts_with('-') {
        return Err(ConfigError::new("branch", "cannot start with '-'"));
    }
    if branch.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(ConfigError::new(
            "branch",
            "cannot contain whitespace or control characters",
        ));
    }
    Ok(branch.to_string())
}

fn validate_target_dir(path: &Path) -> Result<PathBuf, ConfigError> {
    let target = paths::normalize(path);
    if paths::is_empty(&target) {
        return Err(ConfigError::new("target_dir", "must have a value"));
    }
    if !target.is_absolute() {
        return Err(ConfigError::new("target_dir", "must be an absolute path"));
    }
    if !target.is_dir() {
        return Err(ConfigError::new(
            "target_dir",
            format!("{} does not exist", target.display()),
        ));
    }
    if !paths::is_writable_dir(&target) {
        return Err(ConfigError::new(
            "target_dir",
            format!("{} is not writable", target.display()),
        ));
    }
    Ok(target)
}

fn normalize_excludes(patterns: &[String]) -> Result<Vec<String>, ConfigError> {
    let mut normalized = Vec::with_capacity(patterns.len() + 1);
    for pattern in patterns {
        let pattern = pattern.trim();
        if pattern.is_empty() {
            return Err(ConfigError::new("exclude_files", "patterns cannot be blank"));
        }
        normalized.push(pattern.to_string());
    }
    if !normalized.iter().any(|p| p == GIT_METADATA) {
        normalized.insert(0, GIT_METADATA.to_string());
    }
    Ok(normalized)
}

fn resolve_temp_dir(
    path: Option<&Path>,
    repository: &RemoteRepository,
    target_dir: &Path,
) -> Result<PathBuf, ConfigError> {
    let temp_dir = match path {
        Some(p) => {
            let normalized = paths::normalize(p);
            if paths::is_empty(&normalized) {
                return Err(ConfigError::new("temp_dir", "must have a value"));
            }
            normalized
        }
        None => default_temp_dir(repository),
    };

    if !temp_dir.is_absolute() {
        return Err(ConfigError::new("temp_dir", "must be an absolute path"));
    }
    if temp_dir.starts_with(target_dir) {
        return Err(ConfigError::new(
            "temp_dir",
            "must be outside the target directory",
        ));
    }
    // Cleanup removes the whole workspace.
    if target_dir.starts_with(&temp_dir) {
        return Err(ConfigError::new(
            "temp_dir",
            "cannot contain the target directory",
        ));
    }

    if temp_dir.exists() {
        if !temp_dir.is_dir() {
            return Err(ConfigError::new(
                "temp_dir",
                format!("{} exists but is not a directory", temp_dir.display()),
            ));
        }
        return Ok(temp_dir);
    }

    let parent_writable = temp_dir.parent().is_some_and(paths::is_writable_dir);
    if !parent_writable {
        return Err(ConfigError::new(
            "temp_dir",
            "parent directory is not writable",
        ));
    }
    Ok(temp_dir)
}

/// Workspace path derived from the repository identity, so repeat runs reuse one clone.
pub fn default_temp_dir(repository: &RemoteRepository) -> PathBuf {
    std::env::temp_dir().join(format!("gd-{}", short_digest(repository.as_str())))
}

fn resolve_version_file(
    version_file: &VersionFile,
    target_dir: &Path,
) -> Result<Option<PathBuf>, ConfigError> {
    let path = match version_file {
        VersionFile::Disabled => return Ok(None),
        VersionFile::TargetDefault => return Ok(Some(target_dir.join(VERSION_FILENAME))),
        VersionFile::Path(p) => {
            let expanded = paths::expand_home(p);
            if expanded.is_absolute() {
                expanded
            } else {
                target_dir.join(expanded)
            }
        }
    };

    if path.is_dir() {
        return Err(ConfigError::new(
            "version_file",
            format!("{} is a directory", path.display()),
        ));
    }
    let parent_writable = path.parent().is_some_and(paths::is_writable_dir);
    if !parent_writable {
        return Err(ConfigError::new(
            "version_file",
            "parent directory is not writable",
        ));
    }
    Ok(Some(path))
}

fn validate_time_limit(limit: TimeLimit) -> Result<Option<Duration>, ConfigError> {
    match limit.as_duration() {
        Some(d) if d.is_zero() => Err(ConfigError::new(
            "time_limit",
            "must be greater than zero, or false to disable",
        )),
        other => Ok(other),
    }
}

fn validate_backup(backup: &BackupConfig) -> Result<Option<PathBuf>, ConfigError> {
    if !backup.enabled {
        return Ok(None);
    }
    let Some(dir) = backup.dir.as_deref() else {
        return Err(ConfigError::new(
            "backup.dir",
            "is required when backups are enabled",
        ));
    };
    let dir = paths::normalize(dir);
    if paths::is_empty(&dir) {
        return Err(ConfigError::new("backup.dir", "must have a value"));
    }
    if !paths::is_writable_dir(&dir) {
        return Err(ConfigError::new(
            "backup.dir",
            format!("{} is not writable", dir.display()),
        ));
    }
    Ok(Some(dir))
}

fn validate_composer(composer: &ComposerConfig) -> Result<Option<ComposerSettings>, ConfigError> {
    if !composer.enabled {
        return Ok(None);
    }

    let options: Vec<String> = composer
        .options
        .split_whitespace()
        .map(str::to_string)
        .collect();
    if let Some(bad) = options.iter().find(|o| !o.starts_with('-')) {
        return Err(ConfigError::new(
            "composer.options",
            format!("`{bad}` is not an option"),
        ));
    }

    let home = match composer.home.as_deref() {
        None => None,
        Some(h) if paths::is_empty(h) => None,
        Some(h) => {
            let home = paths::normalize(h);
            if !home.is_dir() {
                return Err(ConfigError::new(
                    "composer.home",
                    format!("{} does not exist", home.display()),
                ));
            }
            if !paths::is_writable_dir(&home) {
                return Err(ConfigError::new(
                    "composer.home",
                    format!("{} is not writable", home.display()),
                ));
            }
            Some(home)
        }
    };

    Ok(Some(ComposerSettings { options, home }))
}

fn validate_email(email: &EmailConfig) -> Result<EmailSettings, ConfigError> {
    let recipients = NonEmpty::from_vec(email.recipients.clone());
    if email.is_enabled() && recipients.is_none() {
        return Err(ConfigError::new(
            "email.recipients",
            "cannot be empty when email notifications are enabled",
        ));
    }
    Ok(EmailSettings {
        on_success: email.on_success,
        on_error: email.on_error,
        recipients,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_branch_defaults_to_master() {
        assert_eq!(validate_branch("").unwrap(), "master");
        assert_eq!(validate_branch("   ").unwrap(), "master");
        assert_eq!(validate_branch(" main ").unwrap(), "main");
    }

    #[test]
    fn branch_cannot_look_like_an_option() {
        let err = validate_branch("--upload-pack=evil").unwrap_err();
        assert_eq!(err.field, "branch");
    }

    #[test]
    fn git_metadata_is_always_excluded() {
        let patterns = normalize_excludes(&["node_modules".to_string()]).unwrap();
        assert_eq!(patterns, [".git", "node_modules"]);

        let patterns = normalize_excludes(&["*.log".to_string(), ".git".to_string()]).unwrap();
        assert_eq!(patterns, ["*.log", ".git"]);
    }

    #[test]
    fn blank_exclude_pattern_is_rejected() {
        let err = normalize_excludes(&["  ".to_string()]).unwrap_err();
        assert_eq!(err.field, "exclude_files");
    }

    #[test]
    fn zero_time_limit_is_rejected() {
        assert!(validate_time_limit(TimeLimit::Limit(Duration::ZERO)).is_err());
        assert_eq!(validate_time_limit(TimeLimit::Disabled).unwrap(), None);
        assert_eq!(
            validate_time_limit(TimeLimit::Limit(Duration::from_secs(60))).unwrap(),
            Some(Duration::from_secs(60))
        );
    }

    #[test]
    fn default_temp_dir_is_stable_per_repository() {
        let a = RemoteRepository::new("git@github.com:acme/site.git").unwrap();
        let b = RemoteRepository::new("git@github.com:acme/other.git").unwrap();
        assert_eq!(default_temp_dir(&a), default_temp_dir(&a));
        assert_ne!(default_temp_dir(&a), default_temp_dir(&b));
        assert!(
            default_temp_dir(&a)
                .file_name()
                .unwrap()
                .to_string_lossy()
                .starts_with("gd-")
        );
    }

    #[test]
    fn composer_positional_arguments_are_rejected() {
        let composer = ComposerConfig {
            enabled: true,
            options: "--no-dev laravel/framework".to_string(),
            home: None,
        };
        let err = validate_composer(&composer).unwrap_err();
        assert_eq!(err.field, "composer.options");
        assert!(err.reason.contains("laravel/framework"));
    }

    #[test]
    fn disabled_composer_skips_checks() {
        let composer = ComposerConfig {
            enabled: false,
            options: "not-an-option".to_string(),
            home: Some(PathBuf::from("/does/not/exist")),
        };
        assert_eq!(validate_composer(&composer).unwrap(), None);
    }

    #[test]
    fn notifications_need_recipients() {
        let email = EmailConfig {
            on_success: false,
            on_error: true,
            recipients: vec![],
        };
        assert_eq!(
            validate_email(&email).unwrap_err().field,
            "email.recipients"
        );

        let email = EmailConfig {
            on_success: false,
            on_error: false,
            recipients: vec![],
        };
        assert!(validate_email(&email).unwrap().recipients.is_none());
    }
}
