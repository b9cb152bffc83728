// ABOUTME: The individual deployment stages, from fetching source to recording the revision.
// ABOUTME: Each stage runs its commands through the CommandRunner and fails fast.

use std::path::{Path, PathBuf};

use crate::diagnostics::Warning;
use crate::report::Reporter;
use crate::runner::{CommandResult, CommandRunner, CommandSpec};
use crate::types::ByteSize;
use crate::validate::ValidatedConfig;

use super::backup;
use super::error::StageError;
use super::prune;
use super::state::Stage;

/// Shared handles for every stage of one run.
pub(crate) struct StageContext<'a> {
    pub runner: &'a dyn CommandRunner,
    pub config: &'a ValidatedConfig,
    pub reporter: &'a mut Reporter,
}

impl StageContext<'_> {
    fn workspace(&self) -> &Path {
        self.config.temp_dir()
    }

    /// Run one command for `stage`. Non-zero exit is fatal.
    async fn exec(
        &mut self,
        stage: Stage,
        command: CommandSpec,
        working_dir: Option<&Path>,
    ) -> Result<CommandResult, StageError> {
        self.reporter.command(&command);
        tracing::debug!(%stage, command = %command, "running command");

        let result = self
            .runner
            .run(&command, working_dir, self.config.time_limit(), self.reporter)
            .await
            .map_err(|source| StageError::Command { stage, source })?;

        tracing::debug!(%stage, exit_code = result.exit_code, "command finished");
        if !result.succeeded() {
            return Err(StageError::NonZeroExit {
                stage,
                command: command.to_string(),
                exit_code: result.exit_code,
            });
        }
        Ok(result)
    }

    /// `git` addressed at the workspace clone regardless of working directory.
    fn git_in_workspace(&self) -> CommandSpec {
        let workspace = self.workspace();
        CommandSpec::new("git")
            .arg(format!("--git-dir={}", workspace.join(".git").display()))
            .arg(format!("--work-tree={}", workspace.display()))
    }

    pub async fn fetch_source(&mut self) -> Result<(), StageError> {
        let stage = Stage::FetchSource;
        if self.workspace().is_dir() {
            let fetch = self
                .git_in_workspace()
                .args(["fetch", "origin", self.config.branch()]);
            self.exec(stage, fetch, None).await?;

            let reset = self.git_in_workspace().args(["reset", "--hard", "FETCH_HEAD"]);
            self.exec(stage, reset, None).await?;
        } else {
            let clone = CommandSpec::new("git")
                .args(["clone", "--depth=1", "--branch", self.config.branch()])
                .arg(self.config.remote_repository().as_str())
                .path_arg(self.workspace());
            self.exec(stage, clone, None).await?;
        }
        Ok(())
    }

    pub async fn update_submodules(&mut self) -> Result<(), StageError> {
        let command =
            CommandSpec::new("git").args(["submodule", "update", "--init", "--recursive"]);
        let workspace = self.workspace().to_path_buf();
        self.exec(Stage::Submodules, command, Some(&workspace)).await?;
        Ok(())
    }

    pub async fn install_composer(&mut self) -> Result<(), StageError> {
        let config = self.config;
        let Some(composer) = config.composer() else {
            return Ok(());
        };
        let workspace = self.workspace().to_path_buf();
        let manifest = workspace.join("composer.json");
        if !manifest.is_file() {
            self.reporter.warn(Warning::missing_manifest(format!(
                "cannot run `composer install` as {} does not exist",
                manifest.display()
            )));
            return Ok(());
        }

        let mut command = CommandSpec::new("composer")
            .args(["--no-ansi", "--no-interaction", "--no-progress"])
            .arg(format!("--working-dir={}", workspace.display()))
            .arg("install")
            .args(composer.options.iter().cloned());
        if let Some(home) = &composer.home {
            command = command.env("COMPOSER_HOME", home);
        }
        self.exec(Stage::Composer, command, Some(&workspace)).await?;
        Ok(())
    }

    pub async fn install_npm(&mut self) -> Result<(), StageError> {
        if !self.config.npm() {
            return Ok(());
        }
        let workspace = self.workspace().to_path_buf();
        let manifest = workspace.join("package.json");
        if !manifest.is_file() {
            self.reporter.warn(Warning::missing_manifest(format!(
                "cannot run `npm install` as {} does not exist",
                manifest.display()
            )));
            return Ok(());
        }

        let command = CommandSpec::new("npm")
            .args(["install", "--no-color", "--prefix"])
            .path_arg(&workspace);
        self.exec(Stage::Npm, command, Some(&workspace)).await?;
        Ok(())
    }

    /// Snapshot the target before it changes. Returns the archive path.
    pub async fn back_up(&mut self) -> Result<Option<PathBuf>, StageError> {
        let config = self.config;
        let Some(backup_dir) = config.backup_dir() else {
            return Ok(None);
        };
        let target = config.target_dir();
        let workspace = self.workspace().to_path_buf();
        let archive = backup::archive_path(backup_dir, target, chrono::Local::now());
        let command = backup::archive_command(&archive, target, &workspace, backup_dir);
        self.exec(Stage::Backup, command, Some(&workspace)).await?;

        let size = tokio::fs::metadata(&archive)
            .await
            .map_err(|source| StageError::Io {
                stage: Stage::Backup,
                context: format!("reading {}", archive.display()),
                source,
            })?
            .len();
        self.reporter.line(format!(
            "Backup of {} has been created at {} ({})",
            target.display(),
            archive.display(),
            ByteSize(size)
        ));
        Ok(Some(archive))
    }

    pub async fn synchronize(&mut self) -> Result<(), StageError> {
        let workspace = self.workspace().to_path_buf();
        let mut command = CommandSpec::new("rsync")
            .arg("-rltgoDzvO")
            .arg(format!("{}/", workspace.display()))
            .arg(format!("{}/", self.config.target_dir().display()));
        if self.config.delete_files() {
            command = command.arg("--delete-after");
        }
        command = command.args(
            self.config
                .exclude_files()
                .iter()
                .map(|pattern| format!("--exclude={pattern}")),
        );
        self.exec(Stage::Synchronize, command, Some(&workspace)).await?;
        Ok(())
    }

    /// Remove files deleted upstream. Returns the target paths removed.
    pub async fn prune(&mut self) -> Result<Vec<PathBuf>, StageError> {
        if !self.config.git_rm() {
            return Ok(Vec::new());
        }
        let workspace = self.workspace().to_path_buf();
        let command = CommandSpec::new("git").args(["log", "--diff-filter=D", "--summary"]);
        let result = self.exec(Stage::Prune, command, Some(&workspace)).await?;

        let paths = prune::deleted_paths(result.output_lines.iter().map(String::as_str));
        if paths.is_empty() {
            return Ok(Vec::new());
        }
        let target = self.config.target_dir().to_path_buf();
        Ok(prune::prune_deleted(&paths, &workspace, &target, self.reporter).await)
    }

    /// Write the deployed revision to the version file, if one is configured.
    pub async fn record_version(&mut self) -> Result<Option<String>, StageError> {
        let config = self.config;
        let Some(version_file) = config.version_file() else {
            return Ok(None);
        };
        let workspace = self.workspace().to_path_buf();
        let command = self.git_in_workspace().args(["describe", "--always"]);
        let result = self
            .exec(Stage::RecordVersion, command, Some(&workspace))
            .await?;

        let revision = result
            .first_line()
            .ok_or(StageError::EmptyRevision)?
            .to_string();
        tokio::fs::write(version_file, format!("{revision}\n"))
            .await
            .map_err(|source| StageError::Io {
                stage: Stage::RecordVersion,
                context: format!("writing {}", version_file.display()),
                source,
            })?;
        self.reporter.line(format!(
            "Recorded revision {revision} in {}",
            version_file.display()
        ));
        Ok(Some(revision))
    }
}
