// ABOUTME: Test support utilities.
// ABOUTME: Provides a recording CommandRunner, a recording Mailer, and deploy fixtures.

#![allow(dead_code)]

use async_trait::async_trait;
use gitship::config::DeploymentConfig;
use gitship::notify::{Mailer, Notification, NotifyError};
use gitship::report::Reporter;
use gitship::runner::{CommandError, CommandResult, CommandRunner, CommandSpec};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, Once};
use std::time::Duration;
use tempfile::TempDir;

static TRACING_INIT: Once = Once::new();

/// Initialize tracing for tests. Safe to call multiple times.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::EnvFilter;
        let filter = EnvFilter::from_default_env().add_directive("gitship=debug".parse().unwrap());
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .try_init()
            .ok();
    });
}

pub const REPOSITORY: &str = "git@github.com:acme/site.git";
pub const REVISION: &str = "v1.4.0-3-g9f1c2ab";
pub const ARCHIVE_BYTES: usize = 2048;

/// One command the pipeline asked to run.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub command: CommandSpec,
    pub working_dir: Option<PathBuf>,
    pub timeout: Option<Duration>,
}

impl RecordedCall {
    pub fn rendered(&self) -> String {
        self.command.to_string()
    }
}

#[derive(Debug, Clone)]
enum Scripted {
    Result(CommandResult),
    Timeout,
    SpawnFailure,
}

/// CommandRunner that records every call and fakes the side effects the
/// pipeline depends on (`git clone` creates the workspace, `tar` writes the
/// archive).
#[derive(Debug, Default)]
pub struct MockRunner {
    calls: Mutex<Vec<RecordedCall>>,
    scripts: Mutex<Vec<(String, Scripted)>>,
    missing: HashSet<String>,
}

impl MockRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pretend `binary` is not installed.
    pub fn without(mut self, binary: &str) -> Self {
        self.missing.insert(binary.to_string());
        self
    }

    /// Commands whose rendered line contains `needle` return `result`.
    pub fn respond(self, needle: &str, result: CommandResult) -> Self {
        self.script(needle, Scripted::Result(result))
    }

    /// Commands whose rendered line contains `needle` exit with `code`.
    pub fn fail(self, needle: &str, code: i32) -> Self {
        self.respond(needle, CommandResult::with_lines(code, [format!("{needle}: failed")]))
    }

    pub fn time_out(self, needle: &str) -> Self {
        self.script(needle, Scripted::Timeout)
    }

    pub fn refuse_to_spawn(self, needle: &str) -> Self {
        self.script(needle, Scripted::SpawnFailure)
    }

    fn script(self, needle: &str, scripted: Scripted) -> Self {
        self.scripts
            .lock()
            .unwrap()
            .push((needle.to_string(), scripted));
        self
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Rendered command lines, in call order.
    pub fn commands(&self) -> Vec<String> {
        self.calls().iter().map(RecordedCall::rendered).collect()
    }

    pub fn find(&self, needle: &str) -> Option<RecordedCall> {
        self.calls()
            .into_iter()
            .find(|c| c.rendered().contains(needle))
    }

    pub fn position(&self, needle: &str) -> Option<usize> {
        self.commands().iter().position(|c| c.contains(needle))
    }

    fn default_result(command: &CommandSpec) -> CommandResult {
        let args = command.get_args();
        if command.program() == "whoami" {
            return CommandResult::with_lines(0, ["deploy"]);
        }
        if args.iter().any(|a| a == "--version") {
            let name = Path::new(command.program())
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            return CommandResult::with_lines(0, [format!("{name} version 1.0.0")]);
        }
        if command.program() == "git" && command.has_arg("clone") {
            if let Some(dest) = args.last() {
                std::fs::create_dir_all(Path::new(dest).join(".git")).unwrap();
            }
            return CommandResult::with_lines(0, ["Cloning into 'site'..."]);
        }
        if command.program() == "tar"
            && let Some(i) = args.iter().position(|a| a == "-czf")
        {
            std::fs::write(&args[i + 1], vec![0u8; ARCHIVE_BYTES]).unwrap();
        }
        if command.has_arg("describe") {
            return CommandResult::with_lines(0, [REVISION]);
        }
        CommandResult::success()
    }
}

#[async_trait]
impl CommandRunner for MockRunner {
    async fn run(
        &self,
        command: &CommandSpec,
        working_dir: Option<&Path>,
        timeout: Option<Duration>,
        reporter: &mut Reporter,
    ) -> Result<CommandResult, CommandError> {
        self.calls.lock().unwrap().push(RecordedCall {
            command: command.clone(),
            working_dir: working_dir.map(Path::to_path_buf),
            timeout,
        });

        let rendered = command.to_string();
        let scripted = self
            .scripts
            .lock()
            .unwrap()
            .iter()
            .find(|(needle, _)| rendered.contains(needle.as_str()))
            .map(|(_, s)| s.clone());

        let result = match scripted {
            Some(Scripted::Result(result)) => result,
            Some(Scripted::Timeout) => {
                return Err(CommandError::Timeout {
                    command: rendered,
                    limit: timeout.unwrap_or_default(),
                });
            }
            Some(Scripted::SpawnFailure) => {
                return Err(CommandError::Spawn {
                    command: rendered,
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "not found"),
                });
            }
            None => Self::default_result(command),
        };

        for line in &result.output_lines {
            reporter.line(line.clone());
        }
        Ok(result)
    }

    fn locate(&self, program: &str) -> Option<PathBuf> {
        if self.missing.contains(program) {
            None
        } else {
            Some(PathBuf::from("/usr/bin").join(program))
        }
    }
}

/// Mailer that keeps every notification instead of sending it.
#[derive(Debug, Default)]
pub struct MockMailer {
    sent: Mutex<Vec<Notification>>,
    failing: bool,
}

impl MockMailer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            sent: Mutex::default(),
            failing: true,
        }
    }

    pub fn sent(&self) -> Vec<Notification> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl Mailer for MockMailer {
    async fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        if self.failing {
            return Err(NotifyError::Transport("connection refused".to_string()));
        }
        self.sent.lock().unwrap().push(notification.clone());
        Ok(())
    }
}

/// Target, workspace, and backup directories under one temp root.
pub struct Fixture {
    pub root: TempDir,
    pub target: PathBuf,
    pub workspace: PathBuf,
    pub backups: PathBuf,
}

impl Fixture {
    pub fn new() -> Self {
        let root = tempfile::tempdir().unwrap();
        let target = root.path().join("www");
        let backups = root.path().join("backups");
        std::fs::create_dir(&target).unwrap();
        std::fs::create_dir(&backups).unwrap();
        let workspace = root.path().join("work").join("gd-site");
        std::fs::create_dir(root.path().join("work")).unwrap();
        Self {
            root,
            target,
            workspace,
            backups,
        }
    }

    /// Minimal config pointing at the fixture directories, notifying on both outcomes.
    pub fn config(&self) -> DeploymentConfig {
        let mut config = DeploymentConfig::new(REPOSITORY, &self.target);
        config.branch = "main".to_string();
        config.temp_dir = Some(self.workspace.clone());
        config.email.on_success = true;
        config.email.on_error = true;
        config.email.recipients = vec!["ops@example.com".to_string()];
        config
    }

    /// Simulate a clone left behind by an earlier run.
    pub fn existing_workspace(&self) {
        std::fs::create_dir_all(self.workspace.join(".git")).unwrap();
    }

    pub fn target_file(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.target.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, contents).unwrap();
        path
    }

    pub fn workspace_file(&self, relative: &str, contents: &str) -> PathBuf {
        let path = self.workspace.join(relative);
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&path, contents).unwrap();
        path
    }

    /// Every entry under `dir`, relative and sorted.
    pub fn listing(dir: &Path) -> Vec<String> {
        let mut entries = Vec::new();
        collect(dir, dir, &mut entries);
        entries.sort();
        entries
    }
}

fn collect(root: &Path, dir: &Path, entries: &mut Vec<String>) {
    let Ok(read) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in read.flatten() {
        let path = entry.path();
        entries.push(
            path.strip_prefix(root)
                .unwrap()
                .to_string_lossy()
                .into_owned(),
        );
        if path.is_dir() {
            collect(root, &path, entries);
        }
    }
}
