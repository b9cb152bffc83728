// ABOUTME: CommandRunner backed by tokio child processes.
// ABOUTME: Drains stdout and stderr concurrently and enforces the time limit.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::process::Command;
use tokio::sync::mpsc;

use super::{CommandError, CommandResult, CommandRunner, CommandSpec};
use crate::report::Reporter;

/// Runs commands as local child processes without a shell.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessRunner;

impl ProcessRunner {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl CommandRunner for ProcessRunner {
    async fn run(
        &self,
        command: &CommandSpec,
        working_dir: Option<&Path>,
        timeout: Option<Duration>,
        reporter: &mut Reporter,
    ) -> Result<CommandResult, CommandError> {
        let rendered = command.to_string();

        let mut cmd = Command::new(command.program());
        cmd.args(command.get_args())
            .envs(command.get_env().iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        if let Some(dir) = working_dir {
            cmd.current_dir(dir);
        }

        let mut child = cmd.spawn().map_err(|source| CommandError::Spawn {
            command: rendered.clone(),
            source,
        })?;
        tracing::debug!(command = %rendered, pid = ?child.id(), "spawned command");

        // Both pipes feed one channel so lines are reported in arrival order.
        let (tx, mut rx) = mpsc::unbounded_channel();
        forward_lines(child.stdout.take(), tx.clone());
        forward_lines(child.stderr.take(), tx);

        let drain = async {
            let mut lines = Vec::new();
            while let Some(line) = rx.recv().await {
                reporter.line(&line);
                lines.push(line);
            }
            let status = child.wait().await?;
            Ok::<_, std::io::Error>((status, lines))
        };

        let finished = match timeout {
            Some(limit) => tokio::time::timeout(limit, drain).await.ok(),
            None => Some(drain.await),
        };

        let Some(finished) = finished else {
            let limit = timeout.unwrap_or_default();
            if let Err(e) = child.kill().await {
                tracing::warn!(command = %rendered, "failed to kill timed out command: {}", e);
            }
            return Err(CommandError::Timeout {
                command: rendered,
                limit,
            });
        };

        let (status, output_lines) = finished.map_err(|source| CommandError::Wait {
            command: rendered.clone(),
            source,
        })?;

        // Killed by a signal: no exit code, report as a generic failure.
        let exit_code = status.code().unwrap_or(-1);
        tracing::debug!(command = %rendered, exit_code, "command finished");

        Ok(CommandResult {
            exit_code,
            output_lines,
        })
    }

    fn locate(&self, program: &str) -> Option<PathBuf> {
        let candidate = Path::new(program);
        if candidate.components().count() > 1 {
            return is_executable(candidate).then(|| candidate.to_path_buf());
        }

        let search_path = std::env::var_os("PATH")?;
        std::env::split_paths(&search_path)
            .map(|dir| dir.join(program))
            .find(|path| is_executable(path))
    }
}

fn forward_lines<R>(stream: Option<R>, tx: mpsc::UnboundedSender<String>)
where
    R: AsyncRead + Unpin + Send + 'static,
{
    let Some(stream) = stream else {
        return;
    };

    tokio::spawn(async move {
        let mut reader = BufReader::new(stream);
        let mut buf = Vec::new();
        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => break,
                Ok(_) => {
                    let line = String::from_utf8_lossy(&buf).trim_end().to_string();
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    tracing::debug!("stopped reading command output: {}", e);
                    break;
                }
            }
        }
    });
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    std::fs::metadata(path)
        .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}
