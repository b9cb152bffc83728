// ABOUTME: External command execution for deployment stages.
// ABOUTME: Defines the CommandRunner seam and the tokio-backed ProcessRunner.

mod command;
mod error;
mod process;

pub use command::{CommandSpec, quote_arg};
pub use error::CommandError;
pub use process::ProcessRunner;

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::report::Reporter;

/// Exit status and merged output of a finished command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandResult {
    pub exit_code: i32,
    pub output_lines: Vec<String>,
}

impl CommandResult {
    pub fn success() -> Self {
        Self::default()
    }

    pub fn with_lines<I, S>(exit_code: i32, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            exit_code,
            output_lines: lines.into_iter().map(Into::into).collect(),
        }
    }

    pub fn succeeded(&self) -> bool {
        self.exit_code == 0
    }

    /// First line with visible content, trimmed.
    pub fn first_line(&self) -> Option<&str> {
        self.output_lines
            .iter()
            .map(|l| l.trim())
            .find(|l| !l.is_empty())
    }
}

/// Runs external commands on behalf of the pipeline.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run `command` to completion, streaming each output line into `reporter`.
    ///
    /// A non-zero exit status is returned as data. Only a failure to start the
    /// process, lose it, or exceed `timeout` is an error.
    async fn run(
        &self,
        command: &CommandSpec,
        working_dir: Option<&Path>,
        timeout: Option<Duration>,
        reporter: &mut Reporter,
    ) -> Result<CommandResult, CommandError>;

    /// Resolve `program` on the search path.
    fn locate(&self, program: &str) -> Option<PathBuf>;
}
