// ABOUTME: Scoped ownership of the clone workspace for one run.
// ABOUTME: Removes the workspace on release, or on drop if release never happened.

use std::path::{Path, PathBuf};

use crate::diagnostics::Warning;
use crate::report::Reporter;

/// The temporary clone a run works in.
///
/// Call [`Workspace::release`] on every exit path. If the guard is dropped
/// without it (panic, cancelled future) removal still happens, without a
/// transcript entry.
#[derive(Debug)]
pub struct Workspace {
    path: PathBuf,
    clean_up: bool,
    released: bool,
}

impl Workspace {
    pub fn scoped(path: impl Into<PathBuf>, clean_up: bool) -> Self {
        Self {
            path: path.into(),
            clean_up,
            released: false,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// True when a previous run left a clone behind.
    pub fn exists(&self) -> bool {
        self.path.is_dir()
    }

    /// Remove the workspace if configured to. Returns true if it was removed.
    ///
    /// A failure to remove is a warning, not an error.
    pub async fn release(mut self, reporter: &mut Reporter) -> bool {
        self.released = true;
        if !self.clean_up || !self.exists() {
            return false;
        }

        reporter.line("Cleaning up temporary files ...");
        match tokio::fs::remove_dir_all(&self.path).await {
            Ok(()) => {
                tracing::info!(path = %self.path.display(), "removed workspace");
                true
            }
            Err(e) => {
                reporter.warn(Warning::cleanup(format!(
                    "could not remove {}: {e}",
                    self.path.display()
                )));
                false
            }
        }
    }
}

impl Drop for Workspace {
    fn drop(&mut self) {
        if self.released || !self.clean_up || !self.path.is_dir() {
            return;
        }
        if let Err(e) = std::fs::remove_dir_all(&self.path) {
            tracing::warn!(path = %self.path.display(), error = %e, "could not remove workspace");
        }
    }
}
