// ABOUTME: Removes files from the target that were deleted upstream.
// ABOUTME: Paths come from `git log --diff-filter=D --summary` output.

use std::collections::HashSet;
use std::path::{Component, Path, PathBuf};

use crate::diagnostics::Warning;
use crate::report::Reporter;

/// Paths named by ` delete mode <mode> <path>` lines, first occurrence order.
///
/// Anything else in the log output is ignored. Paths may contain spaces.
pub fn deleted_paths<'a, I>(log_lines: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    let mut paths = Vec::new();
    for line in log_lines {
        let Some(rest) = line.trim_start().strip_prefix("delete mode ") else {
            continue;
        };
        let Some((_mode, path)) = rest.split_once(' ') else {
            continue;
        };
        let path = path.trim_end();
        if !path.is_empty() && seen.insert(path.to_string()) {
            paths.push(path.to_string());
        }
    }
    paths
}

/// Only plain relative paths can be pruned; nothing may escape the target.
fn is_contained(path: &Path) -> bool {
    path.components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir))
}

/// Remove each deleted path from `target` unless it still exists in `workspace`.
///
/// Returns the target paths that were removed. Failures become warnings.
pub async fn prune_deleted(
    paths: &[String],
    workspace: &Path,
    target: &Path,
    reporter: &mut Reporter,
) -> Vec<PathBuf> {
    let mut removed = Vec::new();
    for relative in paths {
        let relative_path = Path::new(relative);
        if !is_contained(relative_path) {
            tracing::warn!(path = %relative, "refusing to prune path outside the target");
            continue;
        }
        // Re-added upstream since the deletion.
        if tokio::fs::symlink_metadata(workspace.join(relative_path))
            .await
            .is_ok()
        {
            continue;
        }

        let target_path = target.join(relative_path);
        if tokio::fs::symlink_metadata(&target_path).await.is_err() {
            continue;
        }

        reporter.line(format!("Removing file {}", target_path.display()));
        if let Err(e) = tokio::fs::remove_file(&target_path).await {
            reporter.warn(Warning::prune(format!(
                "could not remove {}: {e}",
                target_path.display()
            )));
            continue;
        }

        if let Some(parent) = target_path.parent()
            && parent != target
            && parent.starts_with(target)
        {
            // Fails harmlessly when the directory still has entries.
            let _ = tokio::fs::remove_dir(parent).await;
        }
        removed.push(target_path);
    }
    removed
}
