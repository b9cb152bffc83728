// ABOUTME: Path normalization and writability probes used by validation.
// ABOUTME: Probing creates and immediately removes a scratch file.

use std::path::{Path, PathBuf};

/// Replace a leading `~` component with `$HOME`.
pub(crate) fn expand_home(path: &Path) -> PathBuf {
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_path_buf();
    };
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(rest),
        None => path.to_path_buf(),
    }
}

/// Drop trailing `/` and `\` separators. `/` itself becomes empty.
pub(crate) fn strip_separators(path: &Path) -> PathBuf {
    let raw = path.to_string_lossy();
    PathBuf::from(raw.trim_end_matches(&['/', '\\'][..]))
}

/// Expand `~` then strip trailing separators.
pub(crate) fn normalize(path: &Path) -> PathBuf {
    strip_separators(&expand_home(path))
}

pub(crate) fn is_empty(path: &Path) -> bool {
    path.as_os_str().is_empty()
}

/// True when `path` is a directory this process can create files in.
pub(crate) fn is_writable_dir(path: &Path) -> bool {
    path.is_dir()
        && tempfile::Builder::new()
            .prefix(".gitship-probe-")
            .tempfile_in(path)
            .is_ok()
}
