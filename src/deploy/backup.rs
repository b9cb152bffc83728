// ABOUTME: Naming and command line for the pre-sync target snapshot.
// ABOUTME: Archives are gzipped tarballs named after the target and a timestamp.

use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};

use crate::runner::CommandSpec;
use crate::types::short_digest;

/// `<backup_dir>/<basename>-<digest of target>-<YYYYmmddHHMMSS>.tar.gz`
pub fn archive_path(backup_dir: &Path, target: &Path, at: DateTime<Local>) -> PathBuf {
    let basename = target
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "root".to_string());
    let digest = short_digest(&target.to_string_lossy());
    let stamp = at.format("%Y%m%d%H%M%S");
    backup_dir.join(format!("{basename}-{digest}-{stamp}.tar.gz"))
}

/// `tar` invocation that archives `target` while skipping the workspace,
/// and the backup directory itself when it lives inside the target.
pub fn archive_command(
    archive: &Path,
    target: &Path,
    workspace: &Path,
    backup_dir: &Path,
) -> CommandSpec {
    let mut command = CommandSpec::new("tar").arg(format!("--exclude={}*", workspace.display()));
    if backup_dir.starts_with(target) {
        command = command.arg(format!("--exclude={}*", backup_dir.display()));
    }
    command.arg("-czf").path_arg(archive).path_arg(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn archive_name_has_basename_digest_and_stamp() {
        let at = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        let path = archive_path(Path::new("/backups"), Path::new("/var/www/site"), at);

        let name = path.file_name().unwrap().to_string_lossy().into_owned();
        let digest = short_digest("/var/www/site");
        assert_eq!(name, format!("site-{digest}-20240309140507.tar.gz"));
        assert_eq!(path.parent(), Some(Path::new("/backups")));
    }

    #[test]
    fn command_excludes_workspace() {
        let command = archive_command(
            Path::new("/backups/site.tar.gz"),
            Path::new("/var/www/site"),
            Path::new("/tmp/gd-abc"),
            Path::new("/backups"),
        );
        assert_eq!(
            command.get_args(),
            [
                "--exclude=/tmp/gd-abc*",
                "-czf",
                "/backups/site.tar.gz",
                "/var/www/site"
            ]
        );
    }

    #[test]
    fn command_excludes_backup_dir_inside_target() {
        let command = archive_command(
            Path::new("/var/www/site/.backups/site.tar.gz"),
            Path::new("/var/www/site"),
            Path::new("/tmp/gd-abc"),
            Path::new("/var/www/site/.backups"),
        );
        assert!(command.has_arg("--exclude=/var/www/site/.backups*"));
    }
}
