// ABOUTME: Config scaffolding for new deployments.
// ABOUTME: Creates gitship.yml template files.

use std::path::Path;

use crate::error::{Error, Result};
use crate::types::RemoteRepository;

use super::{CONFIG_FILENAME, DeploymentConfig};

pub fn init_config(
    dir: &Path,
    repository: Option<&str>,
    target: Option<&Path>,
    force: bool,
) -> Result<()> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() && !force {
        return Err(Error::AlreadyExists(config_path));
    }

    let mut config = DeploymentConfig::template();

    if let Some(r) = repository {
        let repo = RemoteRepository::new(r).map_err(|e| Error::InvalidConfig(e.to_string()))?;
        config.remote_repository = repo.to_string();
        // Name the default target after the repository.
        let (_, name) = repo.owner_and_name();
        config.target_dir = Path::new("/var/www").join(name);
    }

    if let Some(t) = target {
        config.target_dir = t.to_path_buf();
    }

    let yaml = generate_template_yaml(&config);
    std::fs::write(&config_path, yaml)?;

    Ok(())
}

fn generate_template_yaml(config: &DeploymentConfig) -> String {
    format!(
        r#"remote_repository: {}
branch: {}
target_dir: {}

# Workspace for the clone (default: <tmp>/gd-<hash of remote_repository>)
# temp_dir: /tmp/gitship-site

# false to disable, or a path (default: <target_dir>/VERSION)
# version_file: /var/www/html/VERSION

# Remove files deleted in the latest commit
git_rm: true

# Remove every target file that is not in the repository.
# Careful: this also removes uploads and other files a CMS keeps outside git.
delete_files: false

exclude_files:
  - .git
  - LICENSE*
  - README*

clean_up: true
time_limit: 5m

backup:
  enabled: false
  # dir: /var/backups/site

composer:
  enabled: false
  options: --no-dev
  # home: /var/lib/composer

npm:
  enabled: false

email:
  on_success: false
  on_error: true
  recipients:
    - {}
"#,
        config.remote_repository,
        config.branch,
        config.target_dir.display(),
        config
            .email
            .recipients
            .first()
            .map(String::as_str)
            .unwrap_or("ops@example.com"),
    )
}
