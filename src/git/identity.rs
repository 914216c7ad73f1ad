use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::runner::CommandRunner;
use crate::{Result, SyncError};

/// Committer identity and auto-sync policy for one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub name: String,
    pub email: String,
    pub auto_pull: bool,
    pub auto_push: bool,
}

impl Default for Identity {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            auto_pull: true,
            auto_push: true,
        }
    }
}

/// Where an [`Identity`] was resolved from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum IdentitySource {
    SecretsFile,
    GitConfig,
    Default,
}

impl std::fmt::Display for IdentitySource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            IdentitySource::SecretsFile => write!(f, "secrets file"),
            IdentitySource::GitConfig => write!(f, "git config"),
            IdentitySource::Default => write!(f, "defaults"),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SecretsFile {
    git: Option<GitSecrets>,
}

#[derive(Debug, Deserialize)]
struct GitSecrets {
    #[serde(default)]
    user_name: String,
    #[serde(default)]
    user_email: String,
    #[serde(default = "default_true")]
    auto_pull: bool,
    #[serde(default = "default_true")]
    auto_push: bool,
}

fn default_true() -> bool {
    true
}

/// Read the `[git]` table of a secrets file.
///
/// Returns `Ok(None)` when the file is absent or has no `[git]` table.
pub fn load_secrets(path: &Path) -> Result<Option<Identity>> {
    if !path.exists() {
        return Ok(None);
    }

    let content = std::fs::read_to_string(path)?;
    let secrets: SecretsFile = toml::from_str(&content)
        .map_err(|e| SyncError::Secrets(format!("{}: {}", path.display(), e)))?;

    Ok(secrets.git.map(|git| Identity {
        name: git.user_name,
        email: git.user_email,
        auto_pull: git.auto_pull,
        auto_push: git.auto_push,
    }))
}

/// Resolve identity: secrets file, then global git config, then defaults.
///
/// A readable secrets file with a `[git]` table wins outright, even when its
/// name and email are blank.
pub fn resolve_identity(
    secrets_path: &Path,
    runner: &dyn CommandRunner,
    timeout: Duration,
) -> (Identity, IdentitySource) {
    match load_secrets(secrets_path) {
        Ok(Some(identity)) => {
            debug!(path = %secrets_path.display(), "identity loaded from secrets file");
            return (identity, IdentitySource::SecretsFile);
        }
        Ok(None) => {}
        Err(e) => warn!(error = %e, "ignoring unreadable secrets file"),
    }

    let name = git_config_value(runner, "user.name", timeout);
    let email = git_config_value(runner, "user.email", timeout);
    if name.is_none() && email.is_none() {
        return (Identity::default(), IdentitySource::Default);
    }

    let identity = Identity {
        name: name.unwrap_or_default(),
        email: email.unwrap_or_default(),
        ..Identity::default()
    };
    (identity, IdentitySource::GitConfig)
}

/// Get a single git config value by key from global config.
/// Returns None if git is not installed, the key is not set, or the value is empty.
fn git_config_value(runner: &dyn CommandRunner, key: &str, timeout: Duration) -> Option<String> {
    runner
        .execute(&["config", "--global", "--get", key], timeout)
        .trimmed_stdout()
        .filter(|s| !s.is_empty())
        .map(String::from)
}
