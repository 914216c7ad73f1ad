use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use std::time::Duration;

#[cfg(unix)]
use std::os::unix::fs::OpenOptionsExt;

use crate::{Result, SyncError};

/// Per-call timeouts, in seconds.
pub const PROBE_TIMEOUT_SECS: u64 = 5;
pub const COMMIT_TIMEOUT_SECS: u64 = 10;
pub const HISTORY_TIMEOUT_SECS: u64 = 10;

/// Global settings for tracker-sync
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Remote to synchronize against
    pub remote: String,

    /// Branch on the remote that local HEAD tracks
    pub branch: String,

    /// Minimum seconds between two network fetches
    pub fetch_interval_secs: u64,

    /// Timeout for fetch
    pub fetch_timeout_secs: u64,

    /// Timeout for pull and push
    pub command_timeout_secs: u64,

    /// Timeout for quick local queries (probe, diff, rev-list, config)
    pub probe_timeout_secs: u64,

    /// Secrets file, relative to the repository root
    pub secrets_path: PathBuf,

    /// Backend executable
    pub git_binary: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            remote: "origin".to_string(),
            branch: "main".to_string(),
            fetch_interval_secs: 60,
            fetch_timeout_secs: 15,
            command_timeout_secs: 30,
            probe_timeout_secs: PROBE_TIMEOUT_SECS,
            secrets_path: PathBuf::from("tools/.streamlit/secrets.toml"),
            git_binary: "git".to_string(),
        }
    }
}

impl Settings {
    /// Get the path to the config file
    pub fn config_path() -> Option<PathBuf> {
        ProjectDirs::from("", "", "tracker-sync").map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Load settings from the config file
    pub fn load() -> Result<Self> {
        let path = Self::config_path()
            .ok_or_else(|| SyncError::Config("Cannot determine config directory".to_string()))?;
        Self::load_from(&path)
    }

    /// Load settings from `path`, falling back to defaults when it is absent
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let settings: Settings = serde_json::from_str(&content)
            .map_err(|e| SyncError::Config(format!("Failed to parse config file: {}", e)))?;
        settings.validate()?;

        Ok(settings)
    }

    /// Save settings to the config file
    pub fn save(&self) -> Result<()> {
        let path = Self::config_path()
            .ok_or_else(|| SyncError::Config("Cannot determine config directory".to_string()))?;
        self.save_to(&path)
    }

    /// Save settings to `path` with restricted permissions (0600)
    pub fn save_to(&self, path: &Path) -> Result<()> {
        self.validate()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;

        #[cfg(unix)]
        {
            let mut file = std::fs::OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .mode(0o600)
                .open(path)?;
            file.write_all(content.as_bytes())?;
        }

        #[cfg(not(unix))]
        {
            std::fs::write(path, content)?;
        }

        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        validate_ref_name("remote", &self.remote)?;
        validate_ref_name("branch", &self.branch)?;
        if self.fetch_timeout_secs == 0 || self.command_timeout_secs == 0 || self.probe_timeout_secs == 0 {
            return Err(SyncError::Config("Timeouts must be greater than zero".to_string()));
        }
        if self.git_binary.trim().is_empty() {
            return Err(SyncError::Config("git_binary cannot be empty".to_string()));
        }
        if self.secrets_path.is_absolute()
            || self
                .secrets_path
                .components()
                .any(|c| matches!(c, Component::ParentDir))
        {
            return Err(SyncError::Config(format!(
                "secrets_path must stay inside the repository: '{}'",
                self.secrets_path.display()
            )));
        }
        Ok(())
    }

    /// Set a single setting by key (validates the result)
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        let mut updated = self.clone();
        match key {
            "remote" => updated.remote = value.to_string(),
            "branch" => updated.branch = value.to_string(),
            "fetch_interval_secs" => updated.fetch_interval_secs = parse_secs(key, value)?,
            "fetch_timeout_secs" => updated.fetch_timeout_secs = parse_secs(key, value)?,
            "command_timeout_secs" => updated.command_timeout_secs = parse_secs(key, value)?,
            "probe_timeout_secs" => updated.probe_timeout_secs = parse_secs(key, value)?,
            "secrets_path" => updated.secrets_path = PathBuf::from(value),
            "git_binary" => updated.git_binary = value.to_string(),
            other => {
                return Err(SyncError::Config(format!("Unknown setting: '{}'", other)));
            }
        }
        updated.validate()?;
        *self = updated;
        Ok(())
    }

    /// Remote-tracking ref of the synchronized branch, e.g. `origin/main`
    pub fn upstream(&self) -> String {
        format!("{}/{}", self.remote, self.branch)
    }

    pub fn fetch_interval(&self) -> Duration {
        Duration::from_secs(self.fetch_interval_secs)
    }

    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn command_timeout(&self) -> Duration {
        Duration::from_secs(self.command_timeout_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }
}

fn parse_secs(key: &str, value: &str) -> Result<u64> {
    value
        .trim()
        .parse::<u64>()
        .map_err(|_| SyncError::Config(format!("{} must be a whole number of seconds, got '{}'", key, value)))
}

/// Reject names git would not accept as a remote or branch.
fn validate_ref_name(field: &str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(SyncError::Config(format!("{} cannot be empty", field)));
    }
    if value.starts_with('-')
        || value.contains("..")
        || value.chars().any(|c| c.is_whitespace() || c.is_control() || "~^:?*[\\".contains(c))
    {
        return Err(SyncError::Config(format!("Invalid {} name: '{}'", field, value)));
    }
    Ok(())
}
