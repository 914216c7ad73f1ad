use std::path::{Component, Path, PathBuf};
use std::time::Duration;

use tracing::{debug, info};

use crate::config::Settings;
use crate::git::{resolve_identity, CommandRunner, GitCli, Identity, IdentitySource};
use crate::sync::FetchThrottle;
use crate::{Result, SyncError};

/// Whether `root` is inside a git working tree.
///
/// Any failure, including a timeout or a missing git binary, counts as "no".
pub fn probe_repository(runner: &dyn CommandRunner, timeout: Duration) -> bool {
    runner
        .execute(&["rev-parse", "--is-inside-work-tree"], timeout)
        .trimmed_stdout()
        .is_some_and(|out| out == "true")
}

/// One working copy and the session state tied to it.
///
/// Repository detection and identity are resolved once, at construction.
/// The fetch throttle is the only state that changes afterwards.
pub struct RepositoryHandle {
    root: PathBuf,
    is_repo: bool,
    identity: Identity,
    identity_source: IdentitySource,
    settings: Settings,
    pub(crate) throttle: FetchThrottle,
    runner: Box<dyn CommandRunner>,
}

impl std::fmt::Debug for RepositoryHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RepositoryHandle")
            .field("root", &self.root)
            .field("is_repo", &self.is_repo)
            .field("identity", &self.identity)
            .field("identity_source", &self.identity_source)
            .field("settings", &self.settings)
            .finish_non_exhaustive()
    }
}

impl RepositoryHandle {
    /// Open `path` using the git command-line binary.
    pub fn open(path: impl AsRef<Path>, settings: Settings) -> Result<Self> {
        let path = path.as_ref();
        let root = std::fs::canonicalize(path)
            .map_err(|_| SyncError::PathNotFound(path.to_path_buf()))?;
        let runner = GitCli::new(settings.git_binary.clone(), root.clone());
        Ok(Self::with_runner(root, settings, Box::new(runner)))
    }

    /// Open `root` with a caller-supplied command runner.
    pub fn with_runner(
        root: impl Into<PathBuf>,
        settings: Settings,
        runner: Box<dyn CommandRunner>,
    ) -> Self {
        let root = root.into();
        let root = std::fs::canonicalize(&root).unwrap_or(root);

        let is_repo = probe_repository(&*runner, settings.probe_timeout());
        let (identity, identity_source) = resolve_identity(
            &root.join(&settings.secrets_path),
            &*runner,
            settings.probe_timeout(),
        );
        let throttle = FetchThrottle::new(settings.fetch_interval());

        info!(
            root = %root.display(),
            is_repo,
            identity_source = %identity_source,
            "opened repository handle"
        );

        Self {
            root,
            is_repo,
            identity,
            identity_source,
            settings,
            throttle,
            runner,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn is_repository(&self) -> bool {
        self.is_repo
    }

    pub fn identity(&self) -> &Identity {
        &self.identity
    }

    pub fn identity_source(&self) -> IdentitySource {
        self.identity_source
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub(crate) fn runner(&self) -> &dyn CommandRunner {
        &*self.runner
    }

    pub(crate) fn git(&self, args: &[&str], timeout: Duration) -> crate::git::CommandOutput {
        self.runner.execute(args, timeout)
    }

    /// `path` relative to the repository root, or `None` when it resolves
    /// outside the root (or to the root itself).
    ///
    /// Relative inputs are taken relative to the root. The file need not
    /// exist.
    pub fn relative_path(&self, path: &Path) -> Option<PathBuf> {
        let joined = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        };
        let resolved = resolve(&normalize(&joined));
        let rel = resolved.strip_prefix(&self.root).ok()?;
        if rel.as_os_str().is_empty() {
            return None;
        }
        Some(rel.to_path_buf())
    }

    /// Check that commits made from this handle would be attributable and
    /// pushable.
    pub fn validate_config(&self) -> (bool, Vec<String>) {
        let mut issues = Vec::new();

        if self.identity.name.is_empty() {
            issues.push("Git user name not configured".to_string());
        }
        if self.identity.email.is_empty() {
            issues.push("Git user email not configured".to_string());
        }

        if self.is_repo {
            let remotes = self.git(&["remote", "-v"], self.settings.probe_timeout());
            if remotes.trimmed_stdout().map_or(true, str::is_empty) {
                issues.push("No git remote configured".to_string());
            }
        }

        debug!(?issues, "validated configuration");
        (issues.is_empty(), issues)
    }
}

/// Lexically collapse `.` and `..` components.
fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Canonicalize the longest existing ancestor of `path` so symlinked
/// prefixes compare equal to the canonical root.
fn resolve(path: &Path) -> PathBuf {
    if let Ok(canonical) = std::fs::canonicalize(path) {
        return canonical;
    }
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) => resolve(parent).join(name),
        _ => path.to_path_buf(),
    }
}
