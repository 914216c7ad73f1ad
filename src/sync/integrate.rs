use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, TimeZone};
use tracing::{debug, info, warn};

use super::OperationResult;
use crate::config::settings::COMMIT_TIMEOUT_SECS;
use crate::git::{classify, classify_or_unknown, classify_preferring, truncate, ErrorKind, RAW_MESSAGE_LIMIT};
use crate::repo::RepositoryHandle;

impl RepositoryHandle {
    /// Bring the working copy up to date before a record is loaded.
    ///
    /// Anything short of a failed fetch or a failed pull reports success, so
    /// the record still loads.
    pub fn auto_pull_on_load(&self) -> OperationResult {
        if !self.is_repository() {
            return OperationResult::ok("");
        }
        if !self.identity().auto_pull {
            return OperationResult::ok("Auto-pull disabled");
        }

        if !self.maybe_fetch() {
            return OperationResult::failed(ErrorKind::Network, "Could not reach remote repository");
        }

        // No tracking branch, detached HEAD and the like: load what we have.
        let Some(behind) = self.behind_count() else {
            debug!("behind count unavailable, skipping pull");
            return OperationResult::ok("");
        };
        if behind == 0 {
            return OperationResult::ok("");
        }

        let settings = self.settings();
        info!(behind, upstream = %settings.upstream(), "pulling remote changes");
        let pull = self.git(
            &["pull", "--rebase", &settings.remote, &settings.branch],
            settings.command_timeout(),
        );
        if pull.success {
            return OperationResult::ok(format!("Pulled {} change(s) from remote", behind));
        }

        warn!(stderr = %pull.stderr.trim(), "pull failed");
        // A stopped rebase leaves the working copy mid-merge whatever else
        // the output mentions.
        match classify_preferring(&pull.stderr, ErrorKind::Conflict) {
            Some(ErrorKind::Conflict) => OperationResult::failed(
                ErrorKind::Conflict,
                "Merge conflict detected. Please resolve manually.",
            ),
            Some(ErrorKind::Network) => {
                OperationResult::failed(ErrorKind::Network, "Network error - working offline")
            }
            other => OperationResult::failed(
                other.unwrap_or(ErrorKind::Unclassified),
                format!("Pull failed: {}", truncate(&pull.stderr, RAW_MESSAGE_LIMIT)),
            ),
        }
    }

    /// Stage, commit and push a single saved file.
    ///
    /// Only `path` is staged and committed, so unrelated edits in the same
    /// working copy stay out of the commit. Calling this again on an
    /// unchanged file is a cheap no-op.
    pub fn commit_and_push(&self, path: &Path, message: Option<&str>) -> OperationResult {
        if !self.is_repository() {
            return OperationResult::ok("Not a git repository");
        }
        if !self.identity().auto_push {
            return OperationResult::ok("Auto-push disabled");
        }
        let Some(rel) = self.relative_path(path) else {
            return OperationResult::failed(ErrorKind::OutsideRepository, "File is outside repository");
        };

        let settings = self.settings();
        let quick = settings.probe_timeout();
        let rel_str = rel.to_string_lossy();

        let changes = self.git(&["status", "--porcelain", "--", &rel_str], quick);
        if changes.trimmed_stdout().is_some_and(str::is_empty) {
            debug!(path = %rel_str, "no changes to commit");
            return OperationResult::ok("No changes to commit");
        }

        let add = self.git(&["add", "--", &rel_str], quick);
        if !add.success {
            return OperationResult::failed(
                classify_or_unknown(&add.stderr),
                format!("Could not stage file: {}", add.stderr.trim()),
            );
        }

        let message = match message.map(str::trim).filter(|m| !m.is_empty()) {
            Some(m) => m.to_string(),
            None => default_commit_message(&rel),
        };
        let commit = self.git(
            &["commit", "-m", &message, "--", &rel_str],
            Duration::from_secs(COMMIT_TIMEOUT_SECS),
        );
        if !commit.success {
            // git reports "nothing to commit" on stdout
            let detail = format!("{}\n{}", commit.stderr, commit.stdout);
            if classify(&detail) == Some(ErrorKind::NothingToCommit) {
                debug!(path = %rel_str, "file already committed");
                return OperationResult::ok("No changes to commit");
            }
            let shown = if commit.stderr.trim().is_empty() {
                commit.stdout.trim()
            } else {
                commit.stderr.trim()
            };
            return OperationResult::failed(
                classify_or_unknown(shown),
                format!("Commit failed: {}", shown),
            );
        }
        info!(path = %rel_str, %message, "committed");

        let push = self.git(
            &["push", &settings.remote, &settings.branch],
            settings.command_timeout(),
        );
        if push.success {
            info!(upstream = %settings.upstream(), "pushed");
            return OperationResult::ok("Changes synced successfully");
        }

        warn!(stderr = %push.stderr.trim(), "push failed");
        match classify(&push.stderr) {
            Some(ErrorKind::Network) => OperationResult::failed(
                ErrorKind::Network,
                "Network error - changes saved locally but not synced",
            ),
            Some(ErrorKind::Permission) => OperationResult::failed(
                ErrorKind::Permission,
                "Permission denied - contact repository admin",
            ),
            Some(ErrorKind::PushRejected) => OperationResult::failed(
                ErrorKind::PushRejected,
                "Push rejected - remote has changes. Pull first.",
            ),
            other => OperationResult::failed(
                other.unwrap_or(ErrorKind::Unclassified),
                format!("Push failed: {}", truncate(&push.stderr, RAW_MESSAGE_LIMIT)),
            ),
        }
    }
}

fn default_commit_message(rel: &Path) -> String {
    let name = rel
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| rel.to_string_lossy().into_owned());
    format!("Update {}", name)
}

/// Commit message naming a project record, e.g.
/// `Update P-001: Tumour imaging - 2024-05-01 14:30`.
pub fn generate_commit_message<Tz>(
    project_id: Option<&str>,
    project_name: Option<&str>,
    at: &DateTime<Tz>,
) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    format!(
        "Update {}: {} - {}",
        project_id.unwrap_or("Unknown"),
        project_name.unwrap_or("Unknown Project"),
        at.format("%Y-%m-%d %H:%M")
    )
}
