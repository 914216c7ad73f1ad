use std::path::Path;

use serde::Serialize;
use tracing::debug;

use crate::repo::RepositoryHandle;

/// How local HEAD relates to the tracked remote branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncClassification {
    Synced,
    Ahead,
    Behind,
    Diverged,
    /// Not a repository; nothing to compare.
    Unknown,
}

impl SyncClassification {
    pub fn from_counts(ahead: u32, behind: u32) -> Self {
        match (ahead > 0, behind > 0) {
            (true, true) => SyncClassification::Diverged,
            (true, false) => SyncClassification::Ahead,
            (false, true) => SyncClassification::Behind,
            (false, false) => SyncClassification::Synced,
        }
    }
}

impl std::fmt::Display for SyncClassification {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncClassification::Synced => write!(f, "synced"),
            SyncClassification::Ahead => write!(f, "ahead"),
            SyncClassification::Behind => write!(f, "behind"),
            SyncClassification::Diverged => write!(f, "diverged"),
            SyncClassification::Unknown => write!(f, "unknown"),
        }
    }
}

/// Display-only snapshot of sync state. Recomputed on every call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SyncStatus {
    pub ahead_count: u32,
    pub behind_count: u32,
    pub classification: SyncClassification,
    pub last_commit_author: String,
    pub last_commit_date: String,
    pub last_commit_message: String,
    pub is_file_modified: bool,
}

impl Default for SyncStatus {
    fn default() -> Self {
        Self {
            ahead_count: 0,
            behind_count: 0,
            classification: SyncClassification::Unknown,
            last_commit_author: "Unknown".to_string(),
            last_commit_date: "Unknown".to_string(),
            last_commit_message: String::new(),
            is_file_modified: false,
        }
    }
}

impl SyncStatus {
    pub fn is_up_to_date(&self) -> bool {
        self.behind_count == 0
    }
}

pub(crate) const LAST_COMMIT_FORMAT: &str = "--pretty=format:%an|%ar|%s";

/// Parse `rev-list --count` output.
pub(crate) fn parse_count(stdout: &str) -> Option<u32> {
    let trimmed = stdout.trim();
    if trimmed.is_empty() {
        return Some(0);
    }
    trimmed.parse().ok()
}

impl RepositoryHandle {
    /// Number of commits in `range`, or `None` if the query failed.
    pub(crate) fn count_commits(&self, range: &str) -> Option<u32> {
        let output = self.git(&["rev-list", "--count", range], self.settings().probe_timeout());
        output.trimmed_stdout().and_then(parse_count)
    }

    /// Commits on the tracked remote branch that HEAD lacks.
    pub fn behind_count(&self) -> Option<u32> {
        self.count_commits(&format!("HEAD..{}", self.settings().upstream()))
    }

    /// Commits on HEAD that the tracked remote branch lacks.
    pub fn ahead_count(&self) -> Option<u32> {
        self.count_commits(&format!("{}..HEAD", self.settings().upstream()))
    }

    /// Compute sync state, optionally scoped to one file for the last-commit
    /// and modified fields.
    ///
    /// The ahead and behind counts are two separate queries; HEAD may move
    /// between them. Failed queries count as zero.
    pub fn status(&self, path: Option<&Path>) -> SyncStatus {
        let mut status = SyncStatus::default();
        if !self.is_repository() {
            return status;
        }

        let timeout = self.settings().probe_timeout();
        let rel = path.and_then(|p| self.relative_path(p));
        let rel_str = rel.as_ref().map(|p| p.to_string_lossy().into_owned());

        let mut args = vec!["log", "-1", LAST_COMMIT_FORMAT];
        if let Some(rel) = rel_str.as_deref() {
            args.extend(["--", rel]);
        }
        let log = self.git(&args, timeout);
        if let Some(line) = log.trimmed_stdout() {
            let parts: Vec<&str> = line.splitn(3, '|').collect();
            if let [author, date, message] = parts.as_slice() {
                status.last_commit_author = author.to_string();
                status.last_commit_date = date.to_string();
                status.last_commit_message = message.to_string();
            }
        }

        if let Some(rel) = rel_str.as_deref() {
            let porcelain = self.git(&["status", "--porcelain", "--", rel], timeout);
            status.is_file_modified = porcelain.trimmed_stdout().is_some_and(|out| !out.is_empty());
        }

        // Advisory only: a failed fetch still reports counts from the last
        // known remote state.
        self.maybe_fetch();

        status.ahead_count = self.ahead_count().unwrap_or(0);
        status.behind_count = self.behind_count().unwrap_or(0);
        status.classification =
            SyncClassification::from_counts(status.ahead_count, status.behind_count);

        debug!(
            ahead = status.ahead_count,
            behind = status.behind_count,
            classification = %status.classification,
            "computed sync status"
        );
        status
    }
}
