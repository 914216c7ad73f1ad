use std::path::Path;

use serde::Serialize;
use tracing::{debug, info};

use crate::repo::RepositoryHandle;

pub const REMOTE_CHANGED_MESSAGE: &str =
    "Someone else modified this file. Pull latest changes first to avoid conflicts.";

/// Result of a pre-push conflict probe.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConflictCheck {
    pub has_conflict: bool,
    pub message: String,
}

impl ConflictCheck {
    fn clear() -> Self {
        Self::default()
    }
}

impl RepositoryHandle {
    /// Warn when the tracked remote branch changed `path` since HEAD.
    ///
    /// Only a non-empty diff counts as a conflict. Out-of-tree paths, a
    /// failed fetch and a failed diff all report no conflict. Another writer
    /// can still push after this returns.
    pub fn check_conflicts(&self, path: &Path) -> ConflictCheck {
        let Some(rel) = self.relative_path(path) else {
            debug!(path = %path.display(), "path outside repository, no conflict possible");
            return ConflictCheck::clear();
        };
        if !self.is_repository() {
            return ConflictCheck::clear();
        }

        if !self.maybe_fetch() {
            debug!("fetch failed, skipping conflict check");
            return ConflictCheck::clear();
        }

        let range = format!("HEAD..{}", self.settings().upstream());
        let rel = rel.to_string_lossy();
        let diff = self.git(
            &["diff", "--name-only", &range, "--", &rel],
            self.settings().probe_timeout(),
        );

        match diff.trimmed_stdout() {
            Some(changed) if !changed.is_empty() => {
                info!(path = %rel, "remote has changes to file");
                ConflictCheck {
                    has_conflict: true,
                    message: REMOTE_CHANGED_MESSAGE.to_string(),
                }
            }
            _ => ConflictCheck::clear(),
        }
    }
}
