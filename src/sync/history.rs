use std::path::Path;
use std::time::Duration;

use serde::Serialize;

use crate::config::settings::HISTORY_TIMEOUT_SECS;
use crate::repo::RepositoryHandle;

const HISTORY_FORMAT: &str = "--pretty=format:%h|%an|%ar|%s";

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommitRecord {
    pub short_hash: String,
    pub author: String,
    pub relative_date: String,
    pub subject: String,
}

impl CommitRecord {
    fn parse(line: &str) -> Option<Self> {
        let parts: Vec<&str> = line.splitn(4, '|').collect();
        match parts.as_slice() {
            [hash, author, date, subject] => Some(Self {
                short_hash: hash.to_string(),
                author: author.to_string(),
                relative_date: date.to_string(),
                subject: subject.to_string(),
            }),
            _ => None,
        }
    }
}

impl RepositoryHandle {
    /// Up to `limit` commits, newest first, optionally touching `path`.
    ///
    /// Empty when there is no history or the query fails.
    pub fn history(&self, path: Option<&Path>, limit: usize) -> Vec<CommitRecord> {
        if !self.is_repository() || limit == 0 {
            return Vec::new();
        }

        let count = limit.to_string();
        let rel = path
            .and_then(|p| self.relative_path(p))
            .map(|p| p.to_string_lossy().into_owned());

        let mut args = vec!["log", "-n", count.as_str(), HISTORY_FORMAT];
        if let Some(rel) = rel.as_deref() {
            args.extend(["--", rel]);
        }

        let output = self.git(&args, Duration::from_secs(HISTORY_TIMEOUT_SECS));
        let Some(stdout) = output.trimmed_stdout() else {
            return Vec::new();
        };

        stdout
            .lines()
            .filter_map(CommitRecord::parse)
            .take(limit)
            .collect()
    }
}
