use std::sync::Mutex;
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::git::CommandRunner;
use crate::repo::RepositoryHandle;

/// When the remote was last fetched successfully.
#[derive(Debug, Clone, Copy)]
pub struct FetchState {
    pub last_fetch_at: Option<Instant>,
    pub min_interval: Duration,
}

impl FetchState {
    fn is_fresh(&self, now: Instant) -> bool {
        self.last_fetch_at
            .is_some_and(|last| now.saturating_duration_since(last) < self.min_interval)
    }
}

/// Rate-limits `git fetch` to once per interval.
///
/// The lock is held for the whole fetch, so concurrent callers on one
/// handle are serialized and the second one sees the first one's result.
#[derive(Debug)]
pub struct FetchThrottle {
    state: Mutex<FetchState>,
}

impl FetchThrottle {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            state: Mutex::new(FetchState {
                last_fetch_at: None,
                min_interval,
            }),
        }
    }

    pub fn state(&self) -> FetchState {
        *self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Fetch `remote` unless a fetch succeeded within the interval.
    ///
    /// Returns `true` when the remote is considered fresh (fetched now or
    /// recently) and `false` when the fetch failed. A failure leaves the
    /// timestamp untouched so the next call retries.
    pub fn maybe_fetch(&self, runner: &dyn CommandRunner, remote: &str, timeout: Duration) -> bool {
        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());

        if state.is_fresh(Instant::now()) {
            debug!(remote, "skipping fetch, remote fetched recently");
            return true;
        }

        let output = runner.execute(&["fetch", remote], timeout);
        if !output.success {
            warn!(remote, stderr = %output.stderr.trim(), "fetch failed");
            return false;
        }

        let now = Instant::now();
        state.last_fetch_at = Some(state.last_fetch_at.map_or(now, |last| last.max(now)));
        debug!(remote, "fetched remote");
        true
    }
}

impl RepositoryHandle {
    /// Throttled fetch of the configured remote.
    pub fn maybe_fetch(&self) -> bool {
        let settings = self.settings();
        self.throttle
            .maybe_fetch(self.runner(), &settings.remote, settings.fetch_timeout())
    }
}
