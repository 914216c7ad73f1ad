pub mod conflict;
pub mod history;
pub mod integrate;
pub mod status;
pub mod throttle;

use serde::Serialize;

use crate::git::ErrorKind;

pub use conflict::ConflictCheck;
pub use history::CommitRecord;
pub use integrate::generate_commit_message;
pub use status::{SyncClassification, SyncStatus};
pub use throttle::{FetchState, FetchThrottle};

/// Outcome of a mutating sync operation.
///
/// Failures are data, not errors: `kind` names the classified cause so
/// callers need not match on `message`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperationResult {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<ErrorKind>,
}

impl OperationResult {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: message.into(),
            kind: None,
        }
    }

    pub fn failed(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            kind: Some(kind),
        }
    }
}
