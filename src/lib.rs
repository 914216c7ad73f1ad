//! Git-backed synchronization for collaboratively edited project records.
//!
//! A [`RepositoryHandle`] wraps one working copy. The UI calls
//! [`RepositoryHandle::auto_pull_on_load`] before reading a record and
//! [`RepositoryHandle::commit_and_push`] after writing one; both report
//! every outcome as an [`OperationResult`] rather than an error.

pub mod config;
mod error;
pub mod git;
pub mod repo;
pub mod sync;

#[cfg(test)]
mod test_support;

pub use config::Settings;
pub use error::{Result, SyncError};
pub use git::{ErrorKind, Identity, IdentitySource};
pub use repo::RepositoryHandle;
pub use sync::{
    generate_commit_message, CommitRecord, ConflictCheck, OperationResult, SyncClassification,
    SyncStatus,
};
