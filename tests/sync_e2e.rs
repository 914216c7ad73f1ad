mod common;

use std::fs;
use std::path::Path;

use common::{edit, git_available, Fixture, OTHER_RECORD, RECORD};
use tracker_sync::{ErrorKind, OperationResult, RepositoryHandle, Settings, SyncClassification};

macro_rules! require_git {
    () => {
        if !git_available() {
            eprintln!("git not on PATH, skipping");
            return;
        }
    };
}

#[test]
fn save_then_pull_on_another_client() {
    require_git!();
    let fx = Fixture::new();

    let alice = Fixture::open(&fx.alice);
    assert!(alice.is_repository());
    let path = edit(&fx.alice, RECORD, "project_id = \"P-001\"\nstatus = \"active\"\n");

    assert_eq!(
        alice.commit_and_push(&path, None),
        OperationResult::ok("Changes synced successfully")
    );
    assert_eq!(
        alice.commit_and_push(&path, None),
        OperationResult::ok("No changes to commit")
    );

    let bob = Fixture::open(&fx.bob);
    let status = bob.status(Some(Path::new(RECORD)));
    assert_eq!(status.behind_count, 1);
    assert_eq!(status.ahead_count, 0);
    assert_eq!(status.classification, SyncClassification::Behind);

    assert_eq!(
        bob.auto_pull_on_load(),
        OperationResult::ok("Pulled 1 change(s) from remote")
    );
    let pulled = fs::read_to_string(fx.bob.join(RECORD)).unwrap();
    assert!(pulled.contains("status = \"active\""));

    // Already current: no pull is attempted
    assert_eq!(bob.auto_pull_on_load(), OperationResult::ok(""));
    assert_eq!(bob.status(None).classification, SyncClassification::Synced);
}

#[test]
fn conflicting_edits_are_detected_and_rejected() {
    require_git!();
    let fx = Fixture::new();

    let alice = Fixture::open(&fx.alice);
    let path = edit(&fx.alice, RECORD, "project_id = \"P-001\"\nstatus = \"on-hold\"\n");
    assert!(alice.commit_and_push(&path, Some("Put P-001 on hold")).success);

    let bob = Fixture::open(&fx.bob);
    let check = bob.check_conflicts(Path::new(RECORD));
    assert!(check.has_conflict);
    assert!(!check.message.is_empty());

    // Untouched on the remote
    assert!(!bob.check_conflicts(Path::new(OTHER_RECORD)).has_conflict);

    let path = edit(&fx.bob, RECORD, "project_id = \"P-001\"\nstatus = \"done\"\n");
    let result = bob.commit_and_push(&path, None);
    assert_eq!(
        result,
        OperationResult::failed(
            ErrorKind::PushRejected,
            "Push rejected - remote has changes. Pull first."
        )
    );

    let status = bob.status(None);
    assert_eq!(status.ahead_count, 1);
    assert_eq!(status.behind_count, 1);
    assert_eq!(status.classification, SyncClassification::Diverged);
}

#[test]
fn only_the_saved_file_is_committed() {
    require_git!();
    let fx = Fixture::new();

    let alice = Fixture::open(&fx.alice);
    let saved = edit(&fx.alice, RECORD, "project_id = \"P-001\"\nstatus = \"review\"\n");
    edit(&fx.alice, OTHER_RECORD, "project_id = \"P-002\"\nstatus = \"draft\"\n");

    assert!(alice.commit_and_push(&saved, None).success);

    let status = alice.status(Some(Path::new(OTHER_RECORD)));
    assert!(status.is_file_modified);
    assert_eq!(status.classification, SyncClassification::Synced);

    let history = alice.history(Some(Path::new(RECORD)), 10);
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].subject, "Update project.toml");
    assert_eq!(history[0].author, "Alice");
    assert_eq!(history[1].subject, "Add P-001");
}

#[test]
fn new_record_files_are_committed() {
    require_git!();
    let fx = Fixture::new();

    let alice = Fixture::open(&fx.alice);
    fs::create_dir_all(fx.alice.join("records/p3")).unwrap();
    let path = edit(&fx.alice, "records/p3/project.toml", "project_id = \"P-003\"\n");

    assert_eq!(
        alice.commit_and_push(&path, None),
        OperationResult::ok("Changes synced successfully")
    );
}

#[test]
fn plain_directory_degrades_to_no_ops() {
    require_git!();
    let dir = tempfile::tempdir().unwrap();
    let handle = RepositoryHandle::open(dir.path(), Fixture::settings()).unwrap();

    assert!(!handle.is_repository());
    assert_eq!(handle.auto_pull_on_load(), OperationResult::ok(""));
    assert_eq!(
        handle.commit_and_push(&dir.path().join("project.toml"), None),
        OperationResult::ok("Not a git repository")
    );
    assert!(!handle.check_conflicts(&dir.path().join("project.toml")).has_conflict);
    assert!(handle.history(None, 10).is_empty());
    assert_eq!(handle.status(None).classification, SyncClassification::Unknown);
}

#[test]
fn missing_git_binary_means_not_a_repository() {
    let dir = tempfile::tempdir().unwrap();
    let settings = Settings {
        git_binary: "tracker-sync-missing-git".to_string(),
        ..Settings::default()
    };
    let handle = RepositoryHandle::open(dir.path(), settings).unwrap();

    assert!(!handle.is_repository());
    assert_eq!(
        handle.commit_and_push(&dir.path().join("project.toml"), None),
        OperationResult::ok("Not a git repository")
    );
}

#[test]
fn unreachable_remote_fails_pull() {
    require_git!();
    let fx = Fixture::new();
    fs::remove_dir_all(&fx.remote).unwrap();

    let bob = Fixture::open(&fx.bob);
    let result = bob.auto_pull_on_load();
    assert!(!result.success);
    assert_eq!(result.message, "Could not reach remote repository");
}
