use std::path::{Path, PathBuf};

use chrono::Local;
use dialoguer::Confirm;
use tracker_sync::{generate_commit_message, ErrorKind, OperationResult, Result, SyncError};

use crate::cli::{open_handle, report};
use crate::ui::with_spinner;

/// Commit message derived from the record's `project_id` and
/// `project_name`, if the file is a TOML table carrying either.
fn record_commit_message(path: &Path) -> Option<String> {
    let content = std::fs::read_to_string(path).ok()?;
    let table: toml::Table = toml::from_str(&content).ok()?;
    let project_id = table.get("project_id").and_then(|v| v.as_str());
    let project_name = table.get("project_name").and_then(|v| v.as_str());
    if project_id.is_none() && project_name.is_none() {
        return None;
    }
    Some(generate_commit_message(project_id, project_name, &Local::now()))
}

pub fn execute(
    repo: &Path,
    path: PathBuf,
    message: Option<String>,
    yes: bool,
    json: bool,
) -> Result<()> {
    let handle = open_handle(repo)?;
    let path = std::env::current_dir()?.join(path);

    let check = with_spinner("Checking remote for changes...", || handle.check_conflicts(&path));
    if check.has_conflict && !yes {
        // Scripted callers get the conflict back instead of a prompt
        if json {
            return report(OperationResult::failed(ErrorKind::Conflict, check.message), json);
        }
        println!("{}", check.message);
        let confirmed = Confirm::new()
            .with_prompt("Commit and push anyway?")
            .default(false)
            .interact()
            .map_err(|_| SyncError::Cancelled)?;

        if !confirmed {
            println!("Cancelled.");
            return Ok(());
        }
    }

    let message = message.or_else(|| record_commit_message(&path));
    let result = with_spinner("Syncing changes...", || {
        handle.commit_and_push(&path, message.as_deref())
    });
    report(result, json)
}
