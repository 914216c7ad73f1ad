use std::path::{Path, PathBuf};

use tracker_sync::{Result, SyncClassification};

use crate::cli::{open_handle, print_json};
use crate::ui::with_spinner;

pub fn execute(repo: &Path, path: Option<PathBuf>, json: bool) -> Result<()> {
    let handle = open_handle(repo)?;
    let path = path.map(|p| std::env::current_dir().map(|cwd| cwd.join(p))).transpose()?;
    let status = with_spinner("Checking sync status...", || handle.status(path.as_deref()));

    if json {
        return print_json(&status);
    }

    println!("Repository: {}", handle.root().display());
    if !handle.is_repository() {
        println!("  Not a git repository");
        return Ok(());
    }

    println!("  Tracking: {}", handle.settings().upstream());
    let detail = match status.classification {
        SyncClassification::Ahead => format!(" ({} to push)", status.ahead_count),
        SyncClassification::Behind => format!(" ({} to pull)", status.behind_count),
        SyncClassification::Diverged => format!(
            " ({} to push, {} to pull)",
            status.ahead_count, status.behind_count
        ),
        _ => String::new(),
    };
    println!("  State: {}{}", status.classification, detail);
    println!(
        "  Last commit: {} by {} ({})",
        if status.last_commit_message.is_empty() { "-" } else { status.last_commit_message.as_str() },
        status.last_commit_author,
        status.last_commit_date
    );
    if let Some(path) = path {
        println!(
            "  {}: {}",
            path.display(),
            if status.is_file_modified { "modified" } else { "unchanged" }
        );
    }
    Ok(())
}
