use std::path::{Path, PathBuf};

use tracker_sync::Result;

use crate::cli::{open_handle, print_json};

pub fn execute(repo: &Path, path: Option<PathBuf>, limit: usize, json: bool) -> Result<()> {
    let handle = open_handle(repo)?;
    let path = path.map(|p| std::env::current_dir().map(|cwd| cwd.join(p))).transpose()?;
    let commits = handle.history(path.as_deref(), limit);

    if json {
        return print_json(&commits);
    }
    if commits.is_empty() {
        println!("No history.");
        return Ok(());
    }

    println!("{:<10} {:<20} {:<16} SUBJECT", "COMMIT", "AUTHOR", "WHEN");
    println!("{}", "-".repeat(72));
    for commit in commits {
        println!(
            "{:<10} {:<20} {:<16} {}",
            commit.short_hash, commit.author, commit.relative_date, commit.subject
        );
    }
    Ok(())
}
