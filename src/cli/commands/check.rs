use std::path::{Path, PathBuf};

use tracker_sync::Result;

use crate::cli::{open_handle, print_json};
use crate::ui::with_spinner;

pub fn execute(repo: &Path, path: PathBuf, json: bool) -> Result<()> {
    let handle = open_handle(repo)?;
    let path = std::env::current_dir()?.join(path);
    let check = with_spinner("Checking remote for changes...", || handle.check_conflicts(&path));

    if json {
        return print_json(&check);
    }
    if check.has_conflict {
        println!("Conflict: {}", check.message);
    } else {
        println!("No remote changes to {}", path.display());
    }
    Ok(())
}
