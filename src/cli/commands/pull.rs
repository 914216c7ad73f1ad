use std::path::Path;

use tracker_sync::Result;

use crate::cli::{open_handle, report};
use crate::ui::with_spinner;

pub fn execute(repo: &Path, json: bool) -> Result<()> {
    let handle = open_handle(repo)?;
    let result = with_spinner("Pulling remote changes...", || handle.auto_pull_on_load());

    if result.success && result.message.is_empty() && !json {
        println!("Already up to date.");
        return Ok(());
    }
    report(result, json)
}
