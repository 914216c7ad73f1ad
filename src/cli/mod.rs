pub mod commands;

use std::path::Path;

use serde::Serialize;
use tracker_sync::{OperationResult, RepositoryHandle, Result, Settings};

/// Open the repository at `path` with the saved settings.
pub fn open_handle(path: &Path) -> Result<RepositoryHandle> {
    let settings = Settings::load()?;
    RepositoryHandle::open(path, settings)
}

/// Print `value` as pretty JSON.
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Print an operation outcome. A failure exits with status 1 once its
/// message is printed.
pub fn report(result: OperationResult, json: bool) -> Result<()> {
    if json {
        print_json(&result)?;
    } else if !result.message.is_empty() {
        println!("{}", result.message);
    }

    if !result.success {
        std::process::exit(1);
    }
    Ok(())
}
