use tracker_sync::{Result, Settings, SyncError};

pub fn show() -> Result<()> {
    let settings = Settings::load()?;
    let path = Settings::config_path()
        .map(|p| p.display().to_string())
        .unwrap_or_else(|| "-".to_string());

    println!("Config file: {}", path);
    println!();
    println!("  remote: {}", settings.remote);
    println!("  branch: {}", settings.branch);
    println!("  fetch_interval_secs: {}", settings.fetch_interval_secs);
    println!("  fetch_timeout_secs: {}", settings.fetch_timeout_secs);
    println!("  command_timeout_secs: {}", settings.command_timeout_secs);
    println!("  probe_timeout_secs: {}", settings.probe_timeout_secs);
    println!("  secrets_path: {}", settings.secrets_path.display());
    println!("  git_binary: {}", settings.git_binary);
    Ok(())
}

pub fn set(key: &str, value: &str) -> Result<()> {
    let mut settings = Settings::load()?;
    settings.set(key, value)?;
    settings.save()?;
    println!("Set {} = {}", key, value);
    Ok(())
}

pub fn path() -> Result<()> {
    let path = Settings::config_path()
        .ok_or_else(|| SyncError::Config("Cannot determine config directory".to_string()))?;
    println!("{}", path.display());
    Ok(())
}
