use std::path::Path;
use std::time::Duration;

use serde::Serialize;
use tracker_sync::git::{CommandRunner, GitCli};
use tracker_sync::Result;

use crate::cli::{open_handle, print_json};

#[derive(Serialize)]
struct Report<'a> {
    git: Option<String>,
    repository: bool,
    identity_source: String,
    user_name: &'a str,
    user_email: &'a str,
    auto_pull: bool,
    auto_push: bool,
    issues: Vec<String>,
}

fn git_version(binary: &str) -> Option<String> {
    GitCli::new(binary, std::env::temp_dir())
        .execute(&["--version"], Duration::from_secs(5))
        .trimmed_stdout()
        .map(String::from)
}

pub fn execute(repo: &Path, json: bool) -> Result<()> {
    let handle = open_handle(repo)?;
    let identity = handle.identity();
    let (valid, mut issues) = handle.validate_config();

    let git = git_version(&handle.settings().git_binary);
    if git.is_none() {
        issues.insert(0, format!("{} not found. Please install it.", handle.settings().git_binary));
    }

    if json {
        return print_json(&Report {
            git,
            repository: handle.is_repository(),
            identity_source: handle.identity_source().to_string(),
            user_name: &identity.name,
            user_email: &identity.email,
            auto_pull: identity.auto_pull,
            auto_push: identity.auto_push,
            issues,
        });
    }

    println!("Checking prerequisites...\n");
    match git {
        Some(version) => println!("  Git: OK ({})", version),
        None => println!("  Git: MISSING"),
    }
    println!(
        "  Repository: {}",
        if handle.is_repository() { "OK" } else { "NOT A GIT REPOSITORY" }
    );
    println!("  Identity ({}):", handle.identity_source());
    println!("    Name: {}", if identity.name.is_empty() { "-" } else { identity.name.as_str() });
    println!("    Email: {}", if identity.email.is_empty() { "-" } else { identity.email.as_str() });
    println!("    Auto-pull: {}", if identity.auto_pull { "on" } else { "off" });
    println!("    Auto-push: {}", if identity.auto_push { "on" } else { "off" });
    println!();

    if valid && issues.is_empty() {
        println!("All checks passed.");
    } else {
        println!("Issues:");
        for issue in &issues {
            println!("  - {}", issue);
        }
    }
    Ok(())
}
