use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod cli;
mod ui;

#[derive(Parser)]
#[command(name = "tracker-sync")]
#[command(about = "Keep project-tracking records in sync through git")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Repository working copy
    #[arg(short = 'C', long, global = true, default_value = ".")]
    repo: PathBuf,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Enable debug logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show ahead/behind state and the last commit
    Status {
        /// Record file to report on
        path: Option<PathBuf>,
    },

    /// Pull remote changes (what the UI does before loading a record)
    Pull,

    /// Commit and push one record (what the UI does after saving it)
    Save {
        /// Record file that was saved
        path: PathBuf,

        /// Commit message (derived from the record if omitted)
        #[arg(short, long)]
        message: Option<String>,

        /// Push even if the remote changed the file
        #[arg(short, long)]
        yes: bool,
    },

    /// Check whether the remote changed a record
    Check {
        /// Record file
        path: PathBuf,
    },

    /// Show recent commits
    Log {
        /// Only commits touching this file
        path: Option<PathBuf>,

        /// Maximum number of commits
        #[arg(short = 'n', long, default_value_t = 10)]
        limit: usize,
    },

    /// Check git, identity and remote configuration
    Doctor,

    /// Manage settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show current settings
    Show,

    /// Change a setting
    Set {
        /// Setting name (e.g., branch)
        key: String,
        /// New value
        value: String,
    },

    /// Print the settings file location
    Path,
}

fn init_tracing(verbose: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(if verbose { "debug" } else { "warn" }));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let repo = cli.repo.as_path();
    let json = cli.json;

    match cli.command {
        Commands::Status { path } => {
            cli::commands::status::execute(repo, path, json)?;
            Ok(())
        }
        Commands::Pull => {
            cli::commands::pull::execute(repo, json)?;
            Ok(())
        }
        Commands::Save { path, message, yes } => {
            cli::commands::save::execute(repo, path, message, yes, json)?;
            Ok(())
        }
        Commands::Check { path } => {
            cli::commands::check::execute(repo, path, json)?;
            Ok(())
        }
        Commands::Log { path, limit } => {
            cli::commands::log::execute(repo, path, limit, json)?;
            Ok(())
        }
        Commands::Doctor => {
            cli::commands::doctor::execute(repo, json)?;
            Ok(())
        }
        Commands::Config { command } => match command {
            ConfigCommands::Show => {
                cli::commands::config::show()?;
                Ok(())
            }
            ConfigCommands::Set { key, value } => {
                cli::commands::config::set(&key, &value)?;
                Ok(())
            }
            ConfigCommands::Path => {
                cli::commands::config::path()?;
                Ok(())
            }
        },
    }
}
