//! code-tracker: terminal host for idle-aware coding time tracking.
//!
//! ## Subcommands
//!
//! - `run`: Live tracking; each stdin line is an activity signal or command
//! - `today`: Today's saved total
//! - `stats`: Every saved day, newest first
//! - `config`: Write `config.json` with defaults filled in

mod logging;
mod query;
mod run;
mod settings;
mod terminal;

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracker_core::{StorageConfig, TrackerCommand};

#[derive(Parser)]
#[command(name = "code-tracker")]
#[command(about = "Tracks active coding time per day")]
#[command(version)]
struct Cli {
    /// Data directory (default: ~/.code-tracker)
    #[arg(long, global = true, value_name = "DIR")]
    root: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Track live; reads activity signals and commands from stdin
    Run,

    /// Show today's saved coding time
    Today,

    /// Show saved coding time for every day
    Stats,

    /// Write config.json (defaults for missing fields) and list command IDs
    Config,
}

fn main() {
    let cli = Cli::parse();

    let storage = match cli.root {
        Some(root) => StorageConfig::with_root(root),
        None => match StorageConfig::new() {
            Ok(storage) => storage,
            Err(e) => {
                eprintln!("code-tracker: {}", e);
                std::process::exit(1);
            }
        },
    };

    let logging_guard = logging::init(&storage.logs_dir());

    let result = match cli.command {
        Commands::Run => run::run(&storage),
        Commands::Today => query::run(&storage, TrackerCommand::ShowTime),
        Commands::Stats => query::run(&storage, TrackerCommand::ShowStats),
        Commands::Config => settings::run(&storage),
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "code-tracker failed");
        drop(logging_guard);
        eprintln!("code-tracker: {}", e);
        std::process::exit(1);
    }
}
