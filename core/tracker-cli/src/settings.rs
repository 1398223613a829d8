//! `code-tracker config`: materialize `config.json` and show command bindings.
//!
//! Missing fields are filled with defaults and written back. A malformed file
//! is an error here rather than being silently replaced.

use tracker_core::config::read_config;
use tracker_core::{save_config, CommandRegistry, Result, StorageConfig, TrackerCommand};

const COMMANDS: [(TrackerCommand, &str); 2] = [
    (TrackerCommand::ShowTime, "show time"),
    (TrackerCommand::ShowStats, "show stats"),
];

pub fn run(storage: &StorageConfig) -> Result<()> {
    let path = storage.config_file();
    let config = read_config(&path)?.unwrap_or_default();
    save_config(storage, &config)?;
    tracing::info!(path = %path.display(), "Wrote tracker configuration");

    let registry = CommandRegistry::from_config(&config);
    println!("Config: {}", path.display());
    println!("Idle timeout: {}s", config.idle_timeout_secs);
    for (command, label) in COMMANDS {
        if let Some(id) = registry.id_of(command) {
            println!("  {:<10} {}", label, id);
        }
    }
    Ok(())
}
