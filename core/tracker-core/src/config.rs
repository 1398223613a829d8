//! Tracker configuration loading and saving.
//!
//! Every field has a default, so a missing or partial `config.json` is never
//! an error. A malformed file is logged and replaced by the defaults.

use crate::error::{Result, TrackerError};
use crate::storage::StorageConfig;
use fs_err as fs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Seconds without activity before a session is considered over.
pub const IDLE_TIMEOUT_SECONDS: u64 = 10;

/// Ordering hint for hosts that show several status items.
pub const STATUS_BAR_PRIORITY: i32 = 100;

pub const DEFAULT_TICK_INTERVAL_MS: u64 = 1000;

pub const SHOW_TIME_COMMAND: &str = "cb-code-tracker.showTime";
pub const SHOW_STATS_COMMAND: &str = "cb-code-tracker.showStats";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    pub idle_timeout_secs: u64,
    pub tick_interval_ms: u64,
    pub status_bar_priority: i32,
    pub show_time_command: String,
    pub show_stats_command: String,
    /// Surface save failures through the notifier, not only the log.
    pub notify_on_save_error: bool,
    /// Overrides `StorageConfig::ledger_file()` when set.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_file: Option<PathBuf>,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            idle_timeout_secs: IDLE_TIMEOUT_SECONDS,
            tick_interval_ms: DEFAULT_TICK_INTERVAL_MS,
            status_bar_priority: STATUS_BAR_PRIORITY,
            show_time_command: SHOW_TIME_COMMAND.to_string(),
            show_stats_command: SHOW_STATS_COMMAND.to_string(),
            notify_on_save_error: true,
            data_file: None,
        }
    }
}

impl TrackerConfig {
    pub fn tick_interval(&self) -> Duration {
        // A zero interval would spin the ticker thread.
        Duration::from_millis(self.tick_interval_ms.max(1))
    }

    /// Resolves the ledger path, honoring the `data_file` override.
    pub fn ledger_path(&self, storage: &StorageConfig) -> PathBuf {
        self.data_file
            .clone()
            .unwrap_or_else(|| storage.ledger_file())
    }
}

/// Loads the tracker configuration, returning defaults if the file is
/// missing or malformed.
pub fn load_config(storage: &StorageConfig) -> TrackerConfig {
    let path = storage.config_file();
    match read_config(&path) {
        Ok(Some(config)) => config,
        Ok(None) => TrackerConfig::default(),
        Err(err) => {
            tracing::warn!(error = %err, "Using default tracker configuration");
            TrackerConfig::default()
        }
    }
}

/// Reads a config file, distinguishing "absent" from "broken".
pub fn read_config(path: &Path) -> Result<Option<TrackerConfig>> {
    let content = match fs::read_to_string(path) {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(err) => {
            return Err(TrackerError::Io {
                context: "Failed to read config".to_string(),
                source: err,
            })
        }
    };

    if content.trim().is_empty() {
        return Ok(None);
    }

    serde_json::from_str(&content)
        .map(Some)
        .map_err(|e| TrackerError::ConfigMalformed {
            path: path.to_path_buf(),
            details: e.to_string(),
        })
}

/// Saves the tracker configuration to disk.
pub fn save_config(storage: &StorageConfig, config: &TrackerConfig) -> Result<()> {
    let path = storage.config_file();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| TrackerError::Io {
            context: "Failed to create config directory".to_string(),
            source: e,
        })?;
    }
    let content = serde_json::to_string_pretty(config).map_err(|e| TrackerError::Json {
        context: "Failed to serialize config".to_string(),
        source: e,
    })?;
    fs::write(&path, content).map_err(|e| TrackerError::Io {
        context: "Failed to write config".to_string(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn storage() -> (TempDir, StorageConfig) {
        let temp = TempDir::new().unwrap();
        let storage = StorageConfig::with_root(temp.path().to_path_buf());
        (temp, storage)
    }

    #[test]
    fn missing_file_yields_defaults() {
        let (_temp, storage) = storage();
        let config = load_config(&storage);
        assert_eq!(config, TrackerConfig::default());
        assert_eq!(config.idle_timeout_secs, 10);
        assert_eq!(config.status_bar_priority, 100);
    }

    #[test]
    fn partial_file_fills_in_defaults() {
        let (_temp, storage) = storage();
        fs::write(storage.config_file(), r#"{"idle_timeout_secs": 120}"#).unwrap();

        let config = load_config(&storage);
        assert_eq!(config.idle_timeout_secs, 120);
        assert_eq!(config.show_time_command, SHOW_TIME_COMMAND);
        assert!(config.notify_on_save_error);
    }

    #[test]
    fn malformed_file_is_reported_and_load_falls_back() {
        let (_temp, storage) = storage();
        fs::write(storage.config_file(), "{ not json").unwrap();

        let err = read_config(&storage.config_file()).unwrap_err();
        assert!(matches!(err, TrackerError::ConfigMalformed { .. }));
        assert_eq!(load_config(&storage), TrackerConfig::default());
    }

    #[test]
    fn save_then_load() {
        let (_temp, storage) = storage();
        let config = TrackerConfig {
            idle_timeout_secs: 30,
            notify_on_save_error: false,
            ..TrackerConfig::default()
        };
        save_config(&storage, &config).unwrap();
        assert_eq!(load_config(&storage), config);
    }

    #[test]
    fn data_file_override_wins() {
        let (temp, storage) = storage();
        let custom = temp.path().join("elsewhere.json");
        let config = TrackerConfig {
            data_file: Some(custom.clone()),
            ..TrackerConfig::default()
        };
        assert_eq!(config.ledger_path(&storage), custom);
        assert_eq!(
            TrackerConfig::default().ledger_path(&storage),
            storage.ledger_file()
        );
    }

    #[test]
    fn zero_tick_interval_is_clamped() {
        let config = TrackerConfig {
            tick_interval_ms: 0,
            ..TrackerConfig::default()
        };
        assert_eq!(config.tick_interval(), Duration::from_millis(1));
    }
}
