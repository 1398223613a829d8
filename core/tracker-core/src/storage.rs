//! Storage configuration and path management for code-tracker.
//!
//! All file paths live here so the rest of the crate never has to guess
//! where the ledger, config or logs are:
//!
//! - Production code uses `StorageConfig::new()` which points to `~/.code-tracker/`.
//! - Tests use `StorageConfig::with_root(temp_dir)` for isolation.

use crate::error::{Result, TrackerError};
use std::path::{Path, PathBuf};

/// Directory name under the home directory.
pub const DEFAULT_ROOT_DIR: &str = ".code-tracker";

/// Central configuration for all code-tracker storage paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    /// Root directory for all code-tracker data (default: ~/.code-tracker)
    root: PathBuf,
}

impl StorageConfig {
    /// Resolves the default root under the user's home directory.
    pub fn new() -> Result<Self> {
        let home = dirs::home_dir().ok_or(TrackerError::HomeDirNotFound)?;
        Ok(Self {
            root: home.join(DEFAULT_ROOT_DIR),
        })
    }

    /// Creates a StorageConfig with a custom root directory.
    /// Used for testing with temp directories and for the `--root` flag.
    pub fn with_root(root: PathBuf) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Path to the day ledger.
    /// Example: ~/.code-tracker/data/coding-stats.json
    pub fn ledger_file(&self) -> PathBuf {
        self.root.join("data").join("coding-stats.json")
    }

    /// Path to config.json (tracker preferences).
    pub fn config_file(&self) -> PathBuf {
        self.root.join("config.json")
    }

    /// Path to logs/ directory (rolled daily by the CLI host).
    pub fn logs_dir(&self) -> PathBuf {
        self.root.join("logs")
    }
}
