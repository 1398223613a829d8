//! Real filesystem store with atomic replacement.

use super::FileStore;
use crate::error::{Result, TrackerError};
use std::io::Write;
use std::path::Path;

/// Reads and writes real files. Writes go to a temp file in the target's
/// directory and are renamed over the target, so readers never observe a
/// half-written ledger.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsStore;

impl FileStore for FsStore {
    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        fs_err::read(path).map_err(|e| TrackerError::Io {
            context: "Failed to read file".to_string(),
            source: e,
        })
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        if !dir.exists() {
            fs_err::create_dir_all(dir).map_err(|e| TrackerError::Io {
                context: "Failed to create data directory".to_string(),
                source: e,
            })?;
        }

        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| TrackerError::Io {
            context: "Failed to create temp file".to_string(),
            source: e,
        })?;

        tmp.write_all(contents).map_err(|e| TrackerError::Io {
            context: "Failed to write temp file".to_string(),
            source: e,
        })?;

        tmp.flush().map_err(|e| TrackerError::Io {
            context: "Failed to flush temp file".to_string(),
            source: e,
        })?;

        tmp.persist(path).map_err(|e| TrackerError::Io {
            context: format!("Failed to persist {}", path.display()),
            source: e.error,
        })?;

        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        path.exists()
    }
}
