//! Host capabilities the tracker calls into.
//!
//! The tracker never touches a status bar, a message box or the filesystem
//! directly. Each of those is an injected trait object so the core runs the
//! same under an editor, the terminal CLI, or a unit test.

mod fs;
mod memory;

pub use fs::FsStore;
pub use memory::{
    ManualClock, MemoryStore, Notification, RecordingNotifier, RecordingStatus, StatusSnapshot,
};

use crate::error::Result;
use chrono::{DateTime, Utc};
use std::path::Path;

/// Source of "now".
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// Wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// A single-line status target (icon plus label, tooltip, click command).
pub trait StatusSink {
    fn set_text(&mut self, text: &str);
    fn set_tooltip(&mut self, tooltip: &str);
    /// Binds a click to the given command identifier.
    fn set_command(&mut self, command_id: &str);
    fn show(&mut self);
    fn hide(&mut self);
    /// Releases the item. No further calls are made afterwards.
    fn dispose(&mut self);
}

/// User-facing messages.
pub trait Notifier {
    fn info(&self, message: &str) -> Result<()>;
    /// A message the host should present prominently (dialog, pager).
    fn modal(&self, message: &str) -> Result<()>;
    fn error(&self, message: &str) -> Result<()>;
}

/// The minimal filesystem the ledger needs.
pub trait FileStore {
    fn read(&self, path: &Path) -> Result<Vec<u8>>;
    /// Replaces the whole file.
    fn write(&self, path: &Path, contents: &[u8]) -> Result<()>;
    fn exists(&self, path: &Path) -> bool;
}

/// Everything a tracker needs from its host.
pub struct HostServices {
    pub clock: Box<dyn Clock>,
    pub status: Box<dyn StatusSink>,
    pub notifier: Box<dyn Notifier>,
    pub files: Box<dyn FileStore>,
}
