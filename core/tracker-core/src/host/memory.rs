//! In-memory capabilities for tests, replays and embedding.
//!
//! Every type here is a cheap handle over shared state: keep a clone, hand
//! the other to the tracker, and inspect what happened afterwards.

use super::{Clock, FileStore, Notifier, StatusSink};
use crate::error::{Result, TrackerError};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

// ═══════════════════════════════════════════════════════════════════════════════
// Clock
// ═══════════════════════════════════════════════════════════════════════════════

/// A clock that only moves when told to.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Arc<Mutex<DateTime<Utc>>>,
}

impl ManualClock {
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Arc::new(Mutex::new(start)),
        }
    }

    pub fn set(&self, at: DateTime<Utc>) {
        *lock(&self.now) = at;
    }

    pub fn advance_secs(&self, secs: i64) {
        self.advance(Duration::seconds(secs));
    }

    pub fn advance(&self, by: Duration) {
        let mut now = lock(&self.now);
        *now += by;
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        *lock(&self.now)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// File store
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Default)]
struct MemoryFiles {
    files: HashMap<PathBuf, Vec<u8>>,
    writes: usize,
    fail_writes: bool,
}

/// A map-backed file store that counts writes and can be told to fail them.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryFiles>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&self, path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) {
        lock(&self.inner).files.insert(path.into(), contents.into());
    }

    pub fn contents(&self, path: &Path) -> Option<Vec<u8>> {
        lock(&self.inner).files.get(path).cloned()
    }

    /// Number of successful writes so far.
    pub fn write_count(&self) -> usize {
        lock(&self.inner).writes
    }

    pub fn set_fail_writes(&self, fail: bool) {
        lock(&self.inner).fail_writes = fail;
    }
}

impl FileStore for MemoryStore {
    fn read(&self, path: &Path) -> Result<Vec<u8>> {
        lock(&self.inner)
            .files
            .get(path)
            .cloned()
            .ok_or_else(|| TrackerError::Io {
                context: format!("Failed to read {}", path.display()),
                source: std::io::Error::from(std::io::ErrorKind::NotFound),
            })
    }

    fn write(&self, path: &Path, contents: &[u8]) -> Result<()> {
        let mut inner = lock(&self.inner);
        if inner.fail_writes {
            return Err(TrackerError::Io {
                context: format!("Failed to write {}", path.display()),
                source: std::io::Error::other("disk full"),
            });
        }
        inner.files.insert(path.to_path_buf(), contents.to_vec());
        inner.writes += 1;
        Ok(())
    }

    fn exists(&self, path: &Path) -> bool {
        lock(&self.inner).files.contains_key(path)
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Status sink
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusSnapshot {
    pub text: String,
    pub tooltip: String,
    pub command: Option<String>,
    pub visible: bool,
    pub disposed: bool,
    /// Every text ever set, oldest first.
    pub history: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct RecordingStatus {
    inner: Arc<Mutex<StatusSnapshot>>,
}

impl RecordingStatus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn snapshot(&self) -> StatusSnapshot {
        lock(&self.inner).clone()
    }

    pub fn text(&self) -> String {
        lock(&self.inner).text.clone()
    }
}

impl StatusSink for RecordingStatus {
    fn set_text(&mut self, text: &str) {
        let mut inner = lock(&self.inner);
        inner.text = text.to_string();
        inner.history.push(text.to_string());
    }

    fn set_tooltip(&mut self, tooltip: &str) {
        lock(&self.inner).tooltip = tooltip.to_string();
    }

    fn set_command(&mut self, command_id: &str) {
        lock(&self.inner).command = Some(command_id.to_string());
    }

    fn show(&mut self) {
        lock(&self.inner).visible = true;
    }

    fn hide(&mut self) {
        lock(&self.inner).visible = false;
    }

    fn dispose(&mut self) {
        let mut inner = lock(&self.inner);
        inner.visible = false;
        inner.disposed = true;
    }
}

// ═══════════════════════════════════════════════════════════════════════════════
// Notifier
// ═══════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notification {
    Info(String),
    Modal(String),
    Error(String),
}

#[derive(Debug, Clone, Default)]
pub struct RecordingNotifier {
    inner: Arc<Mutex<Vec<Notification>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<Notification> {
        lock(&self.inner).clone()
    }

    pub fn errors(&self) -> Vec<String> {
        lock(&self.inner)
            .iter()
            .filter_map(|n| match n {
                Notification::Error(message) => Some(message.clone()),
                _ => None,
            })
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn info(&self, message: &str) -> Result<()> {
        lock(&self.inner).push(Notification::Info(message.to_string()));
        Ok(())
    }

    fn modal(&self, message: &str) -> Result<()> {
        lock(&self.inner).push(Notification::Modal(message.to_string()));
        Ok(())
    }

    fn error(&self, message: &str) -> Result<()> {
        lock(&self.inner).push(Notification::Error(message.to_string()));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn manual_clock_clones_share_time() {
        let start = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        let clock = ManualClock::new(start);
        let handle = clock.clone();

        handle.advance_secs(5);
        assert_eq!(clock.now(), start + Duration::seconds(5));
    }

    #[test]
    fn memory_store_counts_only_successful_writes() {
        let store = MemoryStore::new();
        let path = Path::new("/ledger.json");

        store.write(path, b"one").unwrap();
        store.set_fail_writes(true);
        assert!(store.write(path, b"two").is_err());

        assert_eq!(store.write_count(), 1);
        assert_eq!(store.contents(path), Some(b"one".to_vec()));
    }

    #[test]
    fn recording_status_tracks_visibility() {
        let status = RecordingStatus::new();
        let mut sink = status.clone();

        sink.set_text("a");
        sink.show();
        assert!(status.snapshot().visible);

        sink.dispose();
        let snapshot = status.snapshot();
        assert!(!snapshot.visible);
        assert!(snapshot.disposed);
        assert_eq!(snapshot.history, vec!["a".to_string()]);
    }
}
