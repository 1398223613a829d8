//! The day ledger: accumulated coding seconds keyed by calendar day.
//!
//! # File Format
//!
//! ```json
//! {
//!   "Mon Jan 01 2024": {
//!     "totalCodingTime": 3661,
//!     "lastSaved": "2024-01-01T10:00:00.000Z"
//!   }
//! }
//! ```
//!
//! The file is rewritten whole on every save. Missing, unreadable or corrupt
//! files load as an empty ledger; there is no schema version.

use crate::error::{Result, TrackerError};
use crate::format::{format_hms, parse_day_key, time_of_day};
use crate::host::FileStore;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::Path;

/// Totals for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DayRecord {
    /// Accumulated active seconds.
    #[serde(default)]
    pub total_coding_time: u64,
    /// ISO 8601 timestamp of the last persistence of this record.
    #[serde(default)]
    pub last_saved: Option<String>,
}

/// Day-key → record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct TimeLedger {
    days: HashMap<String, DayRecord>,
}

impl TimeLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the ledger from `path`, degrading to empty on any failure.
    pub fn load(files: &dyn FileStore, path: &Path) -> Self {
        if !files.exists(path) {
            tracing::debug!(path = %path.display(), "No ledger yet, starting empty");
            return Self::new();
        }
        match Self::read(files, path) {
            Ok(ledger) => ledger,
            Err(err) => {
                tracing::warn!(error = %err, "Error loading time data, starting empty");
                Self::new()
            }
        }
    }

    /// Reads and parses the ledger, surfacing the failure reason.
    pub fn read(files: &dyn FileStore, path: &Path) -> Result<Self> {
        let bytes = files.read(path)?;
        serde_json::from_slice(&bytes).map_err(|e| TrackerError::Json {
            context: format!("Failed to parse {}", path.display()),
            source: e,
        })
    }

    /// Serializes the whole ledger (2-space pretty JSON) over `path`.
    pub fn save(&self, files: &dyn FileStore, path: &Path) -> Result<()> {
        let content = serde_json::to_vec_pretty(self).map_err(|e| TrackerError::Json {
            context: "Failed to serialize time data".to_string(),
            source: e,
        })?;
        files.write(path, &content)
    }

    pub fn get(&self, day_key: &str) -> Option<&DayRecord> {
        self.days.get(day_key)
    }

    pub fn contains(&self, day_key: &str) -> bool {
        self.days.contains_key(day_key)
    }

    pub fn insert(&mut self, day_key: impl Into<String>, record: DayRecord) {
        self.days.insert(day_key.into(), record);
    }

    /// Inserts `record` only when the day has no entry yet.
    pub fn ensure_day(&mut self, day_key: &str, record: DayRecord) {
        self.days.entry(day_key.to_string()).or_insert(record);
    }

    pub fn len(&self) -> usize {
        self.days.len()
    }

    pub fn is_empty(&self) -> bool {
        self.days.is_empty()
    }

    /// Records newest day first.
    ///
    /// Keys that are not day-keys (hand-edited files) sort after every real
    /// day, in descending string order.
    pub fn days_newest_first(&self) -> Vec<(&str, &DayRecord)> {
        let mut days: Vec<(&str, &DayRecord)> = self
            .days
            .iter()
            .map(|(key, record)| (key.as_str(), record))
            .collect();
        days.sort_by(|(a, _), (b, _)| compare_day_keys_desc(a, b));
        days
    }

    /// One `"<day>: HH:MM:SS (Last saved: <time>)"` line per record, newest first.
    pub fn stats_lines(&self) -> Vec<String> {
        self.days_newest_first()
            .into_iter()
            .map(|(day, record)| {
                format!(
                    "{}: {} (Last saved: {})",
                    day,
                    format_hms(record.total_coding_time),
                    time_of_day(record.last_saved.as_deref())
                )
            })
            .collect()
    }
}

fn compare_day_keys_desc(a: &str, b: &str) -> Ordering {
    match (parse_day_key(a), parse_day_key(b)) {
        (Some(da), Some(db)) => db.cmp(&da),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => b.cmp(a),
    }
}
