//! Rendering helpers for durations, day-keys and timestamps.

use chrono::{DateTime, Local, NaiveDate, SecondsFormat, Utc};

/// Day-key layout, e.g. `Mon Jan 01 2024`.
pub const DAY_KEY_FORMAT: &str = "%a %b %d %Y";

/// Formats seconds as zero-padded `HH:MM:SS`.
///
/// Hours are not wrapped: 30 hours renders as `30:00:00`.
pub fn format_hms(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    let secs = seconds % 60;
    format!("{:02}:{:02}:{:02}", hours, minutes, secs)
}

/// Returns the local calendar day-key for an instant.
pub fn day_key(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format(DAY_KEY_FORMAT).to_string()
}

/// Parses a day-key back into a date; `None` for foreign or corrupt keys.
pub fn parse_day_key(key: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(key.trim(), DAY_KEY_FORMAT).ok()
}

/// Renders a timestamp the way the ledger stores it: `2024-01-01T10:00:00.000Z`.
pub fn to_iso8601(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Renders a stored RFC 3339 timestamp as local time-of-day, or `N/A`.
pub fn time_of_day(timestamp: Option<&str>) -> String {
    timestamp
        .and_then(|ts| DateTime::parse_from_rfc3339(ts).ok())
        .map(|dt| dt.with_timezone(&Local).format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "N/A".to_string())
}

/// Whole seconds from `earlier` to `later`, floored and clamped at zero.
pub fn elapsed_secs(earlier: DateTime<Utc>, later: DateTime<Utc>) -> u64 {
    let millis = (later - earlier).num_milliseconds();
    if millis <= 0 {
        0
    } else {
        (millis / 1000) as u64
    }
}
