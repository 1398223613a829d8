//! File logging for the CLI host.
//!
//! The terminal belongs to the status line, so log records go to a daily
//! rolled file under `<root>/logs/`. `CODE_TRACKER_DEBUG_LOG=1` forces debug;
//! otherwise `RUST_LOG` applies, defaulting to `info`.

use std::env;
use std::path::Path;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;

const LOG_FILE_PREFIX: &str = "code-tracker.log";

/// Installs the global subscriber. Keep the guard alive until exit so
/// buffered records are flushed.
pub fn init(logs_dir: &Path) -> Option<WorkerGuard> {
    if let Err(err) = fs_err::create_dir_all(logs_dir) {
        eprintln!("code-tracker: logging disabled ({})", err);
        return None;
    }

    let appender = tracing_appender::rolling::daily(logs_dir, LOG_FILE_PREFIX);
    let (writer, guard) = tracing_appender::non_blocking(appender);

    let result = tracing_subscriber::fmt()
        .with_env_filter(filter())
        .with_writer(writer)
        .with_ansi(false)
        .try_init();

    match result {
        Ok(()) => Some(guard),
        Err(_) => None,
    }
}

fn filter() -> EnvFilter {
    let debug_enabled = env::var("CODE_TRACKER_DEBUG_LOG")
        .map(|value| matches!(value.as_str(), "1" | "true" | "TRUE" | "yes" | "YES"))
        .unwrap_or(false);
    if debug_enabled {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    }
}
