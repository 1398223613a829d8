//! One-shot reads of the persisted ledger (`today`, `stats`).
//!
//! These build a tracker over the saved file and call its query operations,
//! never `dispose`, so nothing is written back.

use crate::terminal::{ConsoleNotifier, TerminalStatus};
use tracker_core::{
    load_config, FsStore, HostServices, Result, StorageConfig, SystemClock, TimeTracker,
    TrackerCommand,
};

pub fn run(storage: &StorageConfig, command: TrackerCommand) -> Result<()> {
    let tracker = open(storage);
    match command {
        TrackerCommand::ShowTime => tracker.show_time()?,
        TrackerCommand::ShowStats => tracker.show_stats()?,
    };
    Ok(())
}

fn open(storage: &StorageConfig) -> TimeTracker {
    let config = load_config(storage);
    let ledger_path = config.ledger_path(storage);
    TimeTracker::new(
        config,
        ledger_path,
        HostServices {
            clock: Box::new(SystemClock),
            status: Box::new(TerminalStatus::new()),
            notifier: Box::new(ConsoleNotifier::new()),
            files: Box::new(FsStore),
        },
    )
}
