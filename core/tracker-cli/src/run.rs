//! `code-tracker run`: live tracking driven by stdin.
//!
//! ## Input Lines
//!
//! ```text
//! (empty) | activity → activity signal
//! time               → show-time command
//! stats              → show-stats command
//! quit | exit        → shutdown
//! anything else      → command identifier
//! ```
//!
//! EOF on stdin, Ctrl-C and SIGTERM all shut the tracker down after a final
//! save.

use crate::terminal::{ConsoleNotifier, TerminalStatus};
use std::io::{self, BufRead};
use std::thread;
use tracker_core::{
    load_config, EventLoop, EventSender, FsStore, HostServices, Result, StorageConfig,
    SystemClock, TimeTracker, TrackerConfig, TrackerError, TrackerEvent,
};

pub fn run(storage: &StorageConfig) -> Result<()> {
    let config = load_config(storage);
    let ledger_path = config.ledger_path(storage);
    tracing::info!(
        path = %ledger_path.display(),
        idle_timeout_secs = config.idle_timeout_secs,
        "Starting code tracker"
    );

    let mut tracker = TimeTracker::new(
        config.clone(),
        ledger_path,
        HostServices {
            clock: Box::new(SystemClock),
            status: Box::new(TerminalStatus::new()),
            notifier: Box::new(ConsoleNotifier::live()),
            files: Box::new(FsStore),
        },
    );

    let event_loop = EventLoop::new();
    install_shutdown_handler(event_loop.sender());
    spawn_stdin_reader(event_loop.sender(), config)?;

    let mut ticks = tracker.start(&event_loop)?;
    event_loop.run(&mut tracker);
    ticks.cancel();
    tracker.dispose();

    tracing::info!("Code tracker stopped");
    Ok(())
}

/// Turns SIGINT/SIGTERM into a `Shutdown` event so the loop returns and
/// `dispose` still writes the ledger.
fn install_shutdown_handler(sender: EventSender) {
    let result = ctrlc::set_handler(move || {
        tracing::info!("Received termination signal, shutting down");
        let _ = sender.shutdown();
    });
    if let Err(err) = result {
        tracing::warn!(error = %err, "Failed to install signal handler");
    }
}

fn spawn_stdin_reader(sender: EventSender, config: TrackerConfig) -> Result<()> {
    thread::Builder::new()
        .name("stdin-reader".to_string())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                let line = match line {
                    Ok(line) => line,
                    Err(err) => {
                        tracing::warn!(error = %err, "Failed to read stdin");
                        break;
                    }
                };
                let event = parse_line(&line, &config);
                let stop = event == TrackerEvent::Shutdown;
                if sender.send(event).is_err() || stop {
                    return;
                }
            }
            // EOF: the host is going away.
            let _ = sender.shutdown();
        })
        .map(|_| ())
        .map_err(|e| TrackerError::Io {
            context: "Failed to spawn stdin reader".to_string(),
            source: e,
        })
}

/// Maps one input line to an event.
pub fn parse_line(line: &str, config: &TrackerConfig) -> TrackerEvent {
    match line.trim() {
        "" | "activity" => TrackerEvent::Activity,
        "time" => TrackerEvent::Command(config.show_time_command.clone()),
        "stats" => TrackerEvent::Command(config.show_stats_command.clone()),
        "quit" | "exit" => TrackerEvent::Shutdown,
        other => TrackerEvent::Command(other.to_string()),
    }
}
