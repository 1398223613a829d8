//! The idle-aware coding time tracker.
//!
//! ## State Machine
//!
//! ```text
//! Idle   ──handle_activity──────────────► Active   (new session, clock at 0)
//! Active ──handle_activity──────────────► Active   (refreshes last activity only)
//! Active ──update_time, gap >= timeout──► Idle     (rollover + save)
//! ```
//!
//! The displayed total is `total_coding_time + session_time`; the session is
//! only folded into `total_coding_time` on rollover. Today's day-key is fixed
//! when the tracker is built and never rolls over mid-run.

use crate::commands::{CommandRegistry, TrackerCommand};
use crate::config::TrackerConfig;
use crate::error::Result;
use crate::format::{day_key, elapsed_secs, format_hms, to_iso8601};
use crate::host::{Clock, FileStore, HostServices, Notifier, StatusSink};
use crate::ledger::{DayRecord, TimeLedger};
use crate::scheduler::{Scheduler, TickHandle, TrackerEvent};
use chrono::{DateTime, Utc};
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};

/// Icon token prefixed to the status text.
pub const STATUS_ICON: &str = "$(clock)";
pub const STATUS_TOOLTIP: &str = "Click to show coding time";

/// Persist while active whenever the idle gap lands on a multiple of this.
const SAVE_GAP_MODULUS_SECS: u64 = 60;

/// Transient per-run session fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionState {
    pub is_active: bool,
    pub coding_start_time: DateTime<Utc>,
    pub last_activity_time: DateTime<Utc>,
    /// Seconds in the open session, as of the last active tick.
    pub session_time: u64,
    /// Today's seconds as of the last rollover.
    pub total_coding_time: u64,
}

pub struct TimeTracker {
    config: TrackerConfig,
    commands: CommandRegistry,
    ledger_path: PathBuf,
    today_key: String,
    ledger: TimeLedger,
    session: SessionState,
    clock: Box<dyn Clock>,
    status: Box<dyn StatusSink>,
    notifier: Box<dyn Notifier>,
    files: Box<dyn FileStore>,
}

impl TimeTracker {
    /// Loads the ledger and prepares the status item. Starts Idle.
    pub fn new(config: TrackerConfig, ledger_path: impl Into<PathBuf>, host: HostServices) -> Self {
        let HostServices {
            clock,
            mut status,
            notifier,
            files,
        } = host;
        let ledger_path = ledger_path.into();

        let now = clock.now();
        let today_key = day_key(now);
        let ledger = TimeLedger::load(files.as_ref(), &ledger_path);
        let total_coding_time = ledger
            .get(&today_key)
            .map(|record| record.total_coding_time)
            .unwrap_or(0);

        status.set_command(&config.show_time_command);
        status.set_tooltip(STATUS_TOOLTIP);

        tracing::info!(
            day = %today_key,
            total = %format_hms(total_coding_time),
            days = ledger.len(),
            "Time tracker initialized"
        );

        Self {
            commands: CommandRegistry::from_config(&config),
            config,
            ledger_path,
            today_key,
            ledger,
            session: SessionState {
                is_active: false,
                coding_start_time: now,
                last_activity_time: now,
                session_time: 0,
                total_coding_time,
            },
            clock,
            status,
            notifier,
            files,
        }
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    pub fn ledger(&self) -> &TimeLedger {
        &self.ledger
    }

    pub fn today_key(&self) -> &str {
        &self.today_key
    }

    pub fn ledger_path(&self) -> &Path {
        &self.ledger_path
    }

    /// What the status item shows while active: rollover total plus live session.
    pub fn displayed_total(&self) -> u64 {
        self.session.total_coding_time + self.session.session_time
    }

    /// Renders once, shows the status item and registers the periodic tick.
    pub fn start(&mut self, scheduler: &dyn Scheduler) -> Result<TickHandle> {
        self.update_time();
        self.status.show();
        scheduler.every(self.config.tick_interval(), TrackerEvent::Tick)
    }

    /// Records an activity signal. The only way out of Idle.
    pub fn handle_activity(&mut self) {
        let now = self.clock.now();
        if !self.session.is_active {
            self.session.is_active = true;
            self.session.coding_start_time = now;
            self.session.session_time = 0;
            self.ledger.ensure_day(
                &self.today_key,
                DayRecord {
                    total_coding_time: 0,
                    last_saved: Some(to_iso8601(now)),
                },
            );
            tracing::debug!(day = %self.today_key, "Coding session started");
        }
        self.session.last_activity_time = now;
    }

    /// Advances the session clock, detects idleness and refreshes the status item.
    pub fn update_time(&mut self) {
        if !self.session.is_active {
            self.render(self.session.total_coding_time);
            return;
        }

        let now = self.clock.now();
        let idle_gap = elapsed_secs(self.session.last_activity_time, now);

        if idle_gap < self.config.idle_timeout_secs {
            self.session.session_time = elapsed_secs(self.session.coding_start_time, now);
            self.render(self.displayed_total());
            // Only fires on ticks that land exactly on the multiple; a
            // delayed or skipped tick silently stretches the interval.
            if idle_gap % SAVE_GAP_MODULUS_SECS == 0 {
                self.persist();
            }
        } else {
            self.session.is_active = false;
            self.session.total_coding_time += self.session.session_time;
            tracing::debug!(
                session = %format_hms(self.session.session_time),
                total = %format_hms(self.session.total_coding_time),
                "Coding session ended after idle timeout"
            );
            self.session.session_time = 0;
            self.persist();
        }
    }

    /// Writes today's live total into the ledger and the ledger to storage.
    ///
    /// The in-memory record is updated even when the write fails.
    pub fn save_time_data(&mut self) -> Result<()> {
        let current_total = self.displayed_total();
        self.ledger.insert(
            self.today_key.clone(),
            DayRecord {
                total_coding_time: current_total,
                last_saved: Some(to_iso8601(self.clock.now())),
            },
        );
        self.ledger.save(self.files.as_ref(), &self.ledger_path)?;
        tracing::info!(
            total = %format_hms(current_total),
            "Time data saved successfully"
        );
        Ok(())
    }

    /// Saves, logging and optionally surfacing a failure instead of returning it.
    fn persist(&mut self) {
        if let Err(err) = self.save_time_data() {
            tracing::error!(error = %err, path = %self.ledger_path.display(), "Error saving time data");
            if self.config.notify_on_save_error {
                let message = format!("Error saving time data: {}", err);
                if let Err(notify_err) = self.notifier.error(&message) {
                    tracing::warn!(error = %notify_err, "Failed to report save error");
                }
            }
        }
    }

    /// Shows every day in the ledger, newest first. Read-only.
    pub fn show_stats(&self) -> Result<String> {
        let message = format!("Coding Stats:\n{}", self.ledger.stats_lines().join("\n"));
        self.notifier.modal(&message)?;
        Ok(message)
    }

    /// Shows today's total as of the last rollover (excludes the open session).
    pub fn show_time(&self) -> Result<String> {
        let message = format!(
            "Today's coding time: {}",
            format_hms(self.session.total_coding_time)
        );
        self.notifier.info(&message)?;
        Ok(message)
    }

    pub fn run_command(&self, command_id: &str) -> Result<String> {
        match self.commands.resolve(command_id)? {
            TrackerCommand::ShowTime => self.show_time(),
            TrackerCommand::ShowStats => self.show_stats(),
        }
    }

    /// Routes one event. Failures are handled here so nothing escapes into
    /// the loop.
    pub fn dispatch(&mut self, event: TrackerEvent) -> ControlFlow<()> {
        match event {
            TrackerEvent::Tick => self.update_time(),
            TrackerEvent::Activity => self.handle_activity(),
            TrackerEvent::Command(command_id) => {
                if let Err(err) = self.run_command(&command_id) {
                    tracing::error!(error = %err, command = %command_id, "Command failed");
                    if let Err(notify_err) = self.notifier.error(&format!("{}", err)) {
                        tracing::warn!(error = %notify_err, "Failed to report command error");
                    }
                }
            }
            TrackerEvent::Shutdown => return ControlFlow::Break(()),
        }
        ControlFlow::Continue(())
    }

    /// Final save, then releases the status item.
    ///
    /// Calling this twice writes twice; the second write recomputes from the
    /// same in-memory state.
    pub fn dispose(&mut self) {
        self.persist();
        self.status.dispose();
    }

    fn render(&mut self, seconds: u64) {
        self.status
            .set_text(&format!("{} {}", STATUS_ICON, format_hms(seconds)));
    }
}
