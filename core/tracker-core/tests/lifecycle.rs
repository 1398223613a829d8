//! End-to-end coverage: real files, the event loop, and a restart.

use chrono::{TimeZone, Utc};
use std::path::Path;
use std::thread;
use std::time::Duration;
use tempfile::TempDir;
use tracker_core::format::day_key;
use tracker_core::host::{ManualClock, Notification, RecordingNotifier, RecordingStatus};
use tracker_core::{
    Clock, EventLoop, FsStore, HostServices, StorageConfig, TimeLedger, TimeTracker, TrackerConfig,
    TrackerEvent,
};

struct Fixture {
    _temp: TempDir,
    storage: StorageConfig,
    clock: ManualClock,
    status: RecordingStatus,
    notifier: RecordingNotifier,
}

impl Fixture {
    fn new() -> Self {
        let temp = TempDir::new().unwrap();
        let storage = StorageConfig::with_root(temp.path().to_path_buf());
        Self {
            _temp: temp,
            storage,
            clock: ManualClock::new(Utc.with_ymd_and_hms(2024, 3, 4, 12, 0, 0).unwrap()),
            status: RecordingStatus::new(),
            notifier: RecordingNotifier::new(),
        }
    }

    fn tracker(&self) -> TimeTracker {
        let config = TrackerConfig::default();
        let path = config.ledger_path(&self.storage);
        TimeTracker::new(
            config,
            path,
            HostServices {
                clock: Box::new(self.clock.clone()),
                status: Box::new(self.status.clone()),
                notifier: Box::new(self.notifier.clone()),
                files: Box::new(FsStore),
            },
        )
    }

    fn saved(&self) -> TimeLedger {
        TimeLedger::read(&FsStore, &self.storage.ledger_file()).unwrap()
    }
}

#[test]
fn session_persists_to_disk_and_survives_restart() {
    let fx = Fixture::new();
    let today = day_key(fx.clock.now());

    let mut tracker = fx.tracker();
    tracker.handle_activity();
    tracker.update_time();
    for _ in 0..10 {
        fx.clock.advance_secs(1);
        tracker.update_time();
    }
    assert!(!tracker.session().is_active);
    tracker.dispose();

    assert!(fx.storage.ledger_file().exists());
    assert_eq!(fx.saved().get(&today).unwrap().total_coding_time, 9);

    // Restart: the new tracker picks up today's total.
    fx.clock.advance_secs(600);
    let mut restarted = fx.tracker();
    assert_eq!(restarted.session().total_coding_time, 9);

    restarted.handle_activity();
    fx.clock.advance_secs(3);
    restarted.update_time();
    assert_eq!(fx.status.text(), "$(clock) 00:00:12");
    restarted.dispose();

    assert_eq!(fx.saved().get(&today).unwrap().total_coding_time, 12);
}

#[test]
fn written_file_round_trips() {
    let fx = Fixture::new();
    let mut tracker = fx.tracker();
    tracker.handle_activity();
    fx.clock.advance_secs(7);
    tracker.update_time();
    tracker.save_time_data().unwrap();

    let on_disk = fx.saved();
    assert_eq!(&on_disk, tracker.ledger());

    let raw = std::fs::read_to_string(fx.storage.ledger_file()).unwrap();
    assert!(raw.contains("\"totalCodingTime\": 7"));
    assert!(raw.contains("\"lastSaved\": \"2024-03-04T12:00:07.000Z\""));
}

#[test]
fn corrupt_ledger_starts_empty_and_is_replaced_on_save() {
    let fx = Fixture::new();
    let path = fx.storage.ledger_file();
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(&path, "{{{{").unwrap();

    let mut tracker = fx.tracker();
    assert!(tracker.ledger().is_empty());
    assert!(fx.notifier.messages().is_empty());

    tracker.dispose();
    assert_eq!(fx.saved().len(), 1);
}

#[test]
fn event_loop_processes_queued_events_in_order() {
    let fx = Fixture::new();
    let mut tracker = fx.tracker();
    let event_loop = EventLoop::new();
    let sender = event_loop.sender();

    sender.activity().unwrap();
    sender.send(TrackerEvent::Tick).unwrap();
    sender.command("cb-code-tracker.showStats").unwrap();
    sender.command("cb-code-tracker.showTime").unwrap();
    sender.shutdown().unwrap();
    sender.activity().unwrap();

    let handled = event_loop.run(&mut tracker);

    assert_eq!(handled, 5);
    assert!(tracker.session().is_active);
    let messages = fx.notifier.messages();
    assert_eq!(messages.len(), 2);
    assert!(matches!(&messages[0], Notification::Modal(m) if m.starts_with("Coding Stats:\n")));
    assert_eq!(
        messages[1],
        Notification::Info("Today's coding time: 00:00:00".to_string())
    );
}

#[test]
fn started_tracker_receives_ticks_from_its_handle() {
    let fx = Fixture::new();
    let config = TrackerConfig {
        tick_interval_ms: 5,
        ..TrackerConfig::default()
    };
    let mut tracker = TimeTracker::new(
        config,
        fx.storage.ledger_file(),
        HostServices {
            clock: Box::new(fx.clock.clone()),
            status: Box::new(fx.status.clone()),
            notifier: Box::new(fx.notifier.clone()),
            files: Box::new(FsStore),
        },
    );
    let event_loop = EventLoop::new();
    let mut ticks = tracker.start(&event_loop).unwrap();
    assert!(fx.status.snapshot().visible);

    let sender = event_loop.sender();
    let stopper = thread::spawn(move || {
        thread::sleep(Duration::from_millis(100));
        sender.shutdown().unwrap();
    });

    let handled = event_loop.run(&mut tracker);
    stopper.join().unwrap();
    ticks.cancel();
    tracker.dispose();

    // At least one tick arrived besides the shutdown.
    assert!(handled >= 2);
    // Initial render plus one per tick.
    assert!(fx.status.snapshot().history.len() >= 2);
    assert!(fx.status.snapshot().disposed);
    assert!(Path::new(&fx.storage.ledger_file()).exists());
}
