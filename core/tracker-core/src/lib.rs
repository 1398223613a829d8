//! # tracker-core
//!
//! Idle-aware accounting of active coding time per calendar day.
//!
//! ## Design Principles
//!
//! - **Synchronous**: No async runtime dependency. One [`EventLoop`] thread owns the tracker.
//! - **Injected host**: Clock, status item, notifications and files are traits ([`host`]).
//! - **Graceful degradation**: Missing or corrupt files load as empty; failed saves are logged.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use tracker_core::*;
//!
//! let storage = StorageConfig::new()?;
//! let config = load_config(&storage);
//! let mut tracker = TimeTracker::new(config.clone(), config.ledger_path(&storage), host);
//! let event_loop = EventLoop::new();
//! let mut ticks = tracker.start(&event_loop)?;
//! event_loop.run(&mut tracker);
//! ticks.cancel();
//! tracker.dispose();
//! ```

pub mod commands;
pub mod config;
pub mod error;
pub mod format;
pub mod host;
pub mod ledger;
pub mod scheduler;
pub mod storage;
pub mod tracker;

pub use commands::{CommandRegistry, TrackerCommand};
pub use config::{load_config, save_config, TrackerConfig};
pub use error::{Result, TrackerError};
pub use format::format_hms;
pub use host::{Clock, FileStore, FsStore, HostServices, Notifier, StatusSink, SystemClock};
pub use ledger::{DayRecord, TimeLedger};
pub use scheduler::{EventLoop, EventSender, Scheduler, TickHandle, TrackerEvent};
pub use storage::StorageConfig;
pub use tracker::{SessionState, TimeTracker};
