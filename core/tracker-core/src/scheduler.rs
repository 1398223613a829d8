//! Single-context event delivery.
//!
//! Hosts produce events from anywhere (a ticker thread, a stdin reader, an
//! editor callback) through cloneable [`EventSender`]s. Exactly one
//! [`EventLoop`] consumes them on the thread that calls [`EventLoop::run`],
//! so the tracker is only ever mutated from that thread and never re-entered.
//!
//! ```text
//! ticker thread ──Tick──┐
//! stdin / editor ─Activity / Command / Shutdown─┼──► mpsc ──► EventLoop::run ──► TimeTracker
//! ```

use crate::error::{Result, TrackerError};
use crate::tracker::TimeTracker;
use std::ops::ControlFlow;
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrackerEvent {
    /// Periodic clock tick.
    Tick,
    /// The user changed something.
    Activity,
    /// A command identifier was invoked.
    Command(String),
    /// Stop the loop.
    Shutdown,
}

/// Registers periodic events.
pub trait Scheduler {
    fn every(&self, period: Duration, event: TrackerEvent) -> Result<TickHandle>;
}

/// Delivers external events into the loop.
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: Sender<TrackerEvent>,
}

impl EventSender {
    pub fn send(&self, event: TrackerEvent) -> Result<()> {
        self.tx.send(event).map_err(|_| TrackerError::SchedulerClosed)
    }

    pub fn activity(&self) -> Result<()> {
        self.send(TrackerEvent::Activity)
    }

    pub fn command(&self, command_id: impl Into<String>) -> Result<()> {
        self.send(TrackerEvent::Command(command_id.into()))
    }

    pub fn shutdown(&self) -> Result<()> {
        self.send(TrackerEvent::Shutdown)
    }
}

/// Cancellable registration returned by [`Scheduler::every`].
///
/// Dropping the handle cancels the registration.
#[derive(Debug)]
pub struct TickHandle {
    period: Duration,
    stop: Option<Sender<()>>,
    thread: Option<JoinHandle<()>>,
}

impl TickHandle {
    /// A handle with nothing behind it, for schedulers that deliver ticks
    /// some other way.
    pub fn detached(period: Duration) -> Self {
        Self {
            period,
            stop: None,
            thread: None,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    pub fn is_active(&self) -> bool {
        self.stop.is_some()
    }

    /// Stops the ticker and waits for its thread to exit.
    pub fn cancel(&mut self) {
        // Dropping the stop sender wakes the ticker immediately.
        drop(self.stop.take());
        if let Some(thread) = self.thread.take() {
            if thread.join().is_err() {
                tracing::warn!("Ticker thread panicked");
            }
        }
    }
}

impl Drop for TickHandle {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// Owns the receiving end of the event channel.
pub struct EventLoop {
    tx: Sender<TrackerEvent>,
    rx: Receiver<TrackerEvent>,
}

impl Default for EventLoop {
    fn default() -> Self {
        Self::new()
    }
}

impl EventLoop {
    pub fn new() -> Self {
        let (tx, rx) = mpsc::channel();
        Self { tx, rx }
    }

    pub fn sender(&self) -> EventSender {
        EventSender {
            tx: self.tx.clone(),
        }
    }

    /// Dispatches events to `tracker` until a `Shutdown` arrives.
    ///
    /// Returns the number of events handled, including the shutdown.
    pub fn run(&self, tracker: &mut TimeTracker) -> usize {
        let mut handled = 0;
        while let Ok(event) = self.rx.recv() {
            handled += 1;
            if let ControlFlow::Break(()) = tracker.dispatch(event) {
                break;
            }
        }
        tracing::debug!(handled, "Event loop stopped");
        handled
    }
}

impl Scheduler for EventLoop {
    fn every(&self, period: Duration, event: TrackerEvent) -> Result<TickHandle> {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let tx = self.tx.clone();

        let thread = thread::Builder::new()
            .name("tracker-ticker".to_string())
            .spawn(move || loop {
                match stop_rx.recv_timeout(period) {
                    Err(RecvTimeoutError::Timeout) => {
                        if tx.send(event.clone()).is_err() {
                            tracing::warn!("Ticker stopping (event loop dropped)");
                            break;
                        }
                    }
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            })
            .map_err(|e| TrackerError::Io {
                context: "Failed to spawn ticker thread".to_string(),
                source: e,
            })?;

        Ok(TickHandle {
            period,
            stop: Some(stop_tx),
            thread: Some(thread),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn ticker_delivers_events_until_cancelled() {
        let event_loop = EventLoop::new();
        let mut handle = event_loop
            .every(Duration::from_millis(10), TrackerEvent::Tick)
            .unwrap();
        assert!(handle.is_active());

        let first = event_loop.rx.recv_timeout(Duration::from_secs(2));
        assert_eq!(first, Ok(TrackerEvent::Tick));

        handle.cancel();
        assert!(!handle.is_active());

        // Drain anything already queued, then expect silence.
        while event_loop.rx.try_recv().is_ok() {}
        assert!(event_loop
            .rx
            .recv_timeout(Duration::from_millis(50))
            .is_err());
    }

    #[test]
    fn cancel_does_not_wait_for_a_full_period() {
        let event_loop = EventLoop::new();
        let mut handle = event_loop
            .every(Duration::from_secs(30), TrackerEvent::Tick)
            .unwrap();

        let started = Instant::now();
        handle.cancel();
        assert!(started.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn senders_feed_the_same_channel() {
        let event_loop = EventLoop::new();
        let sender = event_loop.sender();
        let other = sender.clone();

        sender.activity().unwrap();
        other.command("cb-code-tracker.showTime").unwrap();
        sender.shutdown().unwrap();

        let received: Vec<TrackerEvent> = event_loop.rx.try_iter().collect();
        assert_eq!(
            received,
            vec![
                TrackerEvent::Activity,
                TrackerEvent::Command("cb-code-tracker.showTime".to_string()),
                TrackerEvent::Shutdown,
            ]
        );
    }

    #[test]
    fn sending_after_loop_dropped_fails() {
        let sender = EventLoop::new().sender();
        assert!(matches!(
            sender.activity(),
            Err(TrackerError::SchedulerClosed)
        ));
    }

    #[test]
    fn detached_handle_is_inert() {
        let mut handle = TickHandle::detached(Duration::from_secs(1));
        assert!(!handle.is_active());
        assert_eq!(handle.period(), Duration::from_secs(1));
        handle.cancel();
    }
}
