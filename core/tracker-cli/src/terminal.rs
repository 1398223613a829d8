//! Terminal implementations of the status item and notifier.

use std::io::{self, Write};
use tracker_core::{Notifier, Result, StatusSink, TrackerError};

/// Clear the current line and return the cursor to column 0.
const CLEAR_LINE: &str = "\r\x1b[2K";

/// A status line redrawn in place on stderr.
///
/// The `$(clock)` icon token is rendered as a plain clock glyph.
#[derive(Debug, Default)]
pub struct TerminalStatus {
    text: String,
    visible: bool,
    disposed: bool,
}

impl TerminalStatus {
    pub fn new() -> Self {
        Self::default()
    }

    fn redraw(&self) {
        if !self.visible || self.disposed {
            return;
        }
        let mut err = io::stderr().lock();
        // Best effort: a closed stderr must not take the tracker down.
        let _ = write!(err, "{}{}", CLEAR_LINE, render_icons(&self.text));
        let _ = err.flush();
    }

    fn clear(&self) {
        let mut err = io::stderr().lock();
        let _ = write!(err, "{}", CLEAR_LINE);
        let _ = err.flush();
    }
}

impl StatusSink for TerminalStatus {
    fn set_text(&mut self, text: &str) {
        self.text = text.to_string();
        self.redraw();
    }

    // Terminals have no hover or click; both are accepted and ignored.
    fn set_tooltip(&mut self, _tooltip: &str) {}

    fn set_command(&mut self, _command_id: &str) {}

    fn show(&mut self) {
        self.visible = true;
        self.redraw();
    }

    fn hide(&mut self) {
        if self.visible {
            self.clear();
        }
        self.visible = false;
    }

    fn dispose(&mut self) {
        self.hide();
        self.disposed = true;
    }
}

/// Swaps host icon tokens for characters a terminal can show.
pub fn render_icons(text: &str) -> String {
    text.replace("$(clock)", "\u{23F1}")
}

/// Prints notifications to stdout, errors to stderr.
///
/// `live` is set while a status line is on screen, so messages start on a
/// fresh line instead of overwriting it.
#[derive(Debug, Default)]
pub struct ConsoleNotifier {
    live: bool,
}

impl ConsoleNotifier {
    pub fn new() -> Self {
        Self { live: false }
    }

    pub fn live() -> Self {
        Self { live: true }
    }

    fn prefix(&self) -> &'static str {
        if self.live {
            CLEAR_LINE
        } else {
            ""
        }
    }
}

impl Notifier for ConsoleNotifier {
    fn info(&self, message: &str) -> Result<()> {
        let mut out = io::stdout().lock();
        writeln!(out, "{}{}", self.prefix(), message)
            .and_then(|_| out.flush())
            .map_err(|e| TrackerError::Notify(e.to_string()))
    }

    fn modal(&self, message: &str) -> Result<()> {
        self.info(message)
    }

    fn error(&self, message: &str) -> Result<()> {
        let mut err = io::stderr().lock();
        writeln!(err, "{}error: {}", self.prefix(), message)
            .and_then(|_| err.flush())
            .map_err(|e| TrackerError::Notify(e.to_string()))
    }
}
