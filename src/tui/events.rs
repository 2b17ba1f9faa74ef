//! Event handling for the TUI.
//!
//! This module provides:
//! - `Event`: keyboard, paste, tick and resize events
//! - `EventHandler`: polls crossterm off the async runtime

use crossterm::event::{self, Event as CrosstermEvent, KeyEvent, KeyEventKind};
use eyre::Result;
use std::time::Duration;

/// How often the runner wakes to pump the display when idle
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(50);

#[derive(Debug, Clone)]
pub enum Event {
    Key(KeyEvent),
    /// Bracketed paste
    Paste(String),
    /// Poll timeout; time to pump display actions
    Tick,
    Resize(u16, u16),
}

/// Polls for crossterm events, producing a tick when nothing arrives in time.
pub struct EventHandler {
    poll_interval: Duration,
}

impl EventHandler {
    pub fn new(poll_interval: Duration) -> Self {
        Self { poll_interval }
    }

    /// Wait for the next event.
    pub async fn next(&self) -> Result<Event> {
        let poll_interval = self.poll_interval;

        let event = tokio::task::spawn_blocking(move || -> Result<Event> {
            if !event::poll(poll_interval)? {
                return Ok(Event::Tick);
            }
            let event = match event::read()? {
                // Only handle key press events, not release
                CrosstermEvent::Key(key) if key.kind == KeyEventKind::Press => Event::Key(key),
                CrosstermEvent::Paste(text) => Event::Paste(text),
                CrosstermEvent::Resize(w, h) => Event::Resize(w, h),
                _ => Event::Tick,
            };
            Ok(event)
        })
        .await??;

        Ok(event)
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new(DEFAULT_POLL_INTERVAL)
    }
}
