//! TUI Runner - main event loop.
//!
//! The `TuiRunner` owns the terminal and the display surface. It runs the
//! main loop: pump display actions → render → handle events → repeat.
//! Submitted lines go onto the runtime's command queue; the game loop picks
//! them up from there.

use super::Tui;
use super::events::{Event, EventHandler};
use super::state::{AppState, LoopSummary};
use super::views::render;
use crate::command::CommandQueue;
use crate::display::DisplayPump;
use crate::scheduler::LoopRegistry;
use eyre::Result;
use log::{debug, info};
use std::sync::Arc;

pub struct TuiRunner {
    terminal: Tui,
    state: AppState,
    event_handler: EventHandler,
    pump: DisplayPump,
    queue: Arc<CommandQueue>,
    loops: Arc<LoopRegistry>,
}

impl TuiRunner {
    pub fn new(terminal: Tui, pump: DisplayPump, queue: Arc<CommandQueue>, loops: Arc<LoopRegistry>) -> Self {
        Self {
            terminal,
            state: AppState::new(),
            event_handler: EventHandler::default(),
            pump,
            queue,
            loops,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Run until the user quits.
    pub async fn run(&mut self) -> Result<()> {
        info!("Starting TUI main loop");
        self.pump.set_ready(true);

        loop {
            // 1. Apply whatever the scheduler posted
            self.pump.pump(&mut self.state);
            self.refresh_loops();

            // 2. Render current state
            self.terminal.draw(|f| render(&self.state, f))?;

            // 3. Handle events (keyboard, paste, tick)
            match self.event_handler.next().await? {
                Event::Key(key) => self.state.handle_key(key),
                Event::Paste(text) => self.state.input.push_str(text.trim_end_matches(['\r', '\n'])),
                Event::Tick | Event::Resize(_, _) => {}
            }

            // 4. Hand submitted lines to the scheduler
            if let Some(line) = self.state.pending_submit.take() {
                debug!("Queueing command: {}", line);
                self.queue.enqueue(line);
            }

            if self.state.should_quit {
                break;
            }
        }

        self.pump.set_ready(false);
        info!("TUI main loop ended");
        Ok(())
    }

    fn refresh_loops(&mut self) {
        self.state.loops = self
            .loops
            .snapshot()
            .iter()
            .map(|lp| LoopSummary::from(lp.as_ref()))
            .collect();
    }
}
