//! Terminal User Interface for tickloop.
//!
//! The terminal is the display surface: the scheduler posts log lines and
//! settings changes through a [`crate::display::DisplayHandle`], and the
//! runner applies them on the UI thread before every frame.

mod events;
mod runner;
mod state;
mod views;

pub use events::{DEFAULT_POLL_INTERVAL, Event, EventHandler};
pub use runner::TuiRunner;
pub use state::{AppState, LoopSummary, MAX_OUTPUT_LINES};

use crossterm::{
    ExecutableCommand,
    event::{DisableBracketedPaste, EnableBracketedPaste},
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use eyre::Result;
use ratatui::prelude::*;
use std::io::{Stdout, stdout};

/// Type alias for our terminal backend.
pub type Tui = Terminal<CrosstermBackend<Stdout>>;

/// Initialize the terminal for TUI mode.
///
/// Enables raw mode and bracketed paste and switches to the alternate screen.
pub fn init_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    stdout().execute(EnterAlternateScreen)?;
    stdout().execute(EnableBracketedPaste)?;
    let backend = CrosstermBackend::new(stdout());
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore the terminal to its original state.
pub fn restore_terminal() -> Result<()> {
    disable_raw_mode()?;
    stdout().execute(DisableBracketedPaste)?;
    stdout().execute(LeaveAlternateScreen)?;
    Ok(())
}

pub mod colors {
    use ratatui::style::Color;

    use crate::display::LineColor;
    use crate::scheduler::LoopState;

    pub const RUNNING: Color = Color::Rgb(0, 255, 127); // Spring green
    pub const PENDING: Color = Color::Rgb(255, 215, 0); // Gold
    pub const STOPPED: Color = Color::Rgb(220, 20, 60); // Crimson
    pub const HEADER: Color = Color::Rgb(0, 255, 255); // Cyan
    pub const KEYBIND: Color = Color::Rgb(0, 255, 255); // Cyan
    pub const DIM: Color = Color::DarkGray;

    /// Terminal color for an output line
    pub fn line(color: LineColor) -> Color {
        match color {
            LineColor::LightGray => Color::Gray,
            LineColor::White => Color::White,
            LineColor::Yellow => Color::Yellow,
            LineColor::Red => Color::Red,
        }
    }

    pub fn loop_state(state: LoopState) -> Color {
        match state {
            LoopState::Running => RUNNING,
            LoopState::Constructed | LoopState::Initialized => PENDING,
            LoopState::Stopped => STOPPED,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::LineColor;
    use crate::scheduler::LoopState;
    use ratatui::style::Color;

    #[test]
    fn test_line_colors_are_distinct() {
        let mapped: Vec<Color> = LineColor::ALL.iter().map(|c| colors::line(*c)).collect();
        for (i, a) in mapped.iter().enumerate() {
            for b in &mapped[i + 1..] {
                assert_ne!(a, b);
            }
        }
    }

    #[test]
    fn test_loop_state_colors() {
        assert_eq!(colors::loop_state(LoopState::Running), colors::RUNNING);
        assert_eq!(colors::loop_state(LoopState::Initialized), colors::PENDING);
        assert_eq!(colors::loop_state(LoopState::Stopped), colors::STOPPED);
    }
}
