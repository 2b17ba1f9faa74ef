//! Application state for the TUI.
//!
//! `AppState` is the display surface for the terminal front end: log lines
//! posted by the scheduler land in `output`, presentation settings land in
//! `font_size`/`input_color`, and the input line is edited in place.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::display::{DEFAULT_FONT_SIZE, DisplaySurface, LineColor};
use crate::scheduler::{LoopState, TickLoop};

/// Oldest output lines are dropped past this many
pub const MAX_OUTPUT_LINES: usize = 1000;

/// Snapshot of one loop for the status bar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoopSummary {
    pub name: String,
    pub state: LoopState,
    pub rate: u32,
    pub ticks: u64,
}

impl From<&TickLoop> for LoopSummary {
    fn from(lp: &TickLoop) -> Self {
        Self {
            name: lp.name().to_string(),
            state: lp.state(),
            rate: lp.effective_rate(),
            ticks: lp.tick_count(),
        }
    }
}

/// The primary application state.
#[derive(Debug)]
pub struct AppState {
    /// Lines shown in the output pane, oldest first
    pub output: Vec<(String, LineColor)>,
    /// Current input buffer
    pub input: String,
    pub font_size: u16,
    pub input_color: LineColor,
    /// Lines scrolled up from the bottom of the output
    pub scroll: usize,
    /// Submitted lines, oldest first
    pub history: Vec<String>,
    history_cursor: Option<usize>,
    pub loops: Vec<LoopSummary>,
    /// Line waiting to be queued by the runner
    pub pending_submit: Option<String>,
    /// Whether the application should quit
    pub should_quit: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            output: Vec::new(),
            input: String::new(),
            font_size: DEFAULT_FONT_SIZE,
            input_color: LineColor::White,
            scroll: 0,
            history: Vec::new(),
            history_cursor: None,
            loops: Vec::new(),
            pending_submit: None,
            should_quit: false,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Apply one key press
    pub fn handle_key(&mut self, key: KeyEvent) {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') | KeyCode::Char('d') if ctrl => self.should_quit = true,
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('u') if ctrl => self.input.clear(),
            KeyCode::Char(c) => self.input.push(c),
            KeyCode::Backspace => {
                self.input.pop();
            }
            KeyCode::Enter => self.submit(),
            KeyCode::Up => self.history_prev(),
            KeyCode::Down => self.history_next(),
            KeyCode::PageUp => self.scroll = (self.scroll + 10).min(self.output.len().saturating_sub(1)),
            KeyCode::PageDown => self.scroll = self.scroll.saturating_sub(10),
            _ => {}
        }
    }

    fn submit(&mut self) {
        let line = std::mem::take(&mut self.input);
        self.history_cursor = None;
        if line.trim().is_empty() {
            return;
        }
        self.history.push(line.clone());
        self.scroll = 0;
        self.pending_submit = Some(line);
    }

    fn history_prev(&mut self) {
        if self.history.is_empty() {
            return;
        }
        let idx = match self.history_cursor {
            Some(0) => 0,
            Some(i) => i - 1,
            None => self.history.len() - 1,
        };
        self.history_cursor = Some(idx);
        self.input = self.history[idx].clone();
    }

    fn history_next(&mut self) {
        match self.history_cursor {
            Some(i) if i + 1 < self.history.len() => {
                self.history_cursor = Some(i + 1);
                self.input = self.history[i + 1].clone();
            }
            Some(_) => {
                self.history_cursor = None;
                self.input.clear();
            }
            None => {}
        }
    }

    /// Loop counts for the status bar
    pub fn loop_counts_string(&self) -> String {
        let running = self.loops.iter().filter(|l| l.state == LoopState::Running).count();
        format!("{} loops │ {} running", self.loops.len(), running)
    }
}

impl DisplaySurface for AppState {
    fn append_colored_line(&mut self, text: &str, color: LineColor) {
        self.output.push((text.to_string(), color));
        if self.output.len() > MAX_OUTPUT_LINES {
            let excess = self.output.len() - MAX_OUTPUT_LINES;
            self.output.drain(..excess);
        }
    }

    fn set_font_size(&mut self, size: u16) {
        self.font_size = size;
    }

    fn set_input_color(&mut self, color: LineColor) {
        self.input_color = color;
    }
}
