//! Headless line-mode console
//!
//! Reads commands from stdin and prints log output to stdout with ANSI colors.
//! Used when no terminal UI is wanted (pipes, CI, `--headless`).

use std::io::{self, BufRead, Stdout, Write};
use std::sync::Arc;
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use colored::{ColoredString, Colorize};
use log::{debug, info};

use super::{DisplayPump, DisplaySurface, LineColor};
use crate::command::CommandQueue;
use crate::error::Result;

/// How often the console drains posted display actions
const PUMP_INTERVAL: Duration = Duration::from_millis(50);

/// Surface that writes each line to a writer
pub struct ConsoleSurface<W: Write> {
    out: W,
    font_size: u16,
    input_color: LineColor,
}

impl<W: Write> ConsoleSurface<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            font_size: super::DEFAULT_FONT_SIZE,
            input_color: LineColor::White,
        }
    }

    /// Font size last requested (terminals can't honor it, but commands can query it)
    pub fn font_size(&self) -> u16 {
        self.font_size
    }

    pub fn input_color(&self) -> LineColor {
        self.input_color
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

/// Apply a line color using `colored`
pub fn paint(text: &str, color: LineColor) -> ColoredString {
    match color {
        LineColor::LightGray => text.bright_black(),
        LineColor::White => text.white(),
        LineColor::Yellow => text.yellow(),
        LineColor::Red => text.red(),
    }
}

impl<W: Write> DisplaySurface for ConsoleSurface<W> {
    fn append_colored_line(&mut self, text: &str, color: LineColor) {
        // stdout going away is not something the log pipeline can report
        let _ = writeln!(self.out, "{}", paint(text, color));
    }

    fn set_font_size(&mut self, size: u16) {
        self.font_size = size;
    }

    fn set_input_color(&mut self, color: LineColor) {
        self.input_color = color;
    }
}

/// Drives the headless console until stdin closes
pub struct ConsoleRunner {
    pump: DisplayPump,
    queue: Arc<CommandQueue>,
    surface: ConsoleSurface<Stdout>,
}

impl ConsoleRunner {
    pub fn new(pump: DisplayPump, queue: Arc<CommandQueue>) -> Self {
        Self {
            pump,
            queue,
            surface: ConsoleSurface::new(io::stdout()),
        }
    }

    /// Forward stdin lines into the command queue and print display output.
    ///
    /// Returns once stdin is closed and every queued command has been taken.
    pub fn run(&mut self) -> Result<()> {
        self.pump.set_ready(true);

        let (tx, rx) = mpsc::channel::<String>();
        thread::Builder::new().name("stdin".to_string()).spawn(move || {
            for line in io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if tx.send(line).is_err() {
                    break;
                }
            }
            debug!("stdin closed");
        })?;

        info!("Headless console running");
        loop {
            match rx.recv_timeout(PUMP_INTERVAL) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        self.queue.enqueue(line);
                    }
                }
                Err(RecvTimeoutError::Timeout) => {}
                Err(RecvTimeoutError::Disconnected) => {
                    if self.queue.is_empty() {
                        break;
                    }
                    thread::sleep(PUMP_INTERVAL);
                }
            }
            self.pump.pump(&mut self.surface);
            self.surface.out.flush()?;
        }
        Ok(())
    }

    /// Print whatever was posted after `run` returned; call after the runtime shuts down
    pub fn finish(mut self) -> Result<()> {
        self.pump.pump(&mut self.surface);
        self.surface.out.flush()?;
        info!("Headless console finished");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_surface_writes_lines() {
        colored::control::set_override(false);
        let mut surface = ConsoleSurface::new(Vec::new());
        surface.append_colored_line("hello", LineColor::Yellow);
        surface.append_colored_line("world", LineColor::Red);
        let out = String::from_utf8(surface.into_inner()).unwrap();
        assert_eq!(out, "hello\nworld\n");
    }

    #[test]
    fn test_console_surface_settings() {
        let mut surface = ConsoleSurface::new(Vec::new());
        assert_eq!(surface.font_size(), super::super::DEFAULT_FONT_SIZE);
        surface.set_font_size(18);
        surface.set_input_color(LineColor::Red);
        assert_eq!(surface.font_size(), 18);
        assert_eq!(surface.input_color(), LineColor::Red);
    }

    #[test]
    fn test_paint_keeps_text() {
        colored::control::set_override(false);
        assert_eq!(paint("abc", LineColor::White).to_string(), "abc");
    }
}
