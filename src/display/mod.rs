//! Display collaborator boundary
//!
//! The scheduler core never touches a presentation surface directly. Every
//! mutation is wrapped in a [`DisplayAction`] and posted to the thread that
//! owns the surface, which applies actions in the order they were posted.
//!
//! - [`Display`]: what the core sees (readiness + marshal point)
//! - [`DisplaySurface`]: what the owning thread mutates
//! - [`channel`]: a handle/pump pair connecting the two

pub mod console;
#[cfg(test)]
mod transcript;

#[cfg(test)]
pub use transcript::Transcript;

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};

use crate::error::TickError;

/// Font size a surface starts with
pub const DEFAULT_FONT_SIZE: u16 = 10;

/// Colors a line of output can be rendered in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineColor {
    #[default]
    LightGray,
    White,
    Yellow,
    Red,
}

impl LineColor {
    /// All colors, in severity order
    pub const ALL: [LineColor; 4] = [
        LineColor::LightGray,
        LineColor::White,
        LineColor::Yellow,
        LineColor::Red,
    ];
}

impl fmt::Display for LineColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LineColor::LightGray => "LightGray",
            LineColor::White => "White",
            LineColor::Yellow => "Yellow",
            LineColor::Red => "Red",
        };
        f.write_str(name)
    }
}

impl FromStr for LineColor {
    type Err = TickError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lightgray" | "light-gray" | "gray" | "grey" => Ok(LineColor::LightGray),
            "white" => Ok(LineColor::White),
            "yellow" => Ok(LineColor::Yellow),
            "red" => Ok(LineColor::Red),
            other => Err(TickError::InvalidArgument(format!("unknown color '{}'", other))),
        }
    }
}

/// A presentation surface owned by a single thread
pub trait DisplaySurface {
    /// Append one line of text in the given color
    fn append_colored_line(&mut self, text: &str, color: LineColor);

    /// Change the font size used for output
    fn set_font_size(&mut self, size: u16);

    /// Change the color used for the input line
    fn set_input_color(&mut self, color: LineColor);
}

/// Work to run against the surface on its owning thread
pub type DisplayAction = Box<dyn FnOnce(&mut dyn DisplaySurface) + Send>;

/// The capability the core consumes from the presentation layer
pub trait Display: Send + Sync {
    /// Whether the surface exists and accepts updates
    fn is_ready(&self) -> bool;

    /// Post an action to the surface's owning thread
    fn run_on_owning_thread(&self, action: DisplayAction);
}

/// Create a connected handle (for the core) and pump (for the owning thread)
pub fn channel() -> (DisplayHandle, DisplayPump) {
    let ready = Arc::new(AtomicBool::new(false));
    let (tx, rx) = mpsc::channel();
    (
        DisplayHandle {
            ready: ready.clone(),
            tx,
        },
        DisplayPump { ready, rx },
    )
}

/// Thread-safe side of the display channel
#[derive(Clone)]
pub struct DisplayHandle {
    ready: Arc<AtomicBool>,
    tx: Sender<DisplayAction>,
}

impl Display for DisplayHandle {
    fn is_ready(&self) -> bool {
        self.ready.load(Ordering::Acquire)
    }

    fn run_on_owning_thread(&self, action: DisplayAction) {
        if self.tx.send(action).is_err() {
            log::debug!("Display pump is gone, dropping display action");
        }
    }
}

/// Owning-thread side of the display channel
pub struct DisplayPump {
    ready: Arc<AtomicBool>,
    rx: Receiver<DisplayAction>,
}

impl DisplayPump {
    /// Mark the surface ready (or not) to receive updates
    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::Release);
    }

    /// Apply every posted action to the surface, returning how many ran
    pub fn pump(&self, surface: &mut dyn DisplaySurface) -> usize {
        let mut applied = 0;
        while let Ok(action) = self.rx.try_recv() {
            action(surface);
            applied += 1;
        }
        applied
    }
}

impl Drop for DisplayPump {
    fn drop(&mut self) {
        self.ready.store(false, Ordering::Release);
    }
}

/// A display that never becomes ready and discards everything
#[derive(Debug, Default, Clone, Copy)]
pub struct NullDisplay;

impl Display for NullDisplay {
    fn is_ready(&self) -> bool {
        false
    }

    fn run_on_owning_thread(&self, _action: DisplayAction) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_starts_not_ready() {
        let (handle, _pump) = channel();
        assert!(!handle.is_ready());
    }

    #[test]
    fn test_pump_applies_actions_in_order() {
        let (handle, pump) = channel();
        pump.set_ready(true);
        assert!(handle.is_ready());

        handle.run_on_owning_thread(Box::new(|s| s.append_colored_line("first", LineColor::Red)));
        handle.run_on_owning_thread(Box::new(|s| s.append_colored_line("second", LineColor::White)));
        handle.run_on_owning_thread(Box::new(|s| s.set_font_size(14)));

        let mut transcript = Transcript::new();
        assert_eq!(pump.pump(&mut transcript), 3);
        assert_eq!(transcript.texts(), vec!["first", "second"]);
        assert_eq!(transcript.lines[0].1, LineColor::Red);
        assert_eq!(transcript.font_size, 14);

        // Nothing left to apply
        assert_eq!(pump.pump(&mut transcript), 0);
    }

    #[test]
    fn test_dropping_pump_clears_ready() {
        let (handle, pump) = channel();
        pump.set_ready(true);
        drop(pump);
        assert!(!handle.is_ready());
        // Posting after the pump is gone is harmless
        handle.run_on_owning_thread(Box::new(|s| s.set_font_size(20)));
    }

    #[test]
    fn test_null_display_never_ready() {
        let display = NullDisplay;
        assert!(!display.is_ready());
        display.run_on_owning_thread(Box::new(|s| s.set_font_size(20)));
    }

    #[test]
    fn test_line_color_from_str() {
        assert_eq!("Yellow".parse::<LineColor>().unwrap(), LineColor::Yellow);
        assert_eq!("RED".parse::<LineColor>().unwrap(), LineColor::Red);
        assert_eq!("gray".parse::<LineColor>().unwrap(), LineColor::LightGray);
        assert!("purple".parse::<LineColor>().is_err());
    }

    #[test]
    fn test_line_color_display() {
        assert_eq!(LineColor::LightGray.to_string(), "LightGray");
        assert_eq!(LineColor::Red.to_string(), "Red");
    }

    #[test]
    fn test_transcript_contains_message() {
        let mut transcript = Transcript::new();
        transcript.append_colored_line("[2026-01-01 00:00:00] [Info] [Test] hello", LineColor::LightGray);
        assert!(transcript.contains_message("hello"));
        assert!(!transcript.contains_message("goodbye"));
    }
}
