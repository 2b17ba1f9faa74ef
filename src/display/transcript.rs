//! Recording surface for tests

use super::{DEFAULT_FONT_SIZE, DisplaySurface, LineColor};

/// In-memory surface that records what was shown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcript {
    pub lines: Vec<(String, LineColor)>,
    pub font_size: u16,
    pub input_color: LineColor,
}

impl Default for Transcript {
    fn default() -> Self {
        Self {
            lines: Vec::new(),
            font_size: DEFAULT_FONT_SIZE,
            input_color: LineColor::White,
        }
    }
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Text of every recorded line
    pub fn texts(&self) -> Vec<&str> {
        self.lines.iter().map(|(text, _)| text.as_str()).collect()
    }

    /// Whether any line ends with the given message
    pub fn contains_message(&self, message: &str) -> bool {
        self.lines.iter().any(|(text, _)| text.ends_with(message))
    }
}

impl DisplaySurface for Transcript {
    fn append_colored_line(&mut self, text: &str, color: LineColor) {
        self.lines.push((text.to_string(), color));
    }

    fn set_font_size(&mut self, size: u16) {
        self.font_size = size;
    }

    fn set_input_color(&mut self, color: LineColor) {
        self.input_color = color;
    }
}
