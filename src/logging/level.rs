//! Severity levels, display thresholds and file output modes

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::display::LineColor;
use crate::error::TickError;

/// Severity of a log line, lowest first
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Level {
    Info,
    Debug,
    Warning,
    Error,
}

impl Level {
    /// Color used when the line is shown on the display
    pub fn color(self) -> LineColor {
        match self {
            Level::Info => LineColor::LightGray,
            Level::Debug => LineColor::White,
            Level::Warning => LineColor::Yellow,
            Level::Error => LineColor::Red,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Level::Info => "Info",
            Level::Debug => "Debug",
            Level::Warning => "Warning",
            Level::Error => "Error",
        };
        f.write_str(name)
    }
}

impl From<Level> for log::Level {
    fn from(level: Level) -> Self {
        match level {
            Level::Info => log::Level::Info,
            Level::Debug => log::Level::Debug,
            Level::Warning => log::Level::Warn,
            Level::Error => log::Level::Error,
        }
    }
}

/// Lowest severity that still gets shown or written.
///
/// Stored in config as `LoggingLevel` 0..=4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum DisplayLevel {
    /// Info and above
    #[default]
    Info,
    /// Debug and above
    Debug,
    /// Warnings and errors
    Warning,
    /// Errors only
    Error,
    /// Nothing at all
    Off,
}

impl DisplayLevel {
    /// Whether a line at `level` passes this threshold
    pub fn allows(self, level: Level) -> bool {
        let floor = match self {
            DisplayLevel::Info => Level::Info,
            DisplayLevel::Debug => Level::Debug,
            DisplayLevel::Warning => Level::Warning,
            DisplayLevel::Error => Level::Error,
            DisplayLevel::Off => return false,
        };
        level >= floor
    }
}

impl TryFrom<u8> for DisplayLevel {
    type Error = TickError;

    fn try_from(value: u8) -> Result<Self, TickError> {
        match value {
            0 => Ok(DisplayLevel::Info),
            1 => Ok(DisplayLevel::Debug),
            2 => Ok(DisplayLevel::Warning),
            3 => Ok(DisplayLevel::Error),
            4 => Ok(DisplayLevel::Off),
            other => Err(TickError::Config(format!("LoggingLevel must be 0-4, got {}", other))),
        }
    }
}

impl From<DisplayLevel> for u8 {
    fn from(level: DisplayLevel) -> Self {
        match level {
            DisplayLevel::Info => 0,
            DisplayLevel::Debug => 1,
            DisplayLevel::Warning => 2,
            DisplayLevel::Error => 3,
            DisplayLevel::Off => 4,
        }
    }
}

/// Where log lines are persisted.
///
/// Stored in config as `LoggingMode` 0..=2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum LogMode {
    /// Every session appends to `log.txt`
    #[default]
    SingleFile,
    /// Each process start gets its own timestamped file
    NewFile,
    /// No file output
    ConsoleOnly,
}

impl LogMode {
    pub fn writes_files(self) -> bool {
        !matches!(self, LogMode::ConsoleOnly)
    }
}

impl TryFrom<u8> for LogMode {
    type Error = TickError;

    fn try_from(value: u8) -> Result<Self, TickError> {
        match value {
            0 => Ok(LogMode::SingleFile),
            1 => Ok(LogMode::NewFile),
            2 => Ok(LogMode::ConsoleOnly),
            other => Err(TickError::Config(format!("LoggingMode must be 0-2, got {}", other))),
        }
    }
}

impl From<LogMode> for u8 {
    fn from(mode: LogMode) -> Self {
        match mode {
            LogMode::SingleFile => 0,
            LogMode::NewFile => 1,
            LogMode::ConsoleOnly => 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_colors() {
        assert_eq!(Level::Info.color(), LineColor::LightGray);
        assert_eq!(Level::Debug.color(), LineColor::White);
        assert_eq!(Level::Warning.color(), LineColor::Yellow);
        assert_eq!(Level::Error.color(), LineColor::Red);
    }

    #[test]
    fn test_level_ordering() {
        assert!(Level::Info < Level::Debug);
        assert!(Level::Debug < Level::Warning);
        assert!(Level::Warning < Level::Error);
    }

    #[test]
    fn test_level_display() {
        assert_eq!(Level::Warning.to_string(), "Warning");
        assert_eq!(Level::Info.to_string(), "Info");
    }

    #[test]
    fn test_display_level_allows() {
        assert!(DisplayLevel::Info.allows(Level::Info));
        assert!(DisplayLevel::Info.allows(Level::Error));
        assert!(!DisplayLevel::Debug.allows(Level::Info));
        assert!(DisplayLevel::Debug.allows(Level::Debug));
        assert!(!DisplayLevel::Warning.allows(Level::Debug));
        assert!(DisplayLevel::Error.allows(Level::Error));
        assert!(!DisplayLevel::Error.allows(Level::Warning));
        assert!(!DisplayLevel::Off.allows(Level::Error));
    }

    #[test]
    fn test_display_level_from_u8() {
        assert_eq!(DisplayLevel::try_from(0).unwrap(), DisplayLevel::Info);
        assert_eq!(DisplayLevel::try_from(4).unwrap(), DisplayLevel::Off);
        assert!(DisplayLevel::try_from(5).is_err());
        assert_eq!(u8::from(DisplayLevel::Warning), 2);
    }

    #[test]
    fn test_log_mode_from_u8() {
        assert_eq!(LogMode::try_from(0).unwrap(), LogMode::SingleFile);
        assert_eq!(LogMode::try_from(1).unwrap(), LogMode::NewFile);
        assert_eq!(LogMode::try_from(2).unwrap(), LogMode::ConsoleOnly);
        assert!(LogMode::try_from(3).is_err());
    }

    #[test]
    fn test_log_mode_serde_as_number() {
        let json = serde_json::to_string(&LogMode::NewFile).unwrap();
        assert_eq!(json, "1");
        let mode: LogMode = serde_json::from_str("2").unwrap();
        assert_eq!(mode, LogMode::ConsoleOnly);
        assert!(serde_json::from_str::<LogMode>("7").is_err());
    }

    #[test]
    fn test_log_mode_writes_files() {
        assert!(LogMode::SingleFile.writes_files());
        assert!(LogMode::NewFile.writes_files());
        assert!(!LogMode::ConsoleOnly.writes_files());
    }
}
