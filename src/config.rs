//! Persistent settings
//!
//! Settings live in a small JSON file (`config.json` by default). A missing or
//! unreadable file is never fatal: defaults are written back to disk and used.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::Result;
use crate::logging::{DisplayLevel, Log, LogMode};

/// Default settings file name, relative to the working directory
pub const DEFAULT_CONFIG_PATH: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "PascalCase")]
pub struct Settings {
    /// Enables debug-level output
    pub debug: bool,
    /// Lowest severity shown or written
    pub logging_level: DisplayLevel,
    /// Where log lines are persisted
    pub logging_mode: LogMode,
    /// Directory log files are written to
    pub log_path: PathBuf,
    /// Ticks per second; validated by each loop at construction
    #[serde(rename = "TPS")]
    pub tps: i64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: false,
            logging_level: DisplayLevel::Info,
            logging_mode: LogMode::SingleFile,
            log_path: PathBuf::from("logs/"),
            tps: 5,
        }
    }
}

impl Settings {
    /// Load settings from `path`, creating a default file if it can't be read
    pub fn load<P: AsRef<Path>>(path: P, log: &Log) -> Result<Self> {
        let path = path.as_ref();
        log.debug(&format!("Loading config from {}...", path.display()));

        match Self::load_from_file(path) {
            Ok(settings) => {
                log.debug("Config loaded successfully.");
                Ok(settings)
            }
            Err(e) => {
                log::warn!("Failed to load config from {}: {}", path.display(), e);
                log.debug("Config could not be found, creating a default config file.");
                let settings = Self::default();
                settings.save(path)?;
                log.debug("A default config has been created.");
                Ok(settings)
            }
        }
    }

    fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        let settings: Self = serde_json::from_str(&content)?;
        log::info!("Loaded config from: {}", path.display());
        Ok(settings)
    }

    /// Write settings as pretty-printed JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }
}
