//! Queued, thread-safe logging pipeline
//!
//! Every [`Log`] is a named source with two buffers: lines waiting for a log
//! file and entries waiting for the display. A [`MasterLog`] owns the registry
//! of loggers and the shared output settings; [`MasterLog::tick_all`] flushes
//! every registered logger and is safe to call from any thread.
//!
//! Line format: `[YYYY-MM-DD HH:mm:ss] [Level] [LoggerName] message`

pub mod file;
pub mod level;

pub use file::{SINGLE_FILE_NAME, append_lines, resolve_log_file, session_file_name};
pub use level::{DisplayLevel, Level, LogMode};

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

use chrono::{DateTime, Local};

use crate::config::Settings;
use crate::display::Display;
use crate::error::Result;

/// Render one log line
pub fn format_line(at: DateTime<Local>, level: Level, logger: &str, message: &str) -> String {
    format!("[{}] [{}] [{}] {}", at.format("%Y-%m-%d %H:%M:%S"), level, logger, message)
}

/// Output settings shared by the master and every logger
struct Shared {
    display: Arc<dyn Display>,
    /// `None` until the master log has been set up
    mode: RwLock<Option<LogMode>>,
    display_level: RwLock<DisplayLevel>,
    debug: AtomicBool,
    log_file: RwLock<Option<PathBuf>>,
}

impl Shared {
    fn mode(&self) -> Option<LogMode> {
        *self.mode.read().unwrap_or_else(|e| e.into_inner())
    }

    fn display_level(&self) -> DisplayLevel {
        *self.display_level.read().unwrap_or_else(|e| e.into_inner())
    }

    fn log_file(&self) -> Option<PathBuf> {
        self.log_file.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn dispatch(&self, text: String, level: Level) {
        let color = level.color();
        self.display
            .run_on_owning_thread(Box::new(move |surface| surface.append_colored_line(&text, color)));
    }
}

/// A display line waiting for the surface to become ready
#[derive(Debug, Clone)]
struct QueuedEntry {
    text: String,
    level: Level,
    dispatched: bool,
}

#[derive(Debug, Default)]
struct Pending {
    file_lines: Vec<String>,
    display: Vec<QueuedEntry>,
}

impl Pending {
    fn dispatch_display(&mut self, shared: &Shared) {
        for entry in self.display.iter_mut().filter(|entry| !entry.dispatched) {
            entry.dispatched = true;
            shared.dispatch(entry.text.clone(), entry.level);
        }
        self.display.clear();
    }

    fn write_file_lines(&mut self, path: &Path) {
        if self.file_lines.is_empty() {
            return;
        }
        let lines = std::mem::take(&mut self.file_lines);
        if let Err(e) = append_lines(path, &lines) {
            log::error!("Failed to write {} lines to {}: {}", lines.len(), path.display(), e);
        }
    }
}

/// A named source of log output
pub struct Log {
    name: String,
    shared: Arc<Shared>,
    pending: Mutex<Pending>,
}

impl Log {
    pub fn name(&self) -> &str {
        &self.name
    }

    fn pending(&self) -> MutexGuard<'_, Pending> {
        self.pending.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Log a message at the given level
    pub fn print(&self, level: Level, message: &str) {
        let facade_level: log::Level = level.into();
        log::log!(target: self.name.as_str(), facade_level, "{}", message);

        let shared = &self.shared;
        if level == Level::Debug && !shared.debug.load(Ordering::Relaxed) {
            return;
        }
        if !shared.display_level().allows(level) {
            return;
        }

        let line = format_line(Local::now(), level, &self.name, message);
        let mut pending = self.pending();

        if shared.display.is_ready() {
            // Older buffered entries go first
            pending.dispatch_display(shared);
            shared.dispatch(line.clone(), level);
        } else {
            pending.display.push(QueuedEntry {
                text: line.clone(),
                level,
                dispatched: false,
            });
        }

        if shared.mode().is_none_or(|mode| mode.writes_files()) {
            pending.file_lines.push(line);
            if let Some(path) = shared.log_file() {
                pending.write_file_lines(&path);
            }
        }
    }

    /// Low-level information, shown in light gray
    pub fn info(&self, message: &str) {
        self.print(Level::Info, message);
    }

    /// Debug output, shown in white; dropped unless debug is enabled
    pub fn debug(&self, message: &str) {
        self.print(Level::Debug, message);
    }

    /// Something that shouldn't happen but isn't critical, shown in yellow
    pub fn warning(&self, message: &str) {
        self.print(Level::Warning, message);
    }

    /// Shown in red
    pub fn error(&self, message: &str) {
        self.print(Level::Error, message);
    }

    /// Flush this logger's buffers.
    ///
    /// Entries are marked dispatched under the lock before they are posted, so
    /// a concurrent flush can never post the same entry twice.
    pub fn flush(&self) {
        let log_file = self.shared.log_file();
        let ready = self.shared.display.is_ready();

        let mut pending = self.pending();
        if let Some(path) = log_file {
            pending.write_file_lines(&path);
        }
        if ready {
            pending.dispatch_display(&self.shared);
        }
    }

    /// Lines waiting to be written to a file
    pub fn pending_file_lines(&self) -> usize {
        self.pending().file_lines.len()
    }

    /// Entries waiting for the display
    pub fn pending_display_entries(&self) -> usize {
        self.pending().display.len()
    }

    fn discard_file_lines(&self) {
        self.pending().file_lines.clear();
    }
}

/// Registry of loggers plus the output settings they share
pub struct MasterLog {
    shared: Arc<Shared>,
    instances: RwLock<Vec<Arc<Log>>>,
}

impl MasterLog {
    /// Create a master log writing to `display`.
    ///
    /// Until [`MasterLog::setup`] runs, file lines are buffered and debug
    /// output is let through.
    pub fn new(display: Arc<dyn Display>) -> Self {
        Self {
            shared: Arc::new(Shared {
                display,
                mode: RwLock::new(None),
                display_level: RwLock::new(DisplayLevel::default()),
                debug: AtomicBool::new(true),
                log_file: RwLock::new(None),
            }),
            instances: RwLock::new(Vec::new()),
        }
    }

    /// Create and register a named logger
    pub fn logger(&self, name: impl Into<String>) -> Arc<Log> {
        let log = Arc::new(Log {
            name: name.into(),
            shared: self.shared.clone(),
            pending: Mutex::new(Pending::default()),
        });
        self.instances
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .push(log.clone());
        log
    }

    /// Apply settings, resolve the log file for this session and flush what
    /// was buffered before it
    pub fn setup(&self, settings: &Settings) -> Result<()> {
        self.set_display_level(settings.logging_level);
        self.set_debug(settings.debug);
        self.set_mode(settings.logging_mode);

        let path = resolve_log_file(settings.logging_mode, &settings.log_path, Local::now())?;
        if let Some(path) = &path {
            log::info!("Log file resolved to {}", path.display());
        }
        *self.shared.log_file.write().unwrap_or_else(|e| e.into_inner()) = path;

        // Lines logged before the file was known go out ahead of anything newer
        self.tick_all();
        Ok(())
    }

    /// Set the file output mode; switching to console-only drops buffered file lines
    pub fn set_mode(&self, mode: LogMode) {
        *self.shared.mode.write().unwrap_or_else(|e| e.into_inner()) = Some(mode);
        if !mode.writes_files() {
            *self.shared.log_file.write().unwrap_or_else(|e| e.into_inner()) = None;
            for log in self.snapshot() {
                log.discard_file_lines();
            }
        }
    }

    pub fn set_display_level(&self, level: DisplayLevel) {
        *self.shared.display_level.write().unwrap_or_else(|e| e.into_inner()) = level;
    }

    pub fn set_debug(&self, enabled: bool) {
        self.shared.debug.store(enabled, Ordering::Relaxed);
    }

    pub fn mode(&self) -> Option<LogMode> {
        self.shared.mode()
    }

    pub fn display_level(&self) -> DisplayLevel {
        self.shared.display_level()
    }

    pub fn debug_enabled(&self) -> bool {
        self.shared.debug.load(Ordering::Relaxed)
    }

    pub fn log_file(&self) -> Option<PathBuf> {
        self.shared.log_file()
    }

    /// Number of registered loggers
    pub fn len(&self) -> usize {
        self.instances.read().unwrap_or_else(|e| e.into_inner()).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn snapshot(&self) -> Vec<Arc<Log>> {
        self.instances.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Flush every registered logger
    pub fn tick_all(&self) {
        for log in self.snapshot() {
            log.flush();
        }
    }
}
