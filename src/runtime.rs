//! Runtime - the owned scheduler context
//!
//! Holds everything the scheduler shares between threads: the loop registry,
//! the logger registry, the command queue and the command handler. Dropping a
//! runtime shuts it down.

use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::command::{Command, CommandHandler, CommandQueue, builtin};
use crate::config::Settings;
use crate::display::Display;
use crate::error::Result;
use crate::logging::{Log, MasterLog};
use crate::scheduler::{GameLoop, LoopRegistry, MasterLoop};

pub struct Runtime {
    settings: Settings,
    logs: Arc<MasterLog>,
    loops: Arc<LoopRegistry>,
    queue: Arc<CommandQueue>,
    handler: Arc<CommandHandler>,
    log: Arc<Log>,
    shut_down: AtomicBool,
}

impl Runtime {
    /// Load settings from `config_path` (creating it if needed) and assemble a runtime
    pub fn boot<P: AsRef<Path>>(config_path: P, display: Arc<dyn Display>) -> Result<Self> {
        let logs = Arc::new(MasterLog::new(display.clone()));
        let settings = {
            let config_log = logs.logger("Config");
            Settings::load(config_path, &config_log)?
        };
        logs.setup(&settings)?;
        Self::assemble(settings, logs, display, builtin::commands())
    }

    /// Assemble a runtime from settings already in hand, with the built-in commands
    pub fn new(settings: Settings, display: Arc<dyn Display>) -> Result<Self> {
        Self::with_commands(settings, display, builtin::commands())
    }

    pub fn with_commands(settings: Settings, display: Arc<dyn Display>, commands: Vec<Box<dyn Command>>) -> Result<Self> {
        let logs = Arc::new(MasterLog::new(display.clone()));
        logs.setup(&settings)?;
        Self::assemble(settings, logs, display, commands)
    }

    fn assemble(
        settings: Settings,
        logs: Arc<MasterLog>,
        display: Arc<dyn Display>,
        commands: Vec<Box<dyn Command>>,
    ) -> Result<Self> {
        let log = logs.logger("Program");
        let loops = Arc::new(LoopRegistry::new());
        let queue = Arc::new(CommandQueue::new());
        let handler = Arc::new(CommandHandler::new(
            commands,
            logs.logger("CommandHandler"),
            display,
            Arc::downgrade(&loops),
        )?);

        GameLoop::create(&loops, &logs, settings.tps, queue.clone(), handler.clone())?;
        MasterLoop::create(&loops, &logs, settings.tps)?;

        log::info!("Runtime assembled with {} loops at {} TPS", loops.len(), settings.tps);
        Ok(Self {
            settings,
            logs,
            loops,
            queue,
            handler,
            log,
            shut_down: AtomicBool::new(false),
        })
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn logs(&self) -> &Arc<MasterLog> {
        &self.logs
    }

    pub fn loops(&self) -> &Arc<LoopRegistry> {
        &self.loops
    }

    pub fn queue(&self) -> &Arc<CommandQueue> {
        &self.queue
    }

    pub fn handler(&self) -> &Arc<CommandHandler> {
        &self.handler
    }

    pub fn log(&self) -> &Log {
        &self.log
    }

    /// Queue a raw line for the game loop
    pub fn enqueue_command(&self, line: impl Into<String>) {
        self.queue.enqueue(line);
    }

    /// Initialize every loop; the supervisor and game loop start their threads
    pub fn initialize_all(&self) -> Result<()> {
        self.loops.initialize_all()?;
        self.log.debug("All loops initialized.");
        Ok(())
    }

    /// Tick every loop once on the calling thread
    pub fn tick_all(&self) {
        self.loops.tick_all();
    }

    /// Stop every loop and flush what's left in the logs. Safe to call twice.
    pub fn shutdown_all(&self) {
        if self.shut_down.swap(true, Ordering::SeqCst) {
            return;
        }
        self.log.info("Shutting down...");
        self.loops.stop_all();
        self.logs.tick_all();
        log::info!("Runtime shut down");
    }
}

impl Drop for Runtime {
    fn drop(&mut self) {
        self.shutdown_all();
    }
}
