//! GameLoop - the worker that consumes commands
//!
//! Each tick flushes every logger, then takes at most one line off the command
//! queue and dispatches it. Throughput is therefore capped at the loop's rate;
//! anything beyond that waits in the queue.

use std::sync::Arc;

use super::registry::LoopRegistry;
use super::tick_loop::{LoopHook, TickLoop};
use crate::command::{CommandHandler, CommandQueue};
use crate::error::Result;
use crate::logging::MasterLog;

pub struct GameLoop {
    logs: Arc<MasterLog>,
    queue: Arc<CommandQueue>,
    handler: Arc<CommandHandler>,
}

impl GameLoop {
    pub const NAME: &'static str = "GameLoop";

    pub fn create(
        registry: &LoopRegistry,
        logs: &Arc<MasterLog>,
        tps: i64,
        queue: Arc<CommandQueue>,
        handler: Arc<CommandHandler>,
    ) -> Result<Arc<TickLoop>> {
        let hook = Self {
            logs: logs.clone(),
            queue,
            handler,
        };
        TickLoop::create(registry, logs, Self::NAME, tps, Box::new(hook))
    }
}

impl LoopHook for GameLoop {
    fn on_tick(&self, _this: &TickLoop) -> Result<()> {
        self.logs.tick_all();

        if self.queue.is_empty() {
            return Ok(());
        }
        // Another consumer may have won the race since the check
        let Some(line) = self.queue.try_dequeue() else {
            return Ok(());
        };
        self.handler.process_command(&line);
        Ok(())
    }
}
