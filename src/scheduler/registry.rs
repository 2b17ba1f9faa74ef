//! Ordered registry of loops
//!
//! Appends happen during startup; steady-state readers take a snapshot, so a
//! loop registered mid-cycle is simply picked up by the next cycle.

use std::sync::{Arc, RwLock, RwLockReadGuard};

use super::tick_loop::TickLoop;
use crate::error::{Result, TickError};

#[derive(Debug, Default)]
pub struct LoopRegistry {
    loops: RwLock<Vec<Arc<TickLoop>>>,
}

impl LoopRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Arc<TickLoop>>> {
        self.loops.read().unwrap_or_else(|e| e.into_inner())
    }

    /// Append a loop; names must be unique
    pub fn register(&self, lp: Arc<TickLoop>) -> Result<()> {
        let mut loops = self.loops.write().unwrap_or_else(|e| e.into_inner());
        if loops.iter().any(|l| l.name() == lp.name()) {
            return Err(TickError::LoopExists(lp.name().to_string()));
        }
        loops.push(lp);
        Ok(())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.read().iter().any(|l| l.name() == name)
    }

    pub fn get(&self, name: &str) -> Option<Arc<TickLoop>> {
        self.read().iter().find(|l| l.name() == name).cloned()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Registered loops, in registration order
    pub fn snapshot(&self) -> Vec<Arc<TickLoop>> {
        self.read().clone()
    }

    pub fn names(&self) -> Vec<String> {
        self.read().iter().map(|l| l.name().to_string()).collect()
    }

    /// Initialize every loop in registration order
    pub fn initialize_all(&self) -> Result<()> {
        for lp in self.snapshot() {
            lp.initialize()?;
        }
        Ok(())
    }

    /// Tick every loop once on the calling thread, in registration order
    pub fn tick_all(&self) {
        for lp in self.snapshot() {
            lp.tick();
        }
    }

    /// Stop every loop, most recently registered first
    pub fn stop_all(&self) {
        for lp in self.snapshot().into_iter().rev() {
            lp.stop();
        }
    }
}
