//! MasterLoop - the supervisor
//!
//! The only self-paced loop. Every cycle it triggers a tick on every other
//! registered loop, then rests for its own interval. Triggered loops run the
//! tick on their own threads, so a slow loop never holds up its siblings.

use std::ptr;
use std::sync::{Arc, Weak};

use super::registry::LoopRegistry;
use super::tick_loop::{LoopHook, Pacing, TickLoop};
use crate::error::{Result, TickError};
use crate::logging::MasterLog;

pub struct MasterLoop {
    registry: Weak<LoopRegistry>,
}

impl MasterLoop {
    pub const NAME: &'static str = "MasterLoop";

    /// Create and register the supervisor for `registry`
    pub fn create(registry: &Arc<LoopRegistry>, logs: &MasterLog, tps: i64) -> Result<Arc<TickLoop>> {
        let hook = Self {
            registry: Arc::downgrade(registry),
        };
        TickLoop::create(registry, logs, Self::NAME, tps, Box::new(hook))
    }
}

impl LoopHook for MasterLoop {
    fn pacing(&self) -> Pacing {
        Pacing::SelfPaced
    }

    fn on_tick(&self, this: &TickLoop) -> Result<()> {
        let registry = self
            .registry
            .upgrade()
            .ok_or_else(|| TickError::InvalidState("loop registry has been dropped".to_string()))?;

        for other in registry.snapshot() {
            if ptr::eq(Arc::as_ptr(&other), this) {
                continue;
            }
            other.trigger();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::display::NullDisplay;
    use crate::scheduler::tick_loop::LoopState;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::thread;
    use std::time::{Duration, Instant};

    struct Counter(Arc<AtomicUsize>);

    impl LoopHook for Counter {
        fn on_tick(&self, _this: &TickLoop) -> Result<()> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    struct Sleeper(Duration);

    impl LoopHook for Sleeper {
        fn on_tick(&self, _this: &TickLoop) -> Result<()> {
            thread::sleep(self.0);
            Ok(())
        }
    }

    fn wait_until(timeout: Duration, cond: impl Fn() -> bool) -> bool {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if cond() {
                return true;
            }
            thread::sleep(Duration::from_millis(2));
        }
        cond()
    }

    fn counter(registry: &LoopRegistry, logs: &MasterLog, name: &str) -> (Arc<TickLoop>, Arc<AtomicUsize>) {
        let hits = Arc::new(AtomicUsize::new(0));
        let lp = TickLoop::create(registry, logs, name, 100, Box::new(Counter(hits.clone()))).unwrap();
        (lp, hits)
    }

    #[test]
    fn test_master_drives_workers() {
        let registry = Arc::new(LoopRegistry::new());
        let logs = MasterLog::new(Arc::new(NullDisplay));
        let (_a, a_hits) = counter(&registry, &logs, "A");
        let (_b, b_hits) = counter(&registry, &logs, "B");
        let master = MasterLoop::create(&registry, &logs, 200).unwrap();

        registry.initialize_all().unwrap();
        assert_eq!(master.state(), LoopState::Running);

        assert!(wait_until(Duration::from_secs(3), || {
            a_hits.load(Ordering::SeqCst) >= 3 && b_hits.load(Ordering::SeqCst) >= 3
        }));

        registry.stop_all();
    }

    #[test]
    fn test_master_skips_itself() {
        let registry = Arc::new(LoopRegistry::new());
        let logs = MasterLog::new(Arc::new(NullDisplay));
        let master = MasterLoop::create(&registry, &logs, 5).unwrap();

        // A synchronous tick with no siblings just returns
        assert!(master.tick());
        assert_eq!(master.tick_count(), 1);
    }

    #[test]
    fn test_slow_worker_does_not_block_siblings() {
        let registry = Arc::new(LoopRegistry::new());
        let logs = MasterLog::new(Arc::new(NullDisplay));
        TickLoop::create(
            &registry,
            &logs,
            "Slow",
            5,
            Box::new(Sleeper(Duration::from_millis(300))),
        )
        .unwrap();
        let (_fast, fast_hits) = counter(&registry, &logs, "Fast");
        MasterLoop::create(&registry, &logs, 100).unwrap();

        registry.initialize_all().unwrap();
        assert!(wait_until(Duration::from_millis(250), || fast_hits.load(Ordering::SeqCst) >= 5));
        registry.stop_all();
    }

    #[test]
    fn test_loop_registered_after_start_is_picked_up() {
        let registry = Arc::new(LoopRegistry::new());
        let logs = MasterLog::new(Arc::new(NullDisplay));
        let master = MasterLoop::create(&registry, &logs, 100).unwrap();
        master.initialize().unwrap();

        let (late, late_hits) = counter(&registry, &logs, "Late");
        late.initialize().unwrap();

        assert!(wait_until(Duration::from_secs(2), || late_hits.load(Ordering::SeqCst) >= 1));
        registry.stop_all();
    }

    #[test]
    fn test_dropped_registry_faults_tick() {
        let registry = Arc::new(LoopRegistry::new());
        let logs = MasterLog::new(Arc::new(NullDisplay));
        let master = MasterLoop::create(&registry, &logs, 5).unwrap();
        drop(registry);
        assert!(!master.tick());
    }
}
