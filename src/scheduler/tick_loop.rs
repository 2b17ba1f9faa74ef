//! Fixed-rate ticking unit
//!
//! A [`TickLoop`] pairs a [`LoopHook`] (the unit of work) with a dedicated
//! thread. Most loops are `Triggered`: their thread sleeps until someone calls
//! [`TickLoop::trigger`] and then runs one tick. A `SelfPaced` loop owns the
//! wall clock instead and ticks every rest interval until stopped.
//!
//! Lifecycle: `Constructed → Initialized → Running → Stopped`

use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use chrono::{DateTime, Local};
use crossbeam_channel::{Receiver, RecvTimeoutError, Sender, TrySendError};

use super::cancel::CancelToken;
use super::registry::LoopRegistry;
use crate::error::{Result, TickError, panic_message};
use crate::logging::{Log, MasterLog};

/// Rate used when the configured one is out of range
pub const DEFAULT_TPS: u32 = 5;
/// Slowest accepted rate
pub const MIN_TPS: u32 = 1;
/// Fastest accepted rate
pub const MAX_TPS: u32 = 1000;
/// How long `stop` waits for a loop thread before detaching it
pub const SHUTDOWN_DEADLINE: Duration = Duration::from_secs(2);
/// Consecutive failed cycles after which a self-paced loop gives up
pub const MAX_CONSECUTIVE_FAULTS: u32 = 10;

/// The configured rate if it lies in `[MIN_TPS, MAX_TPS]`
pub fn validate_tps(configured: i64) -> Option<u32> {
    if (i64::from(MIN_TPS)..=i64::from(MAX_TPS)).contains(&configured) {
        u32::try_from(configured).ok()
    } else {
        None
    }
}

/// Time between cycles at `rate` ticks per second
pub fn rest_interval(rate: u32) -> Duration {
    Duration::from_millis(1000 / u64::from(rate.max(MIN_TPS)))
}

/// Lifecycle state of a loop
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopState {
    Constructed,
    Initialized,
    Running,
    Stopped,
}

impl fmt::Display for LoopState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// Who decides when a loop ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pacing {
    /// One tick per [`TickLoop::trigger`]
    Triggered,
    /// Ticks on its own every rest interval
    SelfPaced,
}

/// What `initialize` should do after the hook runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Startup {
    /// Start the loop thread now
    Immediate,
    /// Leave the loop initialized; someone calls `start` later
    Deferred,
}

/// The work a loop performs
pub trait LoopHook: Send + Sync {
    fn pacing(&self) -> Pacing {
        Pacing::Triggered
    }

    fn on_initialize(&self, _this: &TickLoop) -> Result<Startup> {
        Ok(Startup::Immediate)
    }

    fn on_start(&self, _this: &TickLoop) -> Result<()> {
        Ok(())
    }

    fn on_stop(&self, _this: &TickLoop) {}

    /// One unit of work
    fn on_tick(&self, this: &TickLoop) -> Result<()>;
}

#[derive(Default)]
struct Worker {
    handle: Option<JoinHandle<()>>,
    trigger: Option<Sender<()>>,
    /// Disconnects when the worker thread exits
    done: Option<Receiver<()>>,
}

/// A named, fixed-rate unit of repeated work with its own thread
pub struct TickLoop {
    name: String,
    effective_rate: u32,
    rest: Duration,
    created_at: DateTime<Local>,
    running: AtomicBool,
    ticks: AtomicU64,
    state: Mutex<LoopState>,
    cancel: CancelToken,
    worker: Mutex<Worker>,
    hook: Box<dyn LoopHook>,
    log: Arc<Log>,
}

impl TickLoop {
    /// Construct a loop and register it.
    ///
    /// An out-of-range `tps` falls back to [`DEFAULT_TPS`] with a warning.
    pub fn create(
        registry: &LoopRegistry,
        logs: &MasterLog,
        name: &str,
        tps: i64,
        hook: Box<dyn LoopHook>,
    ) -> Result<Arc<Self>> {
        if registry.contains(name) {
            return Err(TickError::LoopExists(name.to_string()));
        }

        let log = logs.logger(name);
        let effective_rate = match validate_tps(tps) {
            Some(rate) => rate,
            None => {
                log.warning(&format!(
                    "TPS was invalid ({} is not within {}-{}). Defaulting to {}.",
                    tps, MIN_TPS, MAX_TPS, DEFAULT_TPS
                ));
                DEFAULT_TPS
            }
        };

        let this = Arc::new(Self {
            name: name.to_string(),
            effective_rate,
            rest: rest_interval(effective_rate),
            created_at: Local::now(),
            running: AtomicBool::new(false),
            ticks: AtomicU64::new(0),
            state: Mutex::new(LoopState::Constructed),
            cancel: CancelToken::new(),
            worker: Mutex::new(Worker::default()),
            hook,
            log,
        });

        log::debug!("Adding loop: {} ({} TPS)", name, effective_rate);
        this.log.debug(&format!("Adding loop: {}.", name));
        registry.register(this.clone())?;
        Ok(this)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn effective_rate(&self) -> u32 {
        self.effective_rate
    }

    pub fn rest_interval(&self) -> Duration {
        self.rest
    }

    pub fn created_at(&self) -> DateTime<Local> {
        self.created_at
    }

    /// Ticks run so far
    pub fn tick_count(&self) -> u64 {
        self.ticks.load(Ordering::SeqCst)
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    pub fn state(&self) -> LoopState {
        *self.lock_state()
    }

    /// The loop's own logger
    pub fn log(&self) -> &Log {
        &self.log
    }

    /// Sleep for one rest interval; returns `true` if the loop was cancelled meanwhile
    pub fn rest(&self) -> bool {
        self.cancel.wait_timeout(self.rest)
    }

    fn lock_state(&self) -> MutexGuard<'_, LoopState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn lock_worker(&self) -> MutexGuard<'_, Worker> {
        self.worker.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn set_state(&self, state: LoopState) -> LoopState {
        std::mem::replace(&mut *self.lock_state(), state)
    }

    /// Run the initialize hook, starting the loop if it asks to
    pub fn initialize(self: &Arc<Self>) -> Result<()> {
        {
            let mut state = self.lock_state();
            if *state != LoopState::Constructed {
                return Ok(());
            }
            *state = LoopState::Initialized;
        }

        match self.hook.on_initialize(self)? {
            Startup::Immediate => self.start(),
            Startup::Deferred => Ok(()),
        }
    }

    /// Spawn the loop thread. Starting a running loop does nothing.
    pub fn start(self: &Arc<Self>) -> Result<()> {
        let mut worker = self.lock_worker();
        match self.state() {
            LoopState::Stopped => {
                return Err(TickError::InvalidState(format!("{} has already been stopped", self.name)));
            }
            LoopState::Running => return Ok(()),
            LoopState::Constructed | LoopState::Initialized => {}
        }

        self.hook.on_start(self)?;
        self.running.store(true, Ordering::SeqCst);

        let this = Arc::clone(self);
        let (done_tx, done_rx) = crossbeam_channel::bounded::<()>(0);
        let builder = thread::Builder::new().name(self.name.clone());
        let spawned = match self.hook.pacing() {
            Pacing::Triggered => {
                let (tx, rx) = crossbeam_channel::bounded(1);
                worker.trigger = Some(tx);
                builder.spawn(move || {
                    let _done = done_tx;
                    this.run_triggered(rx)
                })
            }
            Pacing::SelfPaced => builder.spawn(move || {
                let _done = done_tx;
                this.run_self_paced()
            }),
        };

        match spawned {
            Ok(handle) => {
                worker.handle = Some(handle);
                worker.done = Some(done_rx);
            }
            Err(e) => {
                self.running.store(false, Ordering::SeqCst);
                worker.trigger = None;
                return Err(e.into());
            }
        }

        self.set_state(LoopState::Running);
        self.log.debug(&format!("{} started, resting {}ms between ticks.", self.name, self.rest.as_millis()));
        Ok(())
    }

    /// Ask the loop thread to run one tick without waiting for it.
    ///
    /// Triggers coalesce while a tick is already pending. Returns `false` if
    /// the loop has no thread to run it.
    pub fn trigger(&self) -> bool {
        let worker = self.lock_worker();
        match &worker.trigger {
            Some(tx) => match tx.try_send(()) {
                Ok(()) | Err(TrySendError::Full(())) => true,
                Err(TrySendError::Disconnected(())) => false,
            },
            None => false,
        }
    }

    /// Run one unit of work on the calling thread.
    ///
    /// Errors and panics from the hook are logged and swallowed; returns
    /// whether the tick succeeded.
    pub fn tick(&self) -> bool {
        let n = self.ticks.fetch_add(1, Ordering::SeqCst) + 1;
        match panic::catch_unwind(AssertUnwindSafe(|| self.hook.on_tick(self))) {
            Ok(Ok(())) => true,
            Ok(Err(e)) => {
                self.log.error(&format!("Tick {} failed: {}", n, e));
                false
            }
            Err(payload) => {
                self.log
                    .error(&format!("Tick {} panicked: {}", n, panic_message(payload.as_ref())));
                false
            }
        }
    }

    /// Stop the loop and join its thread, waiting at most [`SHUTDOWN_DEADLINE`]
    pub fn stop(&self) {
        let (handle, trigger, done) = {
            let mut worker = self.lock_worker();
            (worker.handle.take(), worker.trigger.take(), worker.done.take())
        };
        let previous = self.set_state(LoopState::Stopped);
        if previous == LoopState::Stopped && handle.is_none() {
            return;
        }

        self.hook.on_stop(self);
        self.running.store(false, Ordering::SeqCst);
        self.cancel.cancel();
        // Closing the trigger channel wakes a waiting worker
        drop(trigger);

        if let (Some(handle), Some(done)) = (handle, done) {
            self.join_bounded(handle, done);
        }
        self.log.info(&format!("{} has been stopped.", self.name));
    }

    fn join_bounded(&self, handle: JoinHandle<()>, done: Receiver<()>) {
        if handle.thread().id() == thread::current().id() {
            return;
        }
        if let Err(RecvTimeoutError::Timeout) = done.recv_timeout(SHUTDOWN_DEADLINE) {
            self.log.warning(&format!(
                "{} did not stop within {}ms, detaching its thread.",
                self.name,
                SHUTDOWN_DEADLINE.as_millis()
            ));
            return;
        }
        if handle.join().is_err() {
            self.log.error(&format!("{} thread panicked.", self.name));
        }
    }

    fn run_triggered(self: Arc<Self>, rx: Receiver<()>) {
        while rx.recv().is_ok() {
            if self.cancel.is_cancelled() || !self.is_running() {
                break;
            }
            self.tick();
        }
        log::debug!("{} worker thread exiting", self.name);
    }

    fn run_self_paced(self: Arc<Self>) {
        let mut faults = 0;
        while self.is_running() && !self.cancel.is_cancelled() {
            if self.tick() {
                faults = 0;
            } else {
                faults += 1;
                if faults >= MAX_CONSECUTIVE_FAULTS {
                    self.log.error(&format!(
                        "{} failed {} cycles in a row and is shutting down. Nothing will be ticked until restart.",
                        self.name, faults
                    ));
                    self.running.store(false, Ordering::SeqCst);
                    self.set_state(LoopState::Stopped);
                    break;
                }
            }
            if self.rest() {
                break;
            }
        }
        log::debug!("{} cycle exiting", self.name);
    }
}

impl fmt::Debug for TickLoop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TickLoop")
            .field("name", &self.name)
            .field("effective_rate", &self.effective_rate)
            .field("state", &self.state())
            .field("ticks", &self.tick_count())
            .finish()
    }
}
