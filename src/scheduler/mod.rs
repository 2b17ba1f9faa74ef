//! Tick scheduling
//!
//! - [`TickLoop`]: a fixed-rate unit of work with its own thread
//! - [`MasterLoop`]: the supervisor that paces every other loop
//! - [`GameLoop`]: the worker that drains the command queue
//! - [`LoopRegistry`]: ordered collection of loops owned by a runtime

pub mod cancel;
pub mod game;
pub mod master;
pub mod registry;
pub mod tick_loop;

pub use cancel::CancelToken;
pub use game::GameLoop;
pub use master::MasterLoop;
pub use registry::LoopRegistry;
pub use tick_loop::{
    DEFAULT_TPS, LoopHook, LoopState, MAX_CONSECUTIVE_FAULTS, MAX_TPS, MIN_TPS, Pacing, SHUTDOWN_DEADLINE, Startup,
    TickLoop, rest_interval, validate_tps,
};
