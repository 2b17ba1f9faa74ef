//! tickloop - a fixed-rate tick scheduler
//!
//! A supervisor loop paces a set of worker loops, each on its own thread. One
//! worker drains a queue of text commands and dispatches them by name; every
//! component logs through a queued pipeline that writes to a log file and to
//! whatever display the front end provides.

pub mod command;
pub mod config;
pub mod display;
pub mod error;
pub mod logging;
pub mod runtime;
pub mod scheduler;
pub mod tui;

pub use error::{Result, TickError};
pub use runtime::Runtime;
