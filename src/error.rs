//! Error types for tickloop
//!
//! Centralized error handling using thiserror.

use std::any::Any;

use thiserror::Error;

/// All error types that can occur in the scheduler core
#[derive(Debug, Error)]
pub enum TickError {
    /// A loop with this name is already registered
    #[error("Loop already registered: {0}")]
    LoopExists(String),

    /// Two commands claim the same name or alias
    #[error("Command conflict: '{0}' is declared by more than one command")]
    CommandConflict(String),

    /// Bad input handed to a command
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// Invalid configuration value
    #[error("Config error: {0}")]
    Config(String),

    /// Invalid state transition or operation
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for tickloop operations
pub type Result<T> = std::result::Result<T, TickError>;

/// Best-effort text of a caught panic payload
pub fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
