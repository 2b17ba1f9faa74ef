//! Text command parsing and dispatch
//!
//! A raw line like `settings font 14` is split into a command token
//! (`settings`) and an argument string (`font 14`). The [`CommandHandler`]
//! resolves the token case-insensitively, by name or alias, and runs the
//! [`Command`] inside a failure boundary: errors and panics are logged and
//! reported as `false`, never propagated.

pub mod builtin;
pub mod handler;
pub mod queue;

pub use handler::{CommandHandler, split_command_line};
pub use queue::CommandQueue;

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use crate::display::Display;
use crate::error::{Result, panic_message};
use crate::logging::Log;
use crate::scheduler::LoopRegistry;

/// Split an argument string into tokens.
///
/// Empty tokens are dropped, so `""` yields an empty slice and `"a  b"`
/// yields `["a", "b"]`.
pub fn tokenize(args: &str) -> Vec<&str> {
    args.split(' ').filter(|t| !t.is_empty()).collect()
}

/// Name, aliases and summary of a registered command
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInfo {
    pub name: String,
    pub aliases: Vec<String>,
    pub summary: String,
}

/// What a command may touch while it runs
pub struct CommandContext<'a> {
    /// The dispatcher's logger
    pub log: &'a Log,
    pub display: &'a dyn Display,
    /// Loop registry, if the runtime is still alive
    pub loops: Option<Arc<LoopRegistry>>,
    /// Every registered command
    pub catalog: &'a [CommandInfo],
}

/// A named, alias-addressable handler for one text instruction
pub trait Command: Send + Sync {
    fn name(&self) -> &str;

    fn aliases(&self) -> &[&str] {
        &[]
    }

    /// One-line description for `help`
    fn summary(&self) -> &str {
        ""
    }

    /// Run the command. May fail on malformed input.
    fn process(&self, args: &[&str], ctx: &CommandContext<'_>) -> Result<bool>;

    /// Tokenize `args` and run [`Command::process`], containing any failure
    fn execute(&self, args: &str, ctx: &CommandContext<'_>) -> bool {
        let tokens = tokenize(args);
        match panic::catch_unwind(AssertUnwindSafe(|| self.process(&tokens, ctx))) {
            Ok(Ok(success)) => success,
            Ok(Err(e)) => {
                ctx.log
                    .error(&format!("Error when executing the command '{}': {}", self.name(), e));
                false
            }
            Err(payload) => {
                ctx.log.error(&format!(
                    "Error when executing the command '{}': {}",
                    self.name(),
                    panic_message(payload.as_ref())
                ));
                false
            }
        }
    }
}
