//! CommandHandler - name/alias lookup and dispatch

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use super::{Command, CommandContext, CommandInfo};
use crate::display::Display;
use crate::error::{Result, TickError};
use crate::logging::Log;
use crate::scheduler::LoopRegistry;

/// Split a raw line at the first space into `(command, args)`
pub fn split_command_line(line: &str) -> (&str, &str) {
    line.split_once(' ').unwrap_or((line, ""))
}

/// Immutable map from lower-cased names and aliases to commands
pub struct CommandHandler {
    commands: HashMap<String, Arc<dyn Command>>,
    catalog: Vec<CommandInfo>,
    log: Arc<Log>,
    display: Arc<dyn Display>,
    loops: Weak<LoopRegistry>,
}

impl CommandHandler {
    /// Build the lookup table.
    ///
    /// Fails with [`TickError::CommandConflict`] if any name or alias is
    /// claimed twice (ignoring case).
    pub fn new(
        commands: Vec<Box<dyn Command>>,
        log: Arc<Log>,
        display: Arc<dyn Display>,
        loops: Weak<LoopRegistry>,
    ) -> Result<Self> {
        let mut map: HashMap<String, Arc<dyn Command>> = HashMap::new();
        let mut catalog = Vec::with_capacity(commands.len());

        for command in commands {
            let command: Arc<dyn Command> = Arc::from(command);
            let keys = std::iter::once(command.name()).chain(command.aliases().iter().copied());
            for key in keys {
                let key = key.to_lowercase();
                if map.contains_key(&key) {
                    return Err(TickError::CommandConflict(key));
                }
                map.insert(key, command.clone());
            }
            catalog.push(CommandInfo {
                name: command.name().to_string(),
                aliases: command.aliases().iter().map(|a| a.to_string()).collect(),
                summary: command.summary().to_string(),
            });
        }

        log::debug!("Registered {} commands under {} keys", catalog.len(), map.len());
        Ok(Self {
            commands: map,
            catalog,
            log,
            display,
            loops,
        })
    }

    /// Look a command up by name or alias, ignoring case
    pub fn resolve(&self, name: &str) -> Option<Arc<dyn Command>> {
        self.commands.get(&name.to_lowercase()).cloned()
    }

    pub fn catalog(&self) -> &[CommandInfo] {
        &self.catalog
    }

    /// Parse and run one raw line; returns whether the command succeeded
    pub fn process_command(&self, line: &str) -> bool {
        let line = line.trim_end_matches(['\r', '\n']);
        let (name, args) = split_command_line(line);

        let Some(command) = self.resolve(name) else {
            self.log.warning(&format!("Undefined command '{}'!", name));
            return false;
        };

        let ctx = CommandContext {
            log: &self.log,
            display: self.display.as_ref(),
            loops: self.loops.upgrade(),
            catalog: &self.catalog,
        };
        command.execute(args, &ctx)
    }
}
