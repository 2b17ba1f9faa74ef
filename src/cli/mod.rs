//! CLI module for tickloop - command-line interface and subcommands.

pub mod commands;

pub use commands::{Cli, Commands};
