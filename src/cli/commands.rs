//! CLI command definitions using clap.
//!
//! Defines the main CLI structure and subcommands:
//! - run: start the scheduler (the default)
//! - check-config: load or create the settings file and print it

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// tickloop - a fixed-rate tick scheduler with a text command console
#[derive(Parser, Debug)]
#[command(name = "tickloop")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Settings file path (defaults to ./config.json)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Read commands from stdin and print output instead of drawing a TUI
    #[arg(long, global = true)]
    pub headless: bool,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

impl Cli {
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Start the scheduler (same as no subcommand)
    Run,

    /// Load the settings file, creating it with defaults if missing, and print it
    CheckConfig,
}
