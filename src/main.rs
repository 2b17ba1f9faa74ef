use clap::Parser;
use colored::*;
use eyre::{Context, Result};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

mod cli;

use cli::{Cli, Commands};
use tickloop::config::{DEFAULT_CONFIG_PATH, Settings};
use tickloop::display::{self, NullDisplay, console::ConsoleRunner};
use tickloop::logging::MasterLog;
use tickloop::runtime::Runtime;
use tickloop::scheduler::{DEFAULT_TPS, validate_tps};
use tickloop::tui::{self, TuiRunner};

fn setup_logging(verbose: bool) -> Result<()> {
    // Create log directory
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tickloop")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let log_file = log_dir.join("tickloop.log");

    // Setup env_logger with file output
    let target = Box::new(
        fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&log_file)
            .context("Failed to open log file")?,
    );

    let mut builder = env_logger::Builder::from_default_env();
    if verbose {
        builder.filter_level(log::LevelFilter::Debug);
    }
    builder.target(env_logger::Target::Pipe(target)).init();

    info!("Logging initialized, writing to: {}", log_file.display());
    Ok(())
}

async fn run_application(cli: &Cli) -> Result<()> {
    info!("Starting application");

    if cli.is_verbose() {
        println!("{}", "Verbose mode enabled".yellow());
    }

    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH));

    match &cli.command {
        Some(Commands::CheckConfig) => check_config(&config_path),
        None | Some(Commands::Run) if cli.headless => {
            tokio::task::spawn_blocking(move || run_headless(&config_path)).await?
        }
        None | Some(Commands::Run) => run_tui(&config_path).await,
    }
}

async fn run_tui(config_path: &Path) -> Result<()> {
    info!("Launching TUI mode");
    let (handle, pump) = display::channel();
    let runtime = Runtime::boot(config_path, Arc::new(handle)).context("Failed to start runtime")?;
    runtime.log().info("Program started.");
    runtime.initialize_all().context("Failed to initialize loops")?;

    let terminal = tui::init_terminal().context("Failed to initialize terminal")?;
    let mut runner = TuiRunner::new(terminal, pump, runtime.queue().clone(), runtime.loops().clone());
    let result = runner.run().await;
    tui::restore_terminal().context("Failed to restore terminal")?;

    // Stopping joins loop threads; keep that off the async workers
    tokio::task::spawn_blocking(move || runtime.shutdown_all()).await?;
    result
}

fn run_headless(config_path: &Path) -> Result<()> {
    info!("Launching headless console");
    let (handle, pump) = display::channel();
    let runtime = Runtime::boot(config_path, Arc::new(handle)).context("Failed to start runtime")?;
    runtime.log().info("Program started.");
    runtime.initialize_all().context("Failed to initialize loops")?;

    let mut console = ConsoleRunner::new(pump, runtime.queue().clone());
    let result = console.run().context("Console failed");
    runtime.shutdown_all();
    console.finish()?;
    result
}

fn check_config(config_path: &Path) -> Result<()> {
    let logs = MasterLog::new(Arc::new(NullDisplay));
    let log = logs.logger("Config");
    let existed = config_path.exists();
    let settings = Settings::load(config_path, &log)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    if !existed {
        println!("{} {}", "Created default config:".green(), config_path.display());
    } else {
        println!("{} {}", "Config:".green(), config_path.display());
    }
    println!("{}", serde_json::to_string_pretty(&settings)?);

    if validate_tps(settings.tps).is_none() {
        println!(
            "{}",
            format!("TPS {} is out of range; loops will run at {}.", settings.tps, DEFAULT_TPS).yellow()
        );
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging first
    setup_logging(cli.is_verbose()).context("Failed to setup logging")?;

    info!("Starting with config from: {:?}", cli.config);

    // Run the main application logic
    run_application(&cli).await.context("Application failed")?;

    Ok(())
}
