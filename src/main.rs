//! # Radiotrail
//!
//! Replays recorded locator snapshots through the telemetry engine and prints
//! the current entities and their trails.
//!
//! Usage: `radiotrail [CONFIG]` (default `config/default.toml`).

use anyhow::{Context, Result};
use std::path::Path;
use tokio::time::{interval, Duration};
use tracing::{debug, info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::fmt::writer::MakeWriterExt;
use tracing_subscriber::EnvFilter;

use radiotrail::config::{Config, LoggingConfig, OutputFormat};
use radiotrail::engine::{Engine, SharedEngine};
use radiotrail::report::FrameReport;
use radiotrail::source::{poll_once, DirectorySource, PollOutcome};

/// Configuration file used when no path is given
const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Rolling log file name prefix
const LOG_FILE_PREFIX: &str = "radiotrail.log";

/// Main entry point for the Radiotrail replay tool
///
/// # Control Flow
///
/// 1. **Initialization**
///    - Load configuration (defaults if the file is missing)
///    - Set up logging with tracing subscriber
///    - Open the frame directory
///
/// 2. **Main Loop**
///    - Every `poll_interval_ms`: ingest the next recorded frame
///    - Every `redraw_interval_ms`: print a frame report
///    - Handle Ctrl+C for graceful shutdown
///
/// 3. **Shutdown**
///    - When the replay is exhausted, print a final report and exit
///
/// # Errors
///
/// Returns error if:
/// - The configuration file exists but is invalid
/// - The frame directory cannot be read
#[tokio::main]
async fn main() -> Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let (config, config_found) = load_config(&config_path)?;

    let _log_guard = init_logging(&config.logging)?;

    info!("Radiotrail v{} starting...", env!("CARGO_PKG_VERSION"));
    if !config_found {
        warn!("Config file {} not found, using defaults", config_path);
    }

    let engine = SharedEngine::new(Engine::from_config(&config));
    let mut source = DirectorySource::open(&config.replay.dir, config.replay.loop_frames)
        .with_context(|| format!("Failed to open frame directory {}", config.replay.dir))?;

    let mut poll_interval = interval(Duration::from_millis(config.replay.poll_interval_ms));
    let mut redraw_interval = interval(Duration::from_millis(config.replay.redraw_interval_ms));

    info!(
        "Polling every {}ms, redrawing every {}ms, history depth {}",
        config.replay.poll_interval_ms,
        config.replay.redraw_interval_ms,
        config.history.depth
    );
    info!("Press Ctrl+C to exit");

    let mut ingested: u64 = 0;
    let mut rejected: u64 = 0;

    loop {
        tokio::select! {
            _ = poll_interval.tick() => {
                match engine.with(|e| poll_once(&mut source, e)).await {
                    Ok(PollOutcome::Ingested(entities)) => {
                        ingested += 1;
                        debug!("Frame {} ingested, {} entities visible", ingested, entities);
                    }
                    Ok(PollOutcome::Rejected(_)) => {
                        rejected += 1;
                    }
                    Ok(PollOutcome::Exhausted) => {
                        emit_report(&engine, &config).await?;
                        info!("Replay finished: {} frames ingested, {} rejected", ingested, rejected);
                        break;
                    }
                    Err(e) => {
                        warn!("Failed to read frame: {}", e);
                    }
                }
            }

            _ = redraw_interval.tick() => {
                emit_report(&engine, &config).await?;
            }

            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl+C, shutting down...");
                info!("Frames ingested: {}, rejected: {}", ingested, rejected);
                break;
            }
        }
    }

    Ok(())
}

/// Load the configuration file, falling back to defaults when it is missing
fn load_config(path: &str) -> Result<(Config, bool)> {
    if !Path::new(path).exists() {
        return Ok((Config::default(), false));
    }
    let config = Config::load(path).with_context(|| format!("Invalid config file {}", path))?;
    Ok((config, true))
}

/// Initialize logging to stderr, plus a daily rolling file when configured
fn init_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .context("Invalid log filter")?;

    if config.log_dir.is_empty() {
        tracing_subscriber::fmt().with_env_filter(filter).init();
        return Ok(None);
    }

    let appender = tracing_appender::rolling::daily(&config.log_dir, LOG_FILE_PREFIX);
    let (file_writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(std::io::stderr.and(file_writer))
        .init();
    Ok(Some(guard))
}

async fn emit_report(engine: &SharedEngine, config: &Config) -> Result<()> {
    let report = engine
        .with(|e| FrameReport::build(e, &config.output.trail_for))
        .await;

    match config.output.format {
        OutputFormat::Text => print!("{}", report.render_text()),
        OutputFormat::Json => println!("{}", report.to_json()?),
    }
    Ok(())
}
