//! sls-ingest - play-status notification normalizer
//!
//! Reads newline-delimited JSON notifications from a file or stdin, writes
//! every accepted canonical event as a JSON line to stdout and logs rejected
//! notifications to stderr.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use sls_common::config::load_config;
use sls_ingest::notification::{process_stream, JsonLinesSink};
use sls_ingest::{build_ingestor, SLS_API_ACTION};
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Command-line arguments for sls-ingest
#[derive(Parser, Debug)]
#[command(name = "sls-ingest")]
#[command(about = "Normalize media-player play-status notifications into scrobble events")]
#[command(version)]
struct Args {
    /// TOML config file (falls back to $SLS_CONFIG, then the per-user config)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Notification file (newline-delimited JSON); stdin when omitted
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Action assumed for notifications that do not name one
    #[arg(short, long, default_value = SLS_API_ACTION)]
    action: String,

    /// Log filter, overrides the config file (RUST_LOG still wins)
    #[arg(long, env = "SLS_LOG_LEVEL")]
    log_level: Option<String>,
}

fn main() -> Result<()> {
    let args = Args::parse();

    let (config, source) =
        load_config(args.config.as_deref()).context("Failed to load configuration")?;

    // Logs go to stderr; stdout carries only events
    let level = args.log_level.as_deref().unwrap_or(&config.logging.level);
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(io::stderr)
        .init();

    info!(
        "Starting sls-ingest v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );
    match source.path() {
        Some(path) => info!("Config file: {}", path.display()),
        None => info!("Config file: none (compiled defaults)"),
    }

    let ingestor = build_ingestor(&config);
    info!(
        "Accepting actions: {}",
        ingestor.actions().collect::<Vec<_>>().join(", ")
    );

    let input: Box<dyn BufRead> = match &args.input {
        Some(path) => Box::new(BufReader::new(
            File::open(path).with_context(|| format!("Failed to open {}", path.display()))?,
        )),
        None => Box::new(io::stdin().lock()),
    };

    let sink = JsonLinesSink::new(BufWriter::new(io::stdout()));
    let summary = process_stream(&ingestor, input, &args.action, &sink)?;
    sink.finish().context("Failed to write events")?;

    info!(
        accepted = summary.accepted,
        rejected = summary.rejected,
        malformed = summary.malformed,
        "Done"
    );

    Ok(())
}
