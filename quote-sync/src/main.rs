//! quote-sync - Merge quotes from the server
//!
//! Runs one sync, or keeps syncing on a fixed interval until interrupted.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use libquotebox::logging::LoggingConfig;
use libquotebox::service::events::{Event, EventReceiver};
use libquotebox::service::sync::SyncOutcome;
use libquotebox::{Config, QuoteService, QuoteboxError};
use tokio::sync::broadcast::error::TryRecvError;
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "quote-sync")]
#[command(version)]
#[command(about = "Merge quotes from the server")]
#[command(long_about = "\
quote-sync - Merge quotes from the server

DESCRIPTION:
    Fetches the server's quote collection and appends every quote that is
    not already stored. Local quotes are never changed or removed.

    Without --once, quote-sync keeps running and syncs on a fixed interval
    (10 seconds by default). A sync that is still waiting on the server when
    the next one is due is not started twice.

USAGE:
    # Sync once and exit
    quote-sync --once

    # Sync every 30 seconds
    quote-sync --interval 30s

    # Use a JSON file as the server
    quote-sync --once --source-file ~/server-quotes.json

SIGNALS:
    SIGTERM, SIGINT - Graceful shutdown

CONFIGURATION:
    [sync]
    enabled = true        # periodic sync on or off
    interval_secs = 10    # seconds between syncs
    delay_ms = 3000       # simulated server latency
    source_file = \"...\"   # optional JSON file to sync from

EXIT CODES:
    0 - Success (or clean shutdown)
    1 - Runtime or configuration error
    2 - Sync failed (server unreachable or invalid response)
")]
struct Cli {
    /// Sync once and exit
    #[arg(long)]
    once: bool,

    /// Time between syncs, e.g. "10s" or "2m" (overrides config)
    #[arg(long, value_name = "DURATION", value_parser = parse_interval)]
    interval: Option<Duration>,

    /// Read server quotes from this JSON file (overrides config)
    #[arg(long, value_name = "PATH")]
    source_file: Option<PathBuf>,

    /// Enable verbose logging to stderr
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    LoggingConfig::from_env(cli.verbose).init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        let code = e
            .downcast_ref::<QuoteboxError>()
            .map(QuoteboxError::exit_code)
            .unwrap_or(1);
        std::process::exit(code);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = Config::load_or_default().context("Failed to load configuration")?;
    if let Some(path) = &cli.source_file {
        config.sync.source_file = Some(path.to_string_lossy().to_string());
    }

    let service = QuoteService::from_config(config)
        .await
        .context("Failed to open quote store")?;
    let mut events = service.subscribe();

    if cli.once {
        let result = service.sync().await;
        print_statuses(&mut events);
        let outcome = result?;
        info!("quote-sync: synced once ({}), exiting", describe(outcome));
        return Ok(());
    }

    let shutdown = Arc::new(AtomicBool::new(false));
    setup_signal_handlers(shutdown.clone())?;

    let handle = match cli.interval {
        Some(interval) => service.sync_service().spawn_periodic(interval)?,
        None => service
            .spawn_periodic_sync()?
            .context("Periodic sync is disabled ([sync] enabled = false); use --once")?,
    };
    info!("quote-sync started");

    while !shutdown.load(Ordering::Relaxed) {
        print_statuses(&mut events);
        tokio::time::sleep(Duration::from_millis(200)).await;
    }

    handle.abort();
    print_statuses(&mut events);
    info!("quote-sync stopped");
    Ok(())
}

/// Print the status line of every event received so far
fn print_statuses(events: &mut EventReceiver) {
    loop {
        match events.try_recv() {
            Ok(event) => print_status(&event),
            Err(TryRecvError::Lagged(skipped)) => warn!("Missed {} status events", skipped),
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
        }
    }
}

fn print_status(event: &Event) {
    if let Some(status) = event.status() {
        println!("[{}] {}", status.severity, status.message);
    }
    if let Event::SyncFailed { error } = event {
        warn!("{}", error);
    }
}

#[cfg(unix)]
fn setup_signal_handlers(shutdown: Arc<AtomicBool>) -> Result<()> {
    use signal_hook::consts::{SIGINT, SIGTERM};
    use signal_hook::iterator::Signals;

    let mut signals = Signals::new([SIGINT, SIGTERM]).context("Signal setup failed")?;

    std::thread::spawn(move || {
        if signals.forever().next().is_some() {
            info!("Received shutdown signal, stopping gracefully...");
            shutdown.store(true, Ordering::Relaxed);
        }
    });

    Ok(())
}

#[cfg(not(unix))]
fn setup_signal_handlers(_shutdown: Arc<AtomicBool>) -> Result<()> {
    Ok(())
}

/// Parse a humantime duration, refusing zero
fn parse_interval(value: &str) -> std::result::Result<Duration, String> {
    let interval = humantime::parse_duration(value).map_err(|e| e.to_string())?;
    if interval.is_zero() {
        return Err("interval must be greater than zero".to_string());
    }
    Ok(interval)
}

fn describe(outcome: SyncOutcome) -> &'static str {
    match outcome {
        SyncOutcome::Merged(_) => "merged",
        SyncOutcome::UpToDate => "up to date",
        SyncOutcome::AlreadyRunning => "already running",
    }
}
