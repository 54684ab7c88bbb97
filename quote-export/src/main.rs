//! quote-export - Export quotes to a JSON file
//!
//! Writes the full collection as a pretty-printed JSON array that
//! quote-import (or any other tool) can read back.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use libquotebox::logging::LoggingConfig;
use libquotebox::QuoteService;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "quote-export")]
#[command(about = "Export quotes to a JSON file", long_about = None)]
struct Cli {
    /// Output file or directory ("-" for stdout; default: quotes.json in
    /// the current directory)
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    LoggingConfig::from_env(cli.verbose).init();

    let service = QuoteService::new()
        .await
        .context("Failed to open quote store")?;

    let result = match cli.output {
        Some(path) if path.as_os_str() == "-" => export_stdout(&service).await,
        Some(path) => export_file(&service, path).await,
        None => {
            let path = PathBuf::from(service.library().export_file_name());
            export_file(&service, path).await
        }
    };

    if let Err(e) = result {
        error!("Export failed: {:#}", e);
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
    Ok(())
}

async fn export_stdout(service: &QuoteService) -> Result<()> {
    let json = service.export_json().await.context("Failed to serialize quotes")?;
    println!("{}", json);
    Ok(())
}

async fn export_file(service: &QuoteService, target: PathBuf) -> Result<()> {
    let written = service
        .export_to_file(&target)
        .await
        .with_context(|| format!("Failed to export to {}", target.display()))?;

    info!("Export completed successfully");
    println!("{}", written.display());
    Ok(())
}
