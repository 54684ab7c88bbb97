//! quote-import - Import quotes from a JSON file

use std::path::PathBuf;

use clap::Parser;
use libquotebox::logging::LoggingConfig;
use libquotebox::service::events::Event;
use libquotebox::service::library::import_failure_message;
use libquotebox::{QuoteService, QuoteboxError, Result};
use tokio::io::AsyncReadExt;
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "quote-import")]
#[command(version, about = "Import quotes from a JSON file")]
#[command(long_about = r#"Import quotes from a JSON file.

The file must hold a JSON array of {"text": ..., "category": ...} objects,
such as one written by quote-export. Quotes already in the collection are
skipped, as are repeats within the file.

EXAMPLES:
    quote-import quotes.json

    # From stdin
    curl -s https://example.org/quotes.json | quote-import -

EXIT CODES:
    0 - Success (including "No new quotes to import.")
    1 - Error (database or configuration problem)
    3 - The file could not be read or is not a JSON array
"#)]
struct Cli {
    /// JSON file to import ("-" for stdin)
    file: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    LoggingConfig::from_env(cli.verbose).init();

    if let Err(e) = run(cli).await {
        match e {
            QuoteboxError::Import(_) => eprintln!("Error: {}", import_failure_message(&e)),
            _ => eprintln!("Error: {}", e),
        }
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli) -> Result<()> {
    let service = QuoteService::new().await?;
    let mut events = service.subscribe();

    let added = if cli.file.as_os_str() == "-" {
        let text = read_stdin().await?;
        service.import_json(&text).await?
    } else {
        service.import_file(&cli.file).await?
    };
    info!("Imported {} quotes from {}", added, cli.file.display());

    // Print the status line the service reported for this import
    while let Ok(event) = events.try_recv() {
        if let Event::QuotesImported { .. } = event {
            if let Some(status) = event.status() {
                println!("{}", status.message);
            }
        }
    }

    Ok(())
}

async fn read_stdin() -> Result<String> {
    let mut text = String::new();
    tokio::io::stdin()
        .read_to_string(&mut text)
        .await
        .map_err(|e| QuoteboxError::Import(e.into()))?;
    Ok(text)
}
