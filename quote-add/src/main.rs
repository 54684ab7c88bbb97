//! quote-add - Add a quote to the collection

use std::io::IsTerminal;

use clap::Parser;
use libquotebox::logging::LoggingConfig;
use libquotebox::{QuoteService, QuoteboxError, Result};
use tokio::io::AsyncReadExt;

#[derive(Parser, Debug)]
#[command(name = "quote-add")]
#[command(version, about = "Add a quote to the collection")]
#[command(long_about = r#"Add a quote to the collection.

Both the quote and the category are trimmed; neither may be empty. The quote
is appended even if an identical one already exists.

EXAMPLES:
    quote-add "Stay hungry, stay foolish." --category Life

    # Quote text from stdin
    echo "Stay hungry, stay foolish." | quote-add -c Life

    # Print the stored quote as JSON
    quote-add "Stay hungry." -c Life --format json

EXIT CODES:
    0 - Quote added
    1 - Error (database or configuration problem)
    3 - Invalid input (empty quote or category)
"#)]
struct Cli {
    /// Quote text (reads from stdin if not provided)
    text: Option<String>,

    /// Category for the quote
    #[arg(short, long, default_value = "")]
    category: String,

    /// Output format
    #[arg(short, long, default_value = "text", value_name = "FORMAT")]
    #[arg(value_parser = ["text", "json"])]
    format: String,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    LoggingConfig::from_env(cli.verbose).init();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", e);
        std::process::exit(e.exit_code());
    }
}

async fn run(cli: Cli) -> Result<()> {
    let text = match cli.text {
        Some(text) => text,
        None => read_stdin().await?,
    };

    let service = QuoteService::new().await?;
    let quote = service.add_quote(&text, &cli.category).await?;

    if cli.format == "json" {
        let json = serde_json::to_string_pretty(&quote)
            .map_err(libquotebox::error::ExportError::Serialize)?;
        println!("{}", json);
    } else {
        println!("Quote added.");
    }

    Ok(())
}

async fn read_stdin() -> Result<String> {
    if std::io::stdin().is_terminal() {
        return Err(QuoteboxError::InvalidInput(
            "No quote given. Pass it as an argument or pipe it on stdin.".to_string(),
        ));
    }

    let mut text = String::new();
    tokio::io::stdin()
        .read_to_string(&mut text)
        .await
        .map_err(|e| QuoteboxError::InvalidInput(format!("Failed to read stdin: {}", e)))?;
    Ok(text)
}
