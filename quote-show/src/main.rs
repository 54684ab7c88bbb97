//! quote-show - Print a random quote

use clap::Parser;
use libquotebox::logging::LoggingConfig;
use libquotebox::service::selection::{Pick, Selection};
use libquotebox::{CategoryFilter, QuoteService, Result};

mod shell;

#[derive(Parser, Debug)]
#[command(name = "quote-show")]
#[command(version, about = "Print a random quote")]
#[command(long_about = r#"Print a random quote, optionally from a single category.

The chosen category is remembered, so a later `quote-show --restore` picks
from the same category again.

EXAMPLES:
    # Any quote
    quote-show

    # Only quotes in the "Life" category
    quote-show --category Life

    # Same category as last time
    quote-show --restore

    # List the category options
    quote-show --categories

    # JSON output for scripting
    quote-show --format json | jq -r '.quote.text'

    # Interactive session with periodic sync
    quote-show --interactive

EXIT CODES:
    0 - Success (including "No quotes in this category.")
    1 - Error (database or configuration problem)
"#)]
struct Cli {
    /// Category to pick from ("all" for every category)
    #[arg(short, long, value_name = "CATEGORY", conflicts_with = "restore")]
    category: Option<String>,

    /// Pick from the category used last time
    #[arg(long)]
    restore: bool,

    /// List the category options instead of picking a quote
    #[arg(long, conflicts_with_all = ["category", "restore", "interactive"])]
    categories: bool,

    /// Read commands from stdin until `quit`
    #[arg(short, long)]
    interactive: bool,

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
    let service = QuoteService::new().await?;

    if cli.interactive {
        return shell::run(&service).await;
    }

    if cli.categories {
        let categories = service.categories().await;
        if cli.format == "json" {
            println!("{}", serde_json::to_string_pretty(&categories).map_err(json_error)?);
        } else {
            for category in categories {
                println!("{}", category);
            }
        }
        return Ok(());
    }

    let selection = if cli.restore {
        service.restore_last_filter().await
    } else {
        let filter = CategoryFilter::from(cli.category.as_deref());
        service.show_random(&filter).await
    };

    if cli.format == "json" {
        println!("{}", selection_json(&selection));
    } else {
        println!("{}", selection.pick);
    }

    Ok(())
}

fn selection_json(selection: &Selection) -> serde_json::Value {
    match &selection.pick {
        Pick::Quote(quote) => serde_json::json!({
            "filter": selection.filter.as_str(),
            "quote": quote,
        }),
        Pick::NoQuote => serde_json::json!({
            "filter": selection.filter.as_str(),
            "quote": null,
            "message": Pick::EMPTY_MESSAGE,
        }),
    }
}

fn json_error(e: serde_json::Error) -> libquotebox::QuoteboxError {
    libquotebox::error::ExportError::Serialize(e).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use libquotebox::Quote;

    #[test]
    fn test_selection_json_with_quote() {
        let selection = Selection {
            filter: CategoryFilter::from("Life"),
            pick: Pick::Quote(Quote::new("A", "Life")),
        };
        let value = selection_json(&selection);
        assert_eq!(value["filter"], "Life");
        assert_eq!(value["quote"]["text"], "A");
    }

    #[test]
    fn test_selection_json_without_quote() {
        let selection = Selection {
            filter: CategoryFilter::from("Nope"),
            pick: Pick::NoQuote,
        };
        let value = selection_json(&selection);
        assert!(value["quote"].is_null());
        assert_eq!(value["message"], "No quotes in this category.");
    }
}
