//! Line-oriented interactive session
//!
//! Keeps one `QuoteService` alive so the last viewed quote and the periodic
//! sync behave as they would in a long-running front end. Status events are
//! printed to stderr as they arrive; quotes go to stdout.

use std::path::PathBuf;

use libquotebox::service::events::{Event, EventReceiver};
use libquotebox::service::selection::Selection;
use libquotebox::{CategoryFilter, QuoteService, Result};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast::error::RecvError;
use tracing::{debug, warn};

const HELP: &str = "\
Commands:
    next                 show another quote from the current category
    category <name>      switch category (\"all\" for every category)
    categories           list category options
    last                 show the last quote viewed this session
    add <text> | <cat>   add a quote
    import <file>        import quotes from a JSON file
    export [path]        export quotes (default: configured file name)
    sync                 sync with the server now
    help                 show this help
    quit                 leave";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Next,
    Category(CategoryFilter),
    Categories,
    Last,
    Add { text: String, category: String },
    Import(PathBuf),
    Export(Option<PathBuf>),
    Sync,
    Help,
    Quit,
    Unknown(String),
}

pub fn parse_command(line: &str) -> Command {
    let line = line.trim();
    let (word, rest) = match line.split_once(char::is_whitespace) {
        Some((word, rest)) => (word, rest.trim()),
        None => (line, ""),
    };

    match word {
        "" | "next" | "n" => Command::Next,
        "category" | "c" if !rest.is_empty() => Command::Category(CategoryFilter::from(rest)),
        "categories" => Command::Categories,
        "last" => Command::Last,
        "add" => {
            let (text, category) = rest.split_once('|').unwrap_or((rest, ""));
            Command::Add {
                text: text.to_string(),
                category: category.to_string(),
            }
        }
        "import" if !rest.is_empty() => Command::Import(PathBuf::from(rest)),
        "export" if rest.is_empty() => Command::Export(None),
        "export" => Command::Export(Some(PathBuf::from(rest))),
        "sync" => Command::Sync,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        _ => Command::Unknown(line.to_string()),
    }
}

pub async fn run(service: &QuoteService) -> Result<()> {
    let mut events = service.subscribe();
    let periodic = service.spawn_periodic_sync()?;

    let mut filter = print_selection(service.restore_last_filter().await);
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let line = match line {
                    Ok(Some(line)) => line,
                    Ok(None) => break,
                    Err(e) => {
                        warn!("Failed to read stdin: {}", e);
                        break;
                    }
                };

                match parse_command(&line) {
                    Command::Quit => break,
                    command => {
                        if let Some(next) = execute(service, &filter, command).await {
                            filter = next;
                        }
                    }
                }
            }
            event = events.recv() => {
                let merged = matches!(&event, Ok(Event::SyncCompleted { added }) if *added > 0);
                print_event(event);
                // Merged quotes may belong to the current category
                if merged {
                    print_selection(service.show_random(&filter).await);
                }
            }
        }
    }

    if let Some(handle) = periodic {
        handle.abort();
    }

    // Report anything emitted by the last command
    drain_events(&mut events);
    Ok(())
}

/// Run one command; returns the new filter when it changed
async fn execute(
    service: &QuoteService,
    filter: &CategoryFilter,
    command: Command,
) -> Option<CategoryFilter> {
    match command {
        Command::Next => {
            print_selection(service.show_random(filter).await);
        }
        Command::Category(next) => {
            return Some(print_selection(service.show_random(&next).await));
        }
        Command::Categories => {
            for category in service.categories().await {
                println!("{}", category);
            }
        }
        Command::Last => match service.last_viewed().await {
            Some(quote) => println!("{}", quote),
            None => println!("No quote viewed yet."),
        },
        Command::Add { text, category } => {
            // Failures are reported through the event stream
            match service.add_quote(&text, &category).await {
                Ok(_) => {
                    print_selection(service.show_random(filter).await);
                }
                Err(e) => debug!("Add rejected: {}", e),
            }
        }
        Command::Import(path) => {
            match service.import_file(&path).await {
                Ok(0) => {}
                Ok(_) => {
                    print_selection(service.show_random(filter).await);
                }
                Err(e) => debug!("Import of {} failed: {}", path.display(), e),
            }
        }
        Command::Export(path) => {
            let target = path
                .unwrap_or_else(|| PathBuf::from(service.library().export_file_name()));
            match service.export_to_file(&target).await {
                Ok(written) => eprintln!("[success] Exported to {}", written.display()),
                Err(e) => eprintln!("[error] {}", e),
            }
        }
        Command::Sync => {
            if let Err(e) = service.sync().await {
                debug!("Sync failed: {}", e);
            }
        }
        Command::Help => println!("{}", HELP),
        Command::Unknown(line) => eprintln!("Unknown command: {} (try \"help\")", line),
        Command::Quit => {}
    }
    None
}

fn print_selection(selection: Selection) -> CategoryFilter {
    println!("{}", selection.pick);
    selection.filter
}

fn print_event(event: std::result::Result<Event, RecvError>) {
    match event {
        Ok(event) => {
            if let Some(status) = event.status() {
                eprintln!("[{}] {}", status.severity, status.message);
            }
        }
        Err(RecvError::Lagged(skipped)) => debug!("Skipped {} status events", skipped),
        Err(RecvError::Closed) => {}
    }
}

fn drain_events(events: &mut EventReceiver) {
    while let Ok(event) = events.try_recv() {
        print_event(Ok(event));
    }
}
