use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use interfaces_index::app::{App, WidgetConfig};
use interfaces_index::services::FetchOrdering;

/// Search the Juju interfaces index from the terminal.
///
/// Each line read from stdin replaces the search field. `:clear` empties it,
/// `:show <kind> <id>` prints one entity and `:quit` exits.
#[derive(Debug, Parser)]
#[command(name = "interfaces-index", version)]
struct Args {
    /// Config file (JSON). Defaults to the user config directory.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Site root of the index API.
    #[arg(long)]
    base_url: Option<String>,

    /// Show "add new" links.
    #[arg(long)]
    logged_in: bool,

    /// Wait this long after the last edit before searching.
    #[arg(long)]
    debounce_ms: Option<u64>,

    /// Ignore responses older than the newest one shown.
    #[arg(long)]
    latest_only: bool,

    /// Print HTML markup instead of a text listing.
    #[arg(long)]
    html: bool,

    /// Debug logging.
    #[arg(short, long)]
    verbose: bool,
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("INTERFACES_INDEX_LOG")
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let mut config = WidgetConfig::load(args.config.as_deref())?;
    if let Some(base_url) = args.base_url {
        config.base_url = base_url;
    }
    if args.logged_in {
        config.logged_in = true;
    }
    if let Some(debounce_ms) = args.debounce_ms {
        config.debounce_ms = debounce_ms;
    }
    if args.latest_only {
        config.ordering = FetchOrdering::LatestRequest;
    }

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    App::new(config)
        .with_html(args.html)
        .run(stdin, tokio::io::stdout())
        .await
}
