//! flatwatch CLI
//!
//! Local execution entry point.

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use flatwatch::{
    error::Result,
    models::{Config, ListingFilter},
    notify::LogNotifier,
    pipeline,
    services::{ListingCrawler, PageFetcher},
    storage::JsonStore,
};
use tokio_util::sync::CancellationToken;

/// flatwatch - ss.lv rental listing watcher
#[derive(Parser, Debug)]
#[command(name = "flatwatch", version, about = "Watches ss.lv rental listings")]
struct Cli {
    /// Path to the configuration file
    #[arg(short, long, default_value = "flatwatch.toml")]
    config: PathBuf,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl the site once and print matching listings by region
    Crawl {
        /// Filter expression, e.g. "100-400;1,2;30-60;centre,teika"
        #[arg(long)]
        filter: Option<String>,
    },

    /// Crawl, reconcile against the store and report new listings
    Sync {
        /// Path to the listing store file
        #[arg(long, default_value = "listings.json")]
        store: PathBuf,

        /// Filter expression applied before reconciliation
        #[arg(long)]
        filter: Option<String>,
    },

    /// Validate the configuration file
    Validate,
}

/// Initialize logging based on verbosity flag.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp_secs()
        .init();
}

fn parse_filter(expr: &Option<String>) -> Result<ListingFilter> {
    match expr {
        Some(expr) => ListingFilter::from_expression(expr),
        None => Ok(ListingFilter::default()),
    }
}

/// Cancellation token that trips on Ctrl-C.
fn cancel_on_ctrl_c() -> CancellationToken {
    let cancel = CancellationToken::new();
    let trigger = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            log::warn!("Interrupt received, cancelling");
            trigger.cancel();
        }
    });
    cancel
}

/// Main entry point for the CLI application.
#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    log::info!("flatwatch starting...");

    match run(cli).await {
        Err(error) if error.is_cancelled() => {
            log::warn!("Run cancelled, partial results discarded");
            Ok(())
        }
        other => other,
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::load_or_default(&cli.config);
    config.validate()?;

    match cli.command {
        Command::Crawl { filter } => {
            let filter = parse_filter(&filter)?;
            let fetcher = PageFetcher::new(&config.crawler)?;
            let crawler = ListingCrawler::new(&fetcher, config.crawler.clone());

            let registry = crawler.fetch_all(&filter, &cancel_on_ctrl_c()).await?;
            log::info!("Found {} listings", registry.len());

            for (region, listings) in registry.by_region() {
                println!("== {region} ({} listings)", listings.len());
                for listing in listings {
                    println!("{listing}");
                }
            }
        }

        Command::Sync { store, filter } => {
            let filter = parse_filter(&filter)?;
            let fetcher = PageFetcher::new(&config.crawler)?;
            let store = JsonStore::new(&store);

            let outcome = pipeline::run_sync(
                &fetcher,
                &store,
                &LogNotifier,
                &config.crawler,
                &filter,
                &cancel_on_ctrl_c(),
            )
            .await?;

            log::info!(
                "Sync finished: {} discovered, {} new, {} notification failures",
                outcome.discovered,
                outcome.new_listings,
                outcome.notify_failures
            );
        }

        Command::Validate => {
            log::info!("Configuration at {} is valid", cli.config.display());
        }
    }

    Ok(())
}
