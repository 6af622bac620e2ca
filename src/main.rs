//! Coach-Scraper main entry point
//!
//! This is the command-line interface for the coach-scraper pipeline.

use anyhow::Context;
use clap::Parser;
use coach_scraper::config::{parse_config, validate, Config};
use coach_scraper::crawler::run_scrape;
use coach_scraper::locale::WhatlangDetector;
use coach_scraper::storage::{open_storage, PersistenceGateway};
use coach_scraper::Site;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Coach-Scraper: harvests chess coach profiles into SQLite
///
/// Pages through the coach directories of the selected sites, caches every
/// downloaded document under the data directory and upserts one row per
/// coach. Re-running only fetches what is not cached yet.
#[derive(Parser, Debug)]
#[command(name = "coach-scraper")]
#[command(version = "1.0.0")]
#[command(about = "Harvests chess coach profiles into SQLite", long_about = None)]
struct Cli {
    /// Contact sent in the User-Agent header of every request
    #[arg(long, value_name = "UA", required_unless_present = "init_schema")]
    user_agent: Option<String>,

    /// Site to scrape (chesscom or lichess); repeat for several
    #[arg(long = "site", value_name = "SITE", required_unless_present = "init_schema")]
    sites: Vec<Site>,

    /// Path to the SQLite database
    #[arg(long, value_name = "PATH")]
    database: PathBuf,

    /// Extraction/persistence workers per site [default: 5]
    #[arg(long, value_name = "N")]
    workers: Option<usize>,

    /// Root of the document cache [default: data]
    #[arg(long, value_name = "DIR")]
    data_dir: Option<String>,

    /// Optional TOML file with scraper and per-site settings
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Create the database tables and exit
    #[arg(long)]
    init_schema: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    if cli.init_schema {
        return handle_init_schema(&cli);
    }

    let config = build_config(&cli)?;
    handle_scrape(config, &dedup_sites(&cli.sites)).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("coach_scraper=info,warn"),
            1 => EnvFilter::new("coach_scraper=debug,info"),
            2 => EnvFilter::new("coach_scraper=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the optional config file, then applies command-line overrides
fn build_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            parse_config(path)
                .with_context(|| format!("failed to load {}", path.display()))?
        }
        None => Config::default(),
    };

    if let Some(user_agent) = &cli.user_agent {
        config.user_agent.contact = user_agent.clone();
    }
    if let Some(workers) = cli.workers {
        config.scraper.workers = workers;
    }
    if let Some(data_dir) = &cli.data_dir {
        config.scraper.data_dir = data_dir.clone();
    }
    config.output.database_path = cli.database.display().to_string();

    validate(&config).context("invalid configuration")?;
    Ok(config)
}

/// Collapses repeated `--site` flags, keeping first-seen order
fn dedup_sites(sites: &[Site]) -> Vec<Site> {
    let mut unique = Vec::with_capacity(sites.len());
    for site in sites {
        if !unique.contains(site) {
            unique.push(*site);
        }
    }
    unique
}

/// Handles the --init-schema mode: creates the tables and exits
fn handle_init_schema(cli: &Cli) -> anyhow::Result<()> {
    let storage = open_storage(&cli.database)
        .with_context(|| format!("failed to open {}", cli.database.display()))?;
    storage.initialize_schema()?;
    tracing::info!("Schema initialized in {}", cli.database.display());
    Ok(())
}

/// Handles the main scrape operation
async fn handle_scrape(config: Config, sites: &[Site]) -> anyhow::Result<()> {
    let storage = open_storage(Path::new(&config.output.database_path))
        .with_context(|| format!("failed to open {}", config.output.database_path))?;
    let gateway = PersistenceGateway::new(storage);

    let names: Vec<&str> = sites.iter().map(Site::as_str).collect();
    tracing::info!(
        "Scraping {} into {} (cache: {})",
        names.join(", "),
        config.output.database_path,
        config.scraper.data_dir
    );

    match run_scrape(&config, sites, gateway, Arc::new(WhatlangDetector)).await {
        Ok(reports) => {
            tracing::info!("Scrape completed ({} sites)", reports.len());
            Ok(())
        }
        Err(e) => {
            tracing::error!("Scrape failed: {}", e);
            Err(e.into())
        }
    }
}
