//! Yoku main entry point
//!
//! Command-line wrapper around the crawl loop. Listings go to stdout, logs
//! and statistics to stderr.

use clap::Parser;
use std::io::Write;
use std::path::PathBuf;
use yoku::config::{load_config_with_hash, validate, Config};
use yoku::crawler::{Crawler, HttpFetcher};
use yoku::output::{format_statistics, write_listings, OutputFormat};
use yoku::query::{ParamValue, SearchParameters};
use tracing_subscriber::EnvFilter;

/// Yoku: a polite auction-search crawler
///
/// Pages through marketplace search results and prints one record per
/// listing, with posting, start, and end times decoded.
#[derive(Parser, Debug)]
#[command(name = "yoku")]
#[command(version)]
#[command(about = "A polite auction-search crawler", long_about = None)]
struct Cli {
    /// Search keywords (sent as `p`)
    #[arg(value_name = "QUERY")]
    query: Vec<String>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Extra search parameter, e.g. `--param aucmaxprice=5000` (repeatable)
    #[arg(long = "param", value_name = "KEY=VALUE", value_parser = parse_param)]
    params: Vec<(String, ParamValue)>,

    /// Auction status filter (`istatus`, repeatable)
    #[arg(long = "status", value_name = "STATUS")]
    statuses: Vec<i64>,

    /// Pause between page requests in milliseconds
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Stop after this many pages
    #[arg(long)]
    max_pages: Option<u32>,

    /// Output format for listings
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,

    /// Print crawl statistics to stderr when done
    #[arg(long)]
    stats: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match load_configuration(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e);
        }
    };

    let params = build_parameters(&cli);

    let fetcher = HttpFetcher::new(&config.user_agent, &config.crawler)?;
    let mut crawler = Crawler::new(&config, fetcher);

    let outcome = match crawler.crawl(&params).await {
        Ok(outcome) => outcome,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write_listings(&mut out, &outcome.listings, cli.format)?;
    out.flush()?;

    if cli.stats {
        eprint!("{}", format_statistics(&outcome.stats));
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("yoku=info,warn"),
            1 => EnvFilter::new("yoku=debug,info"),
            2 => EnvFilter::new("yoku=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Loads the config file if one was given, then applies command-line overrides
fn load_configuration(cli: &Cli) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(interval) = cli.interval_ms {
        config.crawler.request_interval = interval;
    }
    if cli.max_pages.is_some() {
        config.crawler.max_pages = cli.max_pages;
    }

    validate(&config)?;
    Ok(config)
}

/// Assembles search parameters: keywords first, then `--param`, then statuses
fn build_parameters(cli: &Cli) -> SearchParameters {
    let mut params = SearchParameters::new();

    if !cli.query.is_empty() {
        params.insert("p", cli.query.join(" "));
    }

    for (key, value) in &cli.params {
        params.insert(key.clone(), value.clone());
    }

    match cli.statuses.as_slice() {
        [] => {}
        [status] => {
            params.insert("istatus", *status);
        }
        statuses => {
            params.insert("istatus", statuses.to_vec());
        }
    }

    params
}

/// Parses `KEY=VALUE`
fn parse_param(raw: &str) -> Result<(String, ParamValue), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", raw))?;

    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty parameter name in '{}'", raw));
    }

    Ok((key.to_string(), ParamValue::parse_for(key, value)))
}
