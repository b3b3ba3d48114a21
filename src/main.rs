//! Quotegrab main entry point
//!
//! Command-line interface for the quote crawler.

use clap::Parser;
use quotegrab::config::load_config_with_hash;
use quotegrab::crawler::crawl;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Quotegrab: a Goodreads quote crawler
///
/// Crawls paginated quote listings for a tag, author, or search term,
/// deduplicates the extracted quotes, and writes them to a JSON Lines file
/// or SQLite database.
#[derive(Parser, Debug)]
#[command(name = "quotegrab")]
#[command(version)]
#[command(about = "A Goodreads quote crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, _config_hash) = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.dry_run {
        handle_dry_run(&config)?;
    } else {
        handle_crawl(config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("quotegrab=info,warn"),
            1 => EnvFilter::new("quotegrab=debug,info"),
            2 => EnvFilter::new("quotegrab=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows the seed URLs
fn handle_dry_run(config: &quotegrab::Config) -> Result<(), Box<dyn std::error::Error>> {
    println!("=== Quotegrab Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Results wanted: {}", config.crawler.results_wanted);
    println!("  Max pages: {}", config.crawler.max_pages);
    println!(
        "  Max concurrent pages: {}",
        config.crawler.max_concurrent_pages
    );
    println!("  User agent: {}", config.crawler.user_agent);

    println!("\nOutput:");
    println!("  Path: {}", config.output.path);
    println!("  Format: {:?}", config.output.format);

    if !config.proxy.urls.is_empty() {
        println!("\nProxy pool: {} URL(s)", config.proxy.urls.len());
    }

    let seeds = config.seed_urls()?;
    println!("\nSeed URLs ({}):", seeds.len());
    for seed in &seeds {
        println!("  - {}", seed);
    }

    println!("\n✓ Configuration is valid");

    Ok(())
}

/// Handles the main crawl operation
async fn handle_crawl(config: quotegrab::Config) -> Result<(), Box<dyn std::error::Error>> {
    match crawl(config).await {
        Ok(summary) => {
            tracing::info!(
                "Finished. Saved {} quotes across {} pages",
                summary.records_saved,
                summary.pages_processed
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e.into())
        }
    }
}
