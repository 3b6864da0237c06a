//! hdl-harvest main entry point
//!
//! This is the command-line interface for the two-stage HDL resource harvester.

use anyhow::Context;
use clap::{Parser, Subcommand};
use hdl_harvest::config::{load_config_with_hash, Config};
use hdl_harvest::crawler::run_crawl;
use hdl_harvest::harvest::run_harvest;
use hdl_harvest::output::{
    load_statistics, print_crawl_report, print_harvest_report, print_statistics,
};
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// hdl-harvest: a polite HDL resource harvester
///
/// `crawl` walks one site breadth-first and records links to resource files.
/// `harvest` fetches those resources, keeps the relevant ones and writes
/// them out as prompt/code dataset records.
#[derive(Parser, Debug)]
#[command(name = "hdl-harvest")]
#[command(version)]
#[command(about = "A polite HDL resource harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Crawl from the seed page and append resource links to the link store
    Crawl {
        /// Truncate the link store instead of continuing from it
        #[arg(long)]
        fresh: bool,
    },

    /// Fetch stored resource links, classify them and emit dataset records
    Harvest {
        /// Truncate the dataset store instead of skipping already emitted URLs
        #[arg(long)]
        fresh: bool,
    },

    /// Show statistics from the existing stores and exit
    Stats,

    /// Validate the configuration, print the effective settings and exit
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    match cli.command {
        Command::Crawl { fresh } => handle_crawl(&config, fresh).await,
        Command::Harvest { fresh } => handle_harvest(&config, fresh).await,
        Command::Stats => handle_stats(&config),
        Command::Check => {
            handle_check(&config, &config_hash);
            Ok(())
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("hdl_harvest=info,warn"),
            1 => EnvFilter::new("hdl_harvest=debug,info"),
            2 => EnvFilter::new("hdl_harvest=trace,debug"),
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

/// Installs a Ctrl-C handler that asks the running stage to stop
///
/// The first signal lets the current request finish and the summary print.
fn install_shutdown_handler() -> Arc<AtomicBool> {
    let flag = Arc::new(AtomicBool::new(false));
    let handler_flag = Arc::clone(&flag);

    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::warn!("Received Ctrl-C, stopping after the current request");
                handler_flag.store(true, Ordering::SeqCst);
            }
            Err(e) => tracing::error!("Failed to listen for Ctrl-C: {}", e),
        }
    });

    flag
}

/// Handles the `crawl` command
async fn handle_crawl(config: &Config, fresh: bool) -> anyhow::Result<()> {
    if fresh {
        tracing::info!("Starting fresh crawl (truncating {})", config.output.links_path);
    } else {
        tracing::info!(
            "Starting crawl (continuing from {} if present)",
            config.output.links_path
        );
    }

    let report = run_crawl(config, fresh, Some(install_shutdown_handler()))
        .await
        .context("Crawl failed")?;

    print_crawl_report(&report);
    Ok(())
}

/// Handles the `harvest` command
async fn handle_harvest(config: &Config, fresh: bool) -> anyhow::Result<()> {
    if fresh {
        tracing::info!(
            "Starting fresh harvest (truncating {})",
            config.output.dataset_path
        );
    } else {
        tracing::info!(
            "Starting harvest (skipping URLs already in {})",
            config.output.dataset_path
        );
    }

    let report = run_harvest(config, fresh, Some(install_shutdown_handler()))
        .await
        .context("Harvest failed")?;

    print_harvest_report(&report);
    Ok(())
}

/// Handles the `stats` command
fn handle_stats(config: &Config) -> anyhow::Result<()> {
    println!("Link store: {}", config.output.links_path);
    println!("Dataset store: {}\n", config.output.dataset_path);

    let stats = load_statistics(&config.output).context("Failed to read output stores")?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the `check` command: shows the effective configuration
fn handle_check(config: &Config, config_hash: &str) {
    println!("=== hdl-harvest Configuration ===\n");

    println!("Crawler:");
    println!("  Seed URL: {}", config.crawler.seed_url);
    println!("  Domain: {}", config.crawler.domain);
    println!("  Max depth: {}", config.crawler.max_depth);
    println!("  Request delay: {}ms", config.crawler.request_delay_ms);
    println!("  Request timeout: {}ms", config.crawler.request_timeout_ms);
    println!("  Resource extension: {}", config.crawler.resource_extension);
    println!(
        "  Page extensions: {}",
        config.crawler.page_extensions.join(", ")
    );

    println!("\nHarvest:");
    println!("  Request delay: {}ms", config.harvest.request_delay_ms);
    println!("  Request timeout: {}ms", config.harvest.request_timeout_ms);
    println!(
        "  Minimum content length: {}",
        config.harvest.min_content_length
    );
    println!(
        "  Exclude keywords ({}): {}",
        config.harvest.exclude_keywords.len(),
        config.harvest.exclude_keywords.join(", ")
    );
    println!(
        "  Include keywords ({}): {}",
        config.harvest.include_keywords.len(),
        config.harvest.include_keywords.join(", ")
    );
    println!("  Prompt template: {}", config.harvest.prompt_template);
    println!(
        "  Tags: source={}, category={}",
        config.harvest.source_tag, config.harvest.category_tag
    );

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  Link store: {}", config.output.links_path);
    println!("  Dataset store: {}", config.output.dataset_path);

    println!("\n✓ Configuration is valid (hash: {})", config_hash);
}
