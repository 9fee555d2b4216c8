//! Doc-Harvester main entry point
//!
//! This is the command-line interface for the Doc-Harvester documentation
//! harvester.

use anyhow::Context;
use clap::Parser;
use doc_harvester::config::{load_config_with_hash, validate, Config};
use doc_harvester::crawler;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Doc-Harvester: a narrow documentation harvester
///
/// Fetches a documentation page, follows the links that sit beside or above
/// it in the site hierarchy, and saves the cleaned text of every page into a
/// single JSON document.
#[derive(Parser, Debug)]
#[command(name = "doc-harvester")]
#[command(version = "1.0.0")]
#[command(about = "A narrow documentation harvester", long_about = None)]
struct Cli {
    /// Page to start harvesting from
    #[arg(value_name = "URL")]
    url: String,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Only list the in-scope links of the page, without downloading
    #[arg(long)]
    explore_only: bool,

    /// Output document path (overrides output.document-path)
    #[arg(short, long, value_name = "PATH")]
    output: Option<String>,

    /// Link depth ceiling, 0 for unlimited (overrides harvest.max-depth)
    #[arg(long, value_name = "N", allow_negative_numbers = true)]
    max_depth: Option<i32>,

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

    let config = match resolve_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {:#}", e);
            return Err(e);
        }
    };

    if cli.explore_only {
        handle_explore(&config, &cli.url).await
    } else {
        handle_download(&config, &cli.url).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("doc_harvester=info,warn"),
            1 => EnvFilter::new("doc_harvester=debug,info"),
            2 => EnvFilter::new("doc_harvester=trace,debug"),
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

/// Loads the config file if one was given and applies command-line overrides
fn resolve_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("reading {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(output) = &cli.output {
        config.output.document_path = output.clone();
    }
    if let Some(max_depth) = cli.max_depth {
        config.harvest.max_depth = max_depth;
    }

    validate(&config).context("invalid command-line override")?;
    Ok(config)
}

/// Handles --explore-only: prints each accepted link as an anchor tag
async fn handle_explore(config: &Config, url: &str) -> anyhow::Result<()> {
    let report = crawler::explore(config, url)
        .await
        .with_context(|| format!("exploring {}", url))?;

    if !report.root_title.is_empty() {
        println!("# {}", report.root_title);
    }
    for link in &report.accepted {
        println!("<a href=\"{}\">", link);
    }

    Ok(())
}

/// Handles the default mode: harvests the page and its in-scope links
async fn handle_download(config: &Config, url: &str) -> anyhow::Result<()> {
    let report = crawler::download(config, url)
        .await
        .with_context(|| format!("harvesting {}", url))?;

    for link in &report.accepted {
        println!("<a href=\"{}\">", link);
    }
    for (link, reason) in &report.failed {
        eprintln!("skipped {}: {}", link, reason);
    }
    println!(
        "Saved {} pages to {}",
        report.harvested.len(),
        config.output.document_path
    );

    Ok(())
}
