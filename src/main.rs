//! Hostcrawl main entry point
//!
//! The host launches this binary with the path of its run configuration and
//! reads the batch files the worker leaves in the output folder.

use anyhow::Context;
use clap::Parser;
use hostcrawl::config::load_config_with_hash;
use hostcrawl::exchange::ExchangeChannel;
use hostcrawl::logging::{build_log_sink, console_filter};
use hostcrawl::sources::Source;
use hostcrawl::HostConfig;
use std::path::PathBuf;
use tracing::instrument::WithSubscriber;

/// Hostcrawl: crawl workers for a host analytics platform
///
/// Harvests one source and delivers the extracted documents as batch files
/// in the configured output folder. Creating a file named STOP in that
/// folder asks the worker to finish early.
#[derive(Parser, Debug)]
#[command(name = "hostcrawl")]
#[command(version)]
#[command(about = "Crawl worker for a host analytics platform", long_about = None)]
struct Cli {
    /// Path to the JSON run configuration written by the host
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Source to harvest
    #[arg(value_enum, value_name = "SOURCE")]
    source: Source,

    /// Increase stderr logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only print errors to stderr
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let (config, config_hash) = load_config_with_hash(&cli.config)
        .with_context(|| format!("Failed to load configuration {}", cli.config.display()))?;

    let (log_sink, log_path) = build_log_sink(
        &config.log_folder,
        cli.source.name(),
        config.debug_mode,
        Some(console_filter(cli.verbose, cli.quiet)),
    )
    .with_context(|| format!("Failed to open log in {}", config.log_folder.display()))?;

    run(cli.source, config, config_hash, log_path)
        .with_subscriber(log_sink)
        .await
}

/// Runs one source against the host exchange, logging into the run's sink
async fn run(
    source: Source,
    config: HostConfig,
    config_hash: String,
    log_path: PathBuf,
) -> anyhow::Result<()> {
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);
    tracing::debug!("Logging to {}", log_path.display());

    let mut channel = ExchangeChannel::from_config(&config);
    let result = source.run(&config, &mut channel).await;
    let batches = channel.close();

    match result {
        Ok(rows) => {
            tracing::info!(
                "{} source finished: {} rows in {} batches",
                source.name(),
                rows,
                batches
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("An unhandled error occurred in worker: {}", e);
            Err(e.into())
        }
    }
}
