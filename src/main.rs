//! CLI entry point for filesearch.

use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use filesearch_core::{Reporter, run};
use tracing::{debug, info};

mod cli;

use cli::Args;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = Args::parse();

    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    // Logs go to stderr; stdout carries the report.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    debug!(?args, "CLI arguments parsed");

    let config = args.to_run_config();
    let summary = run(&config, Arc::new(Reporter::stdout())).await?;

    info!(
        links = summary.links_found,
        succeeded = summary.report.succeeded(),
        failed = summary.report.failed(),
        "run complete"
    );

    Ok(())
}
