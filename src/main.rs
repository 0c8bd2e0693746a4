//! oncorisk - Main Entry Point
//!
//! Trains and serves the per-cancer-type risk classifiers from the command line.

use clap::Parser;
use oncorisk::cli::{run, Cli};

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "oncorisk=info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    run(Cli::parse())
}
