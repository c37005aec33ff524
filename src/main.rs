//! TOPLUS - staged text revision
//!
//! CLI entry point for the TOPLUS server.

#![forbid(unsafe_code)]

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod cli;

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "toplus=info,toplus_core=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = cli::Cli::parse();
    if cli.command.is_none() || matches!(cli.command, Some(cli::Commands::Serve)) {
        info!("Starting TOPLUS v{}", env!("CARGO_PKG_VERSION"));
    }

    cli::run(cli).await
}
