mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use snip_config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = cli::Cli::parse();
    let config = Config::load()?;

    match cli.command {
        cli::Commands::Analyze { file, json } => commands::analyze::handle(file, json, &config).await,
        cli::Commands::Clean { file } => commands::clean::handle(file, &config).await,
        cli::Commands::Serve { host, port } => commands::serve::handle(host, port, config).await,
    }
}
