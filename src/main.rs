// ABOUTME: Entry point for chatline — a terminal chat client for a JSON /chat endpoint.
// ABOUTME: Parses CLI args, loads config, sets up logging, and launches the app or the endpoint check.

use std::path::PathBuf;

use anyhow::bail;
use clap::{Parser, Subcommand};

use chatline::app::App;
use chatline::config::{Config, ENDPOINT_ENV};
use chatline::exchange::HttpTransport;
use chatline::logging;

#[derive(Parser)]
#[command(name = "chatline", version)]
#[command(about = "Terminal chat client for a JSON /chat endpoint")]
struct Cli {
    /// Base URL of the chat server (overrides config and CHATLINE_ENDPOINT)
    #[arg(short, long, global = true)]
    endpoint: Option<String>,

    /// Path to a config file (default: ~/.chatline/config.toml)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Open the chat interface (default)
    Chat,
    /// Check that the server can reach its model backend
    Check,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load local .env if present.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    config.apply_endpoint_overrides(std::env::var(ENDPOINT_ENV).ok(), cli.endpoint);

    let log_path = logging::init(&config.logging)?;
    tracing::debug!(log = %log_path.display(), "logging initialized");

    match cli.command.unwrap_or(Command::Chat) {
        Command::Chat => App::new(config).run().await,
        Command::Check => check(&config).await,
    }
}

async fn check(config: &Config) -> anyhow::Result<()> {
    let transport = HttpTransport::new(&config.endpoint)?;
    match transport.check().await {
        Ok(report) => {
            println!("{}: {}", report.status, report.message);
            for model in &report.models {
                println!("  • {}", model);
            }
            Ok(())
        }
        Err(e) => {
            tracing::warn!(error = %e, "endpoint check failed");
            bail!("endpoint check failed for {}: {}", config.endpoint.base_url, e)
        }
    }
}
