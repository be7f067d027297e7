//! Agentrun CLI
//!
//! Command-line interface for starting and following agent runs.

mod commands;
mod config;
mod input;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use std::time::Duration;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "agentrun")]
#[command(about = "Start and follow long-running agent jobs", long_about = None)]
struct Cli {
    /// Agent runtime URL
    #[arg(long, env = "AGENT_BASE_URL", default_value = "http://localhost:8123")]
    base_url: String,

    /// Path prefix of the agent routes
    #[arg(long, env = "AGENT_PATH_PREFIX", default_value = "/api")]
    path_prefix: String,

    /// Timeout of each request, in milliseconds
    #[arg(long, env = "AGENT_TIMEOUT_MS", default_value_t = 30_000)]
    timeout_ms: u64,

    /// Delay between two status requests, in milliseconds
    #[arg(long, env = "AGENT_POLL_INTERVAL_MS", default_value_t = 10_000)]
    poll_interval_ms: u64,

    /// Endpoint storing run states, called with every state received
    #[arg(long, env = "AGENT_DB_URL")]
    save_url: Option<String>,

    /// Web app URL used to build share links
    #[arg(long, env = "AGENT_SITE_URL", default_value = "http://localhost:3000")]
    site_url: String,

    #[command(subcommand)]
    command: Commands,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so they never mix with command output
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "agentrun_cli=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let config = Config {
        base_url: cli.base_url,
        path_prefix: cli.path_prefix,
        timeout: Duration::from_millis(cli.timeout_ms),
        poll_interval: Duration::from_millis(cli.poll_interval_ms),
        save_url: cli.save_url,
        site_url: cli.site_url,
    };

    handle_command(cli.command, &config).await
}
