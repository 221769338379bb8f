//! Genflow CLI
//!
//! Command-line interface for the Gamma and DocsAutomator generation APIs.

mod commands;
mod config;
mod types;

use anyhow::Result;
use clap::Parser;
use commands::{Commands, handle_command};
use config::Config;
use genflow_client::{DocsAutomatorClient, GammaClient, PollConfig};
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "genflow")]
#[command(about = "Generate documents and presentations from note content", long_about = None)]
struct Cli {
    /// Gamma API key
    #[arg(long, env = "GAMMA_API_KEY", hide_env_values = true)]
    gamma_api_key: Option<String>,

    /// DocsAutomator API key
    #[arg(long, env = "DOCSAUTOMATOR_API_KEY", hide_env_values = true)]
    docsautomator_api_key: Option<String>,

    /// Gamma API URL
    #[arg(long, env = "GAMMA_BASE_URL", default_value = GammaClient::DEFAULT_BASE_URL)]
    gamma_base_url: String,

    /// DocsAutomator API URL
    #[arg(
        long,
        env = "DOCSAUTOMATOR_BASE_URL",
        default_value = DocsAutomatorClient::DEFAULT_BASE_URL
    )]
    docsautomator_base_url: String,

    /// Maximum seconds to wait for a generation [default: GENFLOW_MAX_WAIT or 300]
    #[arg(long)]
    max_wait: Option<u64>,

    /// Seconds between status checks [default: GENFLOW_POLL_INTERVAL or 5]
    #[arg(long)]
    poll_interval: Option<u64>,

    /// Give up after this many "not found" status responses
    #[arg(long)]
    max_not_found: Option<u32>,

    /// Per-request HTTP timeout in seconds
    #[arg(long, env = "GENFLOW_REQUEST_TIMEOUT", default_value_t = 30)]
    request_timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

impl Cli {
    fn poll_config(&self) -> PollConfig {
        let mut poll = PollConfig::from_env();
        if let Some(secs) = self.max_wait {
            poll = poll.with_max_wait(Duration::from_secs(secs));
        }
        if let Some(secs) = self.poll_interval {
            poll = poll.with_poll_interval(Duration::from_secs(secs));
        }
        if self.max_not_found.is_some() {
            poll = poll.with_max_not_found(self.max_not_found);
        }
        poll
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Logs go to stderr so command output stays pipeable
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "genflow=info,genflow_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Interrupt received, cancelling");
                on_interrupt.cancel();
            }
            Err(e) => warn!("Failed to listen for interrupt: {}", e),
        }
    });

    let poll = cli.poll_config();
    poll.validate()?;

    let config = Config {
        gamma_api_key: cli.gamma_api_key,
        docsautomator_api_key: cli.docsautomator_api_key,
        gamma_base_url: cli.gamma_base_url,
        docsautomator_base_url: cli.docsautomator_base_url,
        request_timeout: Duration::from_secs(cli.request_timeout),
        poll,
        cancel,
    };

    handle_command(cli.command, &config).await
}
