//! NodeLink Agent
//!
//! Registers this machine with the coordination gateway, opens a session and
//! pings it on a fixed interval until interrupted.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use nl_agent::{GatewayClient, NodeApi, Orchestrator};
use nl_core::config::{self, AgentConfig};
use nl_core::{read_node_identity, FileTokenProvider};

#[derive(Parser)]
#[command(name = "nl-agent")]
#[command(about = "NodeLink agent - keeps a node registered and alive on the gateway")]
#[command(version)]
struct Args {
    /// Path to configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// File containing `<nodeId>:<hardwareId>`
    #[arg(long, env = "NODELINK_ID_FILE")]
    id_file: Option<PathBuf>,

    /// File containing the bearer token (re-read before every request)
    #[arg(long, env = "NODELINK_TOKEN_FILE")]
    token_file: Option<PathBuf>,

    /// Gateway API base URL
    #[arg(long, env = "NODELINK_BASE_URL")]
    base_url: Option<String>,

    /// Public IP discovery endpoint
    #[arg(long, env = "NODELINK_IP_SERVICE_URL")]
    ip_service_url: Option<String>,

    /// Seconds between recurring pings
    #[arg(long, env = "NODELINK_PING_INTERVAL")]
    ping_interval: Option<u64>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    /// Register, start a session and ping until interrupted (default)
    Run,
    /// Send a single stop-session request for this node
    StopSession,
    /// Send a single ping for this node
    Ping,
}

impl Args {
    /// Load the config file, then apply command-line overrides
    fn resolve_config(&self) -> Result<AgentConfig> {
        let mut config = match &self.config {
            Some(path) => config::load_config(path)
                .with_context(|| format!("Failed to load config from {:?}", path))?,
            None => {
                let path = config::default_config_path();
                if path.exists() {
                    config::load_config(&path).unwrap_or_else(|e| {
                        tracing::warn!("Failed to load config from {:?}: {}", path, e);
                        AgentConfig::default()
                    })
                } else {
                    AgentConfig::default()
                }
            }
        };

        if let Some(id_file) = &self.id_file {
            config.id_file = id_file.clone();
        }
        if let Some(token_file) = &self.token_file {
            config.token_file = token_file.clone();
        }
        if let Some(base_url) = &self.base_url {
            config.base_url = base_url.clone();
        }
        if let Some(ip_service_url) = &self.ip_service_url {
            config.ip_service_url = ip_service_url.clone();
        }
        if let Some(secs) = self.ping_interval {
            config.ping_interval = Duration::from_secs(secs);
        }

        config.validate().context("Invalid configuration")?;
        Ok(config)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| args.log_level.clone()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = args.resolve_config()?;
    tracing::info!("NodeLink agent starting (gateway {})", config.api_base());

    let tokens = FileTokenProvider::new(&config.token_file);
    let client = Arc::new(
        GatewayClient::new(&config, tokens).context("Failed to create gateway client")?,
    );

    match args.command.unwrap_or(Command::Run) {
        Command::Run => run(client, &config).await,
        Command::StopSession => {
            let identity = read_node_identity(&config.id_file).await?;
            let response = client.stop_session(&identity.node_id).await?;
            tracing::info!("Session stopped (status {})", response.status);
            Ok(())
        }
        Command::Ping => {
            let identity = read_node_identity(&config.id_file).await?;
            let response = client.ping_node(&identity.node_id).await?;
            tracing::info!("Ping completed (status {})", response.status);
            Ok(())
        }
    }
}

async fn run<A: NodeApi + 'static>(client: Arc<A>, config: &AgentConfig) -> Result<()> {
    let orchestrator = Orchestrator::new(client, &config.id_file, config.ping_interval);
    let cancel = CancellationToken::new();

    let running = match orchestrator.start(cancel.clone()).await {
        Ok(running) => running,
        Err(e) => {
            tracing::error!("An error occurred: {}", e);
            return Err(e.into());
        }
    };

    tracing::info!(
        "Node {} is live; pinging every {}s",
        running.identity.node_id,
        config.ping_interval.as_secs()
    );

    tokio::signal::ctrl_c()
        .await
        .context("Failed to listen for shutdown signal")?;

    tracing::info!("Shutdown requested");
    let sent = running.pings.pings_sent();
    let failed = running.pings.pings_failed();
    running.pings.shutdown().await;
    tracing::info!("Stopped after {} recurring pings ({} failed)", sent, failed);

    Ok(())
}
