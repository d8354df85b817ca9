use anyhow::{Context, Result};
use clap::Parser;
use std::{path::PathBuf, sync::Arc};
use tracing::{info, level_filters::LevelFilter};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use midnight_mcp::config::{AppConfig, CliConfig, FileConfig};
use midnight_mcp::graphql::{GraphqlClient, DEFAULT_GRAPHQL_URL};
use midnight_mcp::server::metrics;
use midnight_mcp::{run_server, QueryExecutor, RequestsLoggingLevel};

#[derive(Parser, Debug)]
#[command(version, about = "MCP server exposing Midnight ledger indexer lookups")]
struct CliArgs {
    /// Path to a TOML config file. Values in the file override CLI arguments.
    #[clap(long)]
    pub config: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, default_value_t = 3000)]
    pub port: u16,

    /// The address to bind to.
    #[clap(long, default_value = "0.0.0.0")]
    pub bind_address: String,

    /// GraphQL endpoint of the ledger indexer.
    #[clap(long, env = "MCP_GRAPHQL_URL", default_value = DEFAULT_GRAPHQL_URL)]
    pub graphql_url: String,

    /// Timeout in seconds for indexer requests.
    #[clap(long, default_value_t = 30)]
    pub graphql_timeout_sec: u64,

    /// Path the MCP endpoint is served at.
    #[clap(long, default_value = "/sse")]
    pub mcp_path: String,

    /// The port for the metrics server (Prometheus scraping). Disabled if not set.
    #[clap(long)]
    pub metrics_port: Option<u16>,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,
}

impl CliArgs {
    fn to_cli_config(&self) -> CliConfig {
        CliConfig {
            port: self.port,
            bind_address: self.bind_address.clone(),
            graphql_url: self.graphql_url.clone(),
            graphql_timeout_sec: self.graphql_timeout_sec,
            mcp_path: self.mcp_path.clone(),
            metrics_port: self.metrics_port,
            logging_level: self.logging_level.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading config file {:?}", path);
            Some(FileConfig::load(path)?)
        }
        None => None,
    };
    let config = AppConfig::resolve(&cli_args.to_cli_config(), file_config)?;

    info!("Initializing metrics...");
    metrics::init_metrics();

    info!(
        "Using indexer at {} (timeout {}s)",
        config.graphql_url, config.graphql_timeout_sec
    );
    let executor: Arc<dyn QueryExecutor> = Arc::new(
        GraphqlClient::new(config.graphql_url.clone(), config.graphql_timeout_sec)
            .context("Failed to create GraphQL client")?,
    );

    run_server(config.server_config(), executor).await
}
