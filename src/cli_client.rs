use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use serde_json::{json, Map, Value};
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use midnight_mcp::client::{McpHttpClient, DEFAULT_SERVER_URL};

#[derive(Parser, Debug)]
#[command(name = "midnight-client", version, about = "Midnight MCP client CLI")]
struct CliArgs {
    /// URL of the MCP endpoint.
    #[clap(long, env = "MCP_SERVER_URL", default_value = DEFAULT_SERVER_URL)]
    pub server_url: String,

    /// Request timeout in seconds.
    #[clap(long, default_value_t = 60)]
    pub timeout_sec: u64,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// Echoes a message back.
    Echo { message: String },

    /// Shows the latest block.
    GetLatestBlock,

    /// Shows a block by height or hash.
    GetBlock {
        #[clap(long)]
        height: Option<u64>,
        #[clap(long)]
        hash: Option<String>,
    },

    /// Shows a transaction by hash or identifier.
    GetTransaction {
        #[clap(long)]
        hash: Option<String>,
        #[clap(long)]
        identifier: Option<String>,
    },

    /// Shows the action of a contract at a block or transaction.
    GetContractAction {
        address: String,
        #[clap(long)]
        block_height: Option<u64>,
        #[clap(long)]
        block_hash: Option<String>,
        #[clap(long)]
        tx_hash: Option<String>,
        #[clap(long)]
        tx_identifier: Option<String>,
    },

    /// Shows the dust generation status of Cardano stake keys.
    GetDustGenerationStatus {
        #[clap(required = true)]
        stake_keys: Vec<String>,
    },

    /// Deploys a contract.
    DeployContract {
        contract_type: String,
        wallet_seed: String,
        indexer: String,
        indexer_ws: String,
        node: String,
        proof_server: String,
    },

    /// Calls a contract method. `args` is parsed as JSON.
    CallContract {
        contract_address: String,
        method: String,
        wallet_seed: String,
        indexer: String,
        indexer_ws: String,
        node: String,
        proof_server: String,
        args: Option<String>,
    },

    /// Lists the tools the server offers.
    ListTools,

    /// Lists the resources the server offers.
    ListResources,

    /// Reads a resource.
    ReadResource { uri: String },
}

/// Object holding only the fields that are set.
fn present_fields<const N: usize>(fields: [(&str, Option<Value>); N]) -> Value {
    let map: Map<String, Value> = fields
        .into_iter()
        .filter_map(|(name, value)| value.map(|v| (name.to_string(), v)))
        .collect();
    Value::Object(map)
}

fn network_config(indexer: String, indexer_ws: String, node: String, proof_server: String) -> Value {
    json!({
        "indexer": indexer,
        "indexer_ws": indexer_ws,
        "node": node,
        "proof_server": proof_server,
    })
}

/// Tool name and arguments for a tool subcommand, `None` for the others.
fn tool_call(command: &Command) -> Result<Option<(&'static str, Value)>> {
    let call = match command.clone() {
        Command::Echo { message } => ("echo", json!({ "message": message })),
        Command::GetLatestBlock => ("get_latest_block", json!({})),
        Command::GetBlock { height, hash } => (
            "get_block",
            present_fields([
                ("height", height.map(Value::from)),
                ("hash", hash.map(Value::from)),
            ]),
        ),
        Command::GetTransaction { hash, identifier } => (
            "get_transaction",
            present_fields([
                ("hash", hash.map(Value::from)),
                ("identifier", identifier.map(Value::from)),
            ]),
        ),
        Command::GetContractAction {
            address,
            block_height,
            block_hash,
            tx_hash,
            tx_identifier,
        } => (
            "get_contract_action",
            present_fields([
                ("address", Some(Value::from(address))),
                ("block_height", block_height.map(Value::from)),
                ("block_hash", block_hash.map(Value::from)),
                ("tx_hash", tx_hash.map(Value::from)),
                ("tx_identifier", tx_identifier.map(Value::from)),
            ]),
        ),
        Command::GetDustGenerationStatus { stake_keys } => (
            "get_dust_generation_status",
            json!({ "stake_keys": stake_keys }),
        ),
        Command::DeployContract {
            contract_type,
            wallet_seed,
            indexer,
            indexer_ws,
            node,
            proof_server,
        } => (
            "deploy_contract",
            json!({
                "contract_type": contract_type,
                "wallet_seed": wallet_seed,
                "network_config": network_config(indexer, indexer_ws, node, proof_server),
            }),
        ),
        Command::CallContract {
            contract_address,
            method,
            wallet_seed,
            indexer,
            indexer_ws,
            node,
            proof_server,
            args,
        } => {
            let args = args
                .map(|a| serde_json::from_str::<Value>(&a))
                .transpose()
                .context("args must be valid JSON")?;
            let mut arguments = json!({
                "contract_address": contract_address,
                "method": method,
                "wallet_seed": wallet_seed,
                "network_config": network_config(indexer, indexer_ws, node, proof_server),
            });
            if let (Some(args), Some(map)) = (args, arguments.as_object_mut()) {
                map.insert("args".to_string(), args);
            }
            ("call_contract", arguments)
        }
        Command::ListTools | Command::ListResources | Command::ReadResource { .. } => {
            return Ok(None)
        }
    };
    Ok(Some(call))
}

async fn run(client: &McpHttpClient, command: Command) -> Result<Value> {
    if let Some((name, arguments)) = tool_call(&command)? {
        let result = client.call_tool(name, arguments).await?;
        return Ok(serde_json::to_value(result.content)?);
    }

    let output = match command {
        Command::ListTools => serde_json::to_value(client.list_tools().await?)?,
        Command::ListResources => serde_json::to_value(client.list_resources().await?)?,
        Command::ReadResource { uri } => serde_json::to_value(client.read_resource(&uri).await?)?,
        _ => Value::Null,
    };
    Ok(output)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    // Logs go to stderr, stdout is reserved for results.
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::WARN.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    let client = McpHttpClient::new(cli_args.server_url.clone(), cli_args.timeout_sec)?;
    client
        .initialize()
        .await
        .with_context(|| format!("Failed to initialize with {}", cli_args.server_url))?;

    let output = run(&client, cli_args.command).await?;
    println!("{}", serde_json::to_string(&output)?);
    Ok(())
}
