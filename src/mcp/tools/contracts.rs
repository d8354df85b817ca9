//! Contract Tools
//!
//! `deploy_contract` and `call_contract` are placeholders: they need wallet
//! setup and compiled contracts, neither of which this server has. They accept
//! any arguments and always answer with a fixed message.

use serde_json::Value;
use tracing::debug;

use crate::mcp::context::ToolContext;
use crate::mcp::protocol::ToolsCallResult;
use crate::mcp::registry::{McpRegistry, RegisteredTool, RegistryError, ToolBuilder, ToolResult};
use crate::mcp::schema::{CallContractArgs, DeployContractArgs};

pub const DEPLOY_NOT_IMPLEMENTED: &str =
    "Contract deployment not yet implemented. Requires wallet setup and contract compilation.";

pub const CALL_NOT_IMPLEMENTED: &str =
    "Contract calling not yet implemented. Requires wallet setup and contract interface.";

pub fn register_tools(registry: &mut McpRegistry) -> Result<(), RegistryError> {
    registry.register_tool(deploy_contract_tool())?;
    registry.register_tool(call_contract_tool())?;
    Ok(())
}

fn deploy_contract_tool() -> RegisteredTool {
    ToolBuilder::new("deploy_contract")
        .description("Deploy contract")
        .build(deploy_contract_handler)
}

async fn deploy_contract_handler(_ctx: ToolContext, params: Value) -> ToolResult {
    // Never log the wallet seed.
    if let Some(args) = DeployContractArgs::parse(&params) {
        debug!(
            contract_type = %args.contract_type,
            indexer = %args.network_config.indexer,
            "deploy_contract requested"
        );
    }
    Ok(ToolsCallResult::text(DEPLOY_NOT_IMPLEMENTED))
}

fn call_contract_tool() -> RegisteredTool {
    ToolBuilder::new("call_contract")
        .description("Call contract")
        .build(call_contract_handler)
}

async fn call_contract_handler(_ctx: ToolContext, params: Value) -> ToolResult {
    if let Some(args) = CallContractArgs::parse(&params) {
        debug!(
            contract_address = %args.contract_address,
            method = %args.method,
            has_args = args.args.is_some(),
            indexer = %args.network_config.indexer,
            "call_contract requested"
        );
    }
    Ok(ToolsCallResult::text(CALL_NOT_IMPLEMENTED))
}
