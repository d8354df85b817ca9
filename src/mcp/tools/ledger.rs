//! Ledger Tools
//!
//! Block, transaction and contract action lookups against the indexer.

use serde_json::json;

use super::root_field_result;
use crate::graphql::{Document, Field, Fragment, GraphqlQuery};
use crate::mcp::context::ToolContext;
use crate::mcp::registry::{McpRegistry, RegisteredTool, RegistryError, ToolBuilder, ToolResult};
use crate::mcp::schema::{BlockArgs, ContractActionArgs, LatestBlockArgs, TransactionArgs};

/// Register ledger tools with the registry
pub fn register_tools(registry: &mut McpRegistry) -> Result<(), RegistryError> {
    registry.register_tool(latest_block_tool())?;
    registry.register_tool(block_tool())?;
    registry.register_tool(transaction_tool())?;
    registry.register_tool(contract_action_tool())?;
    Ok(())
}

// ============================================================================
// get_latest_block
// ============================================================================

fn latest_block_tool() -> RegisteredTool {
    ToolBuilder::new("get_latest_block")
        .description("Get latest block")
        .validated(latest_block_handler)
}

pub fn latest_block_query() -> GraphqlQuery {
    GraphqlQuery::new(
        Document::query("LatestBlock")
            .select(Field::new("block").fields(["hash", "height", "timestamp"])),
    )
}

async fn latest_block_handler(ctx: ToolContext, _args: LatestBlockArgs) -> ToolResult {
    let data = ctx.executor.execute(latest_block_query()).await?;
    root_field_result(&data, "block")
}

// ============================================================================
// get_block
// ============================================================================

fn block_tool() -> RegisteredTool {
    ToolBuilder::new("get_block")
        .description("Get block")
        .validated(block_handler)
}

pub fn block_query(args: &BlockArgs) -> GraphqlQuery {
    let document = Document::query("GetBlock")
        .variable("offset", "BlockOffset")
        .select(
            Field::new("block")
                .arg("offset", "$offset")
                .fields(["hash", "height", "protocolVersion", "timestamp", "author"])
                .field(Field::new("parent").fields(["hash"]))
                .field(Field::new("transactions").fields(["id", "hash"])),
        );
    GraphqlQuery::new(document).with_variable("offset", json!(args.offset))
}

async fn block_handler(ctx: ToolContext, args: BlockArgs) -> ToolResult {
    let data = ctx.executor.execute(block_query(&args)).await?;
    root_field_result(&data, "block")
}

// ============================================================================
// get_transaction
// ============================================================================

fn transaction_tool() -> RegisteredTool {
    ToolBuilder::new("get_transaction")
        .description("Get transaction")
        .validated(transaction_handler)
}

pub fn transaction_query(args: &TransactionArgs) -> GraphqlQuery {
    let contract_actions = Field::new("contractActions")
        .typename()
        .on(Fragment::on("ContractDeploy").fields(["address", "state"]))
        .on(Fragment::on("ContractCall").fields(["address", "entryPoint"]))
        .on(Fragment::on("ContractUpdate").fields(["address"]));

    let document = Document::query("GetTransactions")
        .variable("offset", "TransactionOffset!")
        .select(
            Field::new("transactions")
                .arg("offset", "$offset")
                .fields(["id", "hash", "protocolVersion", "merkleTreeRoot"])
                .field(Field::new("block").fields(["height", "hash"]))
                .fields(["identifiers"])
                .field(contract_actions)
                .field(Field::new("fees").fields(["paidFees", "estimatedFees"]))
                .field(Field::new("transactionResult").fields(["status"])),
        );
    GraphqlQuery::new(document).with_variable("offset", json!(args.offset))
}

async fn transaction_handler(ctx: ToolContext, args: TransactionArgs) -> ToolResult {
    let data = ctx.executor.execute(transaction_query(&args)).await?;
    root_field_result(&data, "transactions")
}

// ============================================================================
// get_contract_action
// ============================================================================

fn contract_action_tool() -> RegisteredTool {
    ToolBuilder::new("get_contract_action")
        .description("Get contract action")
        .validated(contract_action_handler)
}

fn unshielded_balances() -> Field {
    Field::new("unshieldedBalances").fields(["tokenType", "amount"])
}

pub fn contract_action_query(args: &ContractActionArgs) -> GraphqlQuery {
    let document = Document::query("GetContractAction")
        .variable("address", "HexEncoded!")
        .variable("offset", "ContractActionOffset")
        .select(
            Field::new("contractAction")
                .arg("address", "$address")
                .arg("offset", "$offset")
                .typename()
                .on(Fragment::on("ContractDeploy")
                    .fields(["address", "state", "zswapState"])
                    .field(unshielded_balances()))
                .on(Fragment::on("ContractCall")
                    .fields(["address", "state", "entryPoint", "zswapState"])
                    .field(unshielded_balances()))
                .on(Fragment::on("ContractUpdate")
                    .fields(["address", "state", "zswapState"])
                    .field(unshielded_balances())),
        );
    GraphqlQuery::new(document)
        .with_variable("address", json!(args.address))
        .with_variable("offset", json!(args.offset))
}

async fn contract_action_handler(ctx: ToolContext, args: ContractActionArgs) -> ToolResult {
    let data = ctx.executor.execute(contract_action_query(&args)).await?;
    root_field_result(&data, "contractAction")
}
