//! Ledger Resources

use serde_json::{json, Value};

use crate::graphql::{Document, Field, GraphqlQuery};
use crate::mcp::context::ToolContext;
use crate::mcp::protocol::{McpError, ResourceContent};
use crate::mcp::registry::{
    McpRegistry, RegisteredResource, RegistryError, ResourceBuilder, ResourceResult,
};

pub const LEDGER_STATUS_URI: &str = "midnight://ledger/status";

const JSON_MIME: &str = "application/json";

pub fn register_resources(registry: &mut McpRegistry) -> Result<(), RegistryError> {
    registry.register_resource(ledger_status_resource())
}

// ============================================================================
// midnight://ledger/status
// ============================================================================

fn ledger_status_resource() -> RegisteredResource {
    ResourceBuilder::new(LEDGER_STATUS_URI, "ledger_status")
        .description("Midnight ledger status")
        .mime_type(JSON_MIME)
        .build(ledger_status_handler)
}

pub fn ledger_status_query() -> GraphqlQuery {
    GraphqlQuery::new(Document::query("LedgerStatus").select(Field::new("block").fields(["height"])))
}

async fn ledger_status_handler(ctx: ToolContext, uri: String) -> ResourceResult {
    let data = ctx.executor.execute(ledger_status_query()).await?;
    let height = data
        .get("block")
        .and_then(|block| block.get("height"))
        .cloned()
        .unwrap_or(Value::Null);

    // Placeholder status: the indexer answering is all that is checked.
    let status = json!({
        "status": "active",
        "blockHeight": height,
    });
    let text =
        serde_json::to_string(&status).map_err(|e| McpError::InternalError(e.to_string()))?;

    Ok(vec![ResourceContent {
        uri,
        mime_type: Some(JSON_MIME.to_string()),
        text,
    }])
}
