//! Dust Tools

use serde_json::json;

use super::root_field_result;
use crate::graphql::{Document, Field, GraphqlQuery};
use crate::mcp::context::ToolContext;
use crate::mcp::registry::{McpRegistry, RegisteredTool, RegistryError, ToolBuilder, ToolResult};
use crate::mcp::schema::DustGenerationStatusArgs;

pub fn register_tools(registry: &mut McpRegistry) -> Result<(), RegistryError> {
    registry.register_tool(dust_generation_status_tool())
}

fn dust_generation_status_tool() -> RegisteredTool {
    ToolBuilder::new("get_dust_generation_status")
        .description("Get dust generation status")
        .validated(dust_generation_status_handler)
}

pub fn dust_generation_status_query(args: &DustGenerationStatusArgs) -> GraphqlQuery {
    let document = Document::query("GetDustGenerationStatus")
        .variable("cardanoStakeKeys", "[HexEncoded!]!")
        .select(
            Field::new("dustGenerationStatus")
                .arg("cardanoStakeKeys", "$cardanoStakeKeys")
                .fields([
                    "cardanoStakeKey",
                    "dustAddress",
                    "registered",
                    "nightBalance",
                    "generationRate",
                    "currentCapacity",
                ]),
        );
    GraphqlQuery::new(document).with_variable("cardanoStakeKeys", json!(args.stake_keys))
}

async fn dust_generation_status_handler(
    ctx: ToolContext,
    args: DustGenerationStatusArgs,
) -> ToolResult {
    let data = ctx
        .executor
        .execute(dust_generation_status_query(&args))
        .await?;
    root_field_result(&data, "dustGenerationStatus")
}
