//! Echo Tool

use crate::mcp::context::ToolContext;
use crate::mcp::protocol::ToolsCallResult;
use crate::mcp::registry::{McpRegistry, RegisteredTool, RegistryError, ToolBuilder, ToolResult};
use crate::mcp::schema::EchoArgs;

pub fn register_tools(registry: &mut McpRegistry) -> Result<(), RegistryError> {
    registry.register_tool(echo_tool())
}

fn echo_tool() -> RegisteredTool {
    ToolBuilder::new("echo")
        .description("Echo message")
        .validated(echo_handler)
}

async fn echo_handler(_ctx: ToolContext, args: EchoArgs) -> ToolResult {
    Ok(ToolsCallResult::text(format!("Echo: {}", args.message)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::test_support::RecordingExecutor;
    use serde_json::json;

    #[tokio::test]
    async fn test_echo_returns_single_text_block() {
        let mut registry = McpRegistry::new();
        register_tools(&mut registry).unwrap();
        let executor = RecordingExecutor::new();

        let result = registry
            .call_tool("echo", executor.context(), json!({"message": "hi"}))
            .await
            .unwrap();

        assert_eq!(result, ToolsCallResult::text("Echo: hi"));
        assert_eq!(executor.call_count(), 0);
    }
}
