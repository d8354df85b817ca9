//! MCP Tools
//!
//! Tool implementations: indexer lookups plus the contract operation placeholders.

pub mod contracts;
pub mod dust;
pub mod echo;
pub mod ledger;

use serde_json::Value;

use super::protocol::{McpError, ToolsCallResult};
use super::registry::{McpRegistry, RegistryError, ToolResult};

/// Register all tools with the registry
pub fn register_all_tools(registry: &mut McpRegistry) -> Result<(), RegistryError> {
    echo::register_tools(registry)?;
    ledger::register_tools(registry)?;
    dust::register_tools(registry)?;
    contracts::register_tools(registry)?;
    Ok(())
}

/// Wrap `data[field]` as a single text block. A missing field serializes as `null`.
pub(crate) fn root_field_result(data: &Value, field: &str) -> ToolResult {
    let value = data.get(field).unwrap_or(&Value::Null);
    ToolsCallResult::json(value).map_err(|e| McpError::InternalError(e.to_string()))
}
