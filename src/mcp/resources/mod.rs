//! MCP Resources
//!
//! Read-only views over indexer data.

pub mod ledger;

use super::registry::{McpRegistry, RegistryError};

/// Register all resources with the registry
pub fn register_all_resources(registry: &mut McpRegistry) -> Result<(), RegistryError> {
    ledger::register_resources(registry)?;
    Ok(())
}
