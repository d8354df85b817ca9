//! MCP (Model Context Protocol) Server
//!
//! Exposes ledger indexer lookups as MCP tools and resources. Each tool call
//! is validated against its input contract, turned into one GraphQL query and
//! answered with the selected data as JSON text.
//!
//! ## Architecture
//!
//! - Transport: HTTP POST at `/sse`, answered as JSON or a single SSE event
//! - Dispatch: stateless, one JSON-RPC message per request
//! - Tools: echo, ledger lookups, dust generation status, contract placeholders
//! - Resources: `midnight://ledger/status`

pub mod context;
pub mod dispatch;
pub mod handler;
pub mod protocol;
pub mod registry;
pub mod resources;
pub mod schema;
pub mod tools;

#[cfg(test)]
pub(crate) mod test_support;

pub use dispatch::{create_mcp_state, handle_message, McpState};
pub use handler::{mcp_get_handler, mcp_post_handler};
pub use protocol::{McpError, McpRequest, McpResponse};
pub use registry::McpRegistry;
