//! Midnight MCP Server Library
//!
//! MCP gateway over the Midnight ledger indexer: tools and resources are
//! dispatched to GraphQL queries. Modules are exposed for the binaries and
//! the integration tests.

pub mod client;
pub mod config;
pub mod graphql;
pub mod mcp;
pub mod server;

// Re-export commonly used types for convenience
pub use graphql::{GraphqlClient, QueryExecutor};
pub use server::{run_server, RequestsLoggingLevel};
