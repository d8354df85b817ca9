//! MCP Tool Execution Context
//!
//! Provides access to the query executor for tool implementations.

use std::sync::Arc;

use crate::graphql::QueryExecutor;

/// Context provided to tool and resource handlers during execution
#[derive(Clone)]
pub struct ToolContext {
    /// Executor for indexer queries
    pub executor: Arc<dyn QueryExecutor>,
}

impl ToolContext {
    pub fn new(executor: Arc<dyn QueryExecutor>) -> Self {
        Self { executor }
    }
}
