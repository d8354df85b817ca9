use axum::extract::FromRef;
use std::time::Instant;

use super::ServerConfig;
use crate::mcp::McpState;

#[derive(Clone)]
pub struct ServerState {
    pub config: ServerConfig,
    pub start_time: Instant,
    pub mcp_state: McpState,
}

impl FromRef<ServerState> for McpState {
    fn from_ref(input: &ServerState) -> Self {
        input.mcp_state.clone()
    }
}

impl FromRef<ServerState> for ServerConfig {
    fn from_ref(input: &ServerState) -> Self {
        input.config.clone()
    }
}
