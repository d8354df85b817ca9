use super::RequestsLoggingLevel;

#[derive(Clone, Debug)]
pub struct ServerConfig {
    pub requests_logging_level: RequestsLoggingLevel,
    pub port: u16,
    pub bind_address: String,
    /// Path the MCP endpoint is mounted at.
    pub mcp_path: String,
    /// Metrics are served on their own port, or not at all.
    pub metrics_port: Option<u16>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            requests_logging_level: RequestsLoggingLevel::Path,
            port: 3000,
            bind_address: "0.0.0.0".to_string(),
            mcp_path: "/sse".to_string(),
            metrics_port: None,
        }
    }
}
