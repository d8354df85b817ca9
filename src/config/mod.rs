mod file_config;

pub use file_config::FileConfig;

use crate::graphql::DEFAULT_GRAPHQL_URL;
use crate::server::{RequestsLoggingLevel, ServerConfig};
use anyhow::{bail, Result};
use clap::ValueEnum;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub port: u16,
    pub bind_address: String,
    pub graphql_url: String,
    pub graphql_timeout_sec: u64,
    pub mcp_path: String,
    pub metrics_port: Option<u16>,
    pub logging_level: RequestsLoggingLevel,
}

impl Default for CliConfig {
    fn default() -> Self {
        Self {
            port: 3000,
            bind_address: "0.0.0.0".to_string(),
            graphql_url: DEFAULT_GRAPHQL_URL.to_string(),
            graphql_timeout_sec: 30,
            mcp_path: "/sse".to_string(),
            metrics_port: None,
            logging_level: RequestsLoggingLevel::Path,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub port: u16,
    pub bind_address: String,
    pub graphql_url: String,
    pub graphql_timeout_sec: u64,
    pub mcp_path: String,
    pub metrics_port: Option<u16>,
    pub logging_level: RequestsLoggingLevel,
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let port = file.port.unwrap_or(cli.port);
        let bind_address = file
            .bind_address
            .unwrap_or_else(|| cli.bind_address.clone());

        let graphql_url = file
            .graphql_url
            .unwrap_or_else(|| cli.graphql_url.clone())
            .trim()
            .to_string();
        if graphql_url.is_empty() {
            bail!("graphql_url must not be empty");
        }
        if !graphql_url.starts_with("http://") && !graphql_url.starts_with("https://") {
            bail!("graphql_url must be an http(s) URL: {}", graphql_url);
        }

        let graphql_timeout_sec = file
            .graphql_timeout_sec
            .unwrap_or(cli.graphql_timeout_sec);
        if graphql_timeout_sec == 0 {
            bail!("graphql_timeout_sec must be greater than 0");
        }

        let mcp_path = file.mcp_path.unwrap_or_else(|| cli.mcp_path.clone());
        if !mcp_path.starts_with('/') {
            bail!("mcp_path must start with '/': {}", mcp_path);
        }
        // `/` serves the banner
        if mcp_path == "/" {
            bail!("mcp_path must not be '/'");
        }

        let metrics_port = file.metrics_port.or(cli.metrics_port);
        if metrics_port == Some(port) {
            bail!("metrics_port must differ from port ({})", port);
        }

        let logging_level = match file.logging_level {
            Some(s) => match parse_logging_level(&s) {
                Some(level) => level,
                None => bail!("Invalid logging_level in config file: {}", s),
            },
            None => cli.logging_level.clone(),
        };

        Ok(Self {
            port,
            bind_address,
            graphql_url,
            graphql_timeout_sec,
            mcp_path,
            metrics_port,
            logging_level,
        })
    }

    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            requests_logging_level: self.logging_level.clone(),
            port: self.port,
            bind_address: self.bind_address.clone(),
            mcp_path: self.mcp_path.clone(),
            metrics_port: self.metrics_port,
        }
    }
}

/// Parses a logging level string into RequestsLoggingLevel.
/// Uses clap's ValueEnum trait for parsing.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}
