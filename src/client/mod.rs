//! HTTP client for an MCP server speaking the POST transport.

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use reqwest::{header, Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use thiserror::Error;
use tracing::debug;

use crate::mcp::handler::SESSION_ID_HEADER;
use crate::mcp::protocol::{
    methods, ClientInfo, InitializeParams, InitializeResult, McpRequest, McpResponse, RequestId,
    ResourceContent, ResourceDefinition, ResourcesListResult, ResourcesReadResult,
    ToolDefinition, ToolsCallResult, ToolsListResult, MCP_PROTOCOL_VERSION,
};

/// Default MCP endpoint the client talks to.
pub const DEFAULT_SERVER_URL: &str = "http://127.0.0.1:3000/sse";

const CLIENT_NAME: &str = "midnight-client";

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Server returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("RPC error {code}: {message}")]
    Rpc { code: i32, message: String },

    #[error("Unexpected response: {0}")]
    Decode(String),
}

pub struct McpHttpClient {
    client: Client,
    server_url: String,
    next_id: AtomicI64,
    session_id: Mutex<Option<String>>,
}

impl McpHttpClient {
    /// Create a new client.
    ///
    /// # Arguments
    /// * `server_url` - Full URL of the MCP endpoint (e.g., "http://127.0.0.1:3000/sse")
    /// * `timeout_sec` - Request timeout in seconds
    pub fn new(server_url: impl Into<String>, timeout_sec: u64) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_sec))
            .build()?;

        Ok(Self {
            client,
            server_url: server_url.into(),
            next_id: AtomicI64::new(1),
            session_id: Mutex::new(None),
        })
    }

    /// Session id handed out by the last `initialize`, if any.
    pub fn session_id(&self) -> Option<String> {
        self.session_id.lock().ok().and_then(|s| s.clone())
    }

    async fn post(&self, message: &McpRequest) -> Result<reqwest::Response, ClientError> {
        let mut request = self
            .client
            .post(&self.server_url)
            .header(header::ACCEPT, "application/json")
            .json(message);
        if let Some(session_id) = self.session_id() {
            request = request.header(SESSION_ID_HEADER, session_id);
        }
        Ok(request.send().await?)
    }

    async fn request<T: DeserializeOwned>(
        &self,
        method: &str,
        params: Option<Value>,
    ) -> Result<T, ClientError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let message = McpRequest::new(RequestId::Number(id), method, params);
        debug!(method, id, "Sending MCP request");

        let response = self.post(&message).await?;

        let status = response.status();
        if status != StatusCode::OK {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }

        if let Some(session_id) = response
            .headers()
            .get(SESSION_ID_HEADER)
            .and_then(|v| v.to_str().ok())
        {
            if let Ok(mut guard) = self.session_id.lock() {
                *guard = Some(session_id.to_string());
            }
        }

        let response: McpResponse = response.json().await?;
        if let Some(error) = response.error {
            return Err(ClientError::Rpc {
                code: error.code,
                message: error.message,
            });
        }

        let result = response
            .result
            .ok_or_else(|| ClientError::Decode("response has neither result nor error".into()))?;
        serde_json::from_value(result).map_err(|e| ClientError::Decode(e.to_string()))
    }

    /// Send a notification; the server acknowledges without a body.
    pub async fn notify(&self, method: &str, params: Option<Value>) -> Result<(), ClientError> {
        let message = McpRequest {
            id: None,
            ..McpRequest::new(RequestId::Number(0), method, params)
        };
        let response = self.post(&message).await?;

        let status = response.status();
        if status != StatusCode::ACCEPTED {
            let body = response.text().await.unwrap_or_default();
            return Err(ClientError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(())
    }

    pub async fn initialize(&self) -> Result<InitializeResult, ClientError> {
        let params = InitializeParams {
            protocol_version: MCP_PROTOCOL_VERSION.to_string(),
            capabilities: json!({}),
            client_info: ClientInfo {
                name: CLIENT_NAME.to_string(),
                version: env!("CARGO_PKG_VERSION").to_string(),
            },
        };
        let params =
            serde_json::to_value(params).map_err(|e| ClientError::Decode(e.to_string()))?;

        let result = self.request(methods::INITIALIZE, Some(params)).await?;
        self.notify(methods::INITIALIZED, None).await?;
        Ok(result)
    }

    pub async fn ping(&self) -> Result<(), ClientError> {
        let _: Value = self.request(methods::PING, None).await?;
        Ok(())
    }

    pub async fn list_tools(&self) -> Result<Vec<ToolDefinition>, ClientError> {
        let result: ToolsListResult = self.request(methods::TOOLS_LIST, None).await?;
        Ok(result.tools)
    }

    pub async fn call_tool(&self, name: &str, arguments: Value) -> Result<ToolsCallResult, ClientError> {
        let params = json!({ "name": name, "arguments": arguments });
        self.request(methods::TOOLS_CALL, Some(params)).await
    }

    pub async fn list_resources(&self) -> Result<Vec<ResourceDefinition>, ClientError> {
        let result: ResourcesListResult = self.request(methods::RESOURCES_LIST, None).await?;
        Ok(result.resources)
    }

    pub async fn read_resource(&self, uri: &str) -> Result<Vec<ResourceContent>, ClientError> {
        let params = json!({ "uri": uri });
        let result: ResourcesReadResult = self.request(methods::RESOURCES_READ, Some(params)).await?;
        Ok(result.contents)
    }
}
