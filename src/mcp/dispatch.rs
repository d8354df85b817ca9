//! MCP message dispatch
//!
//! Parses one JSON-RPC message and routes it to the registry. Knows nothing
//! about the transport carrying it.

use std::sync::Arc;
use std::time::Instant;

use serde_json::Value;
use tracing::{debug, info};

use super::context::ToolContext;
use super::protocol::{
    methods, server_version, ClientInfo, InitializeParams, InitializeResult, McpError, McpRequest,
    McpResponse, PingResult, ResourcesCapability, ResourcesListResult, ResourcesReadParams,
    ResourcesReadResult, ServerCapabilities, ServerInfo, ToolsCallParams, ToolsCapability,
    ToolsListResult, JSONRPC_VERSION, MCP_PROTOCOL_VERSION, SERVER_NAME,
};
use super::registry::{McpRegistry, RegistryError};
use crate::graphql::QueryExecutor;
use crate::server::metrics::record_tool_call;

/// State shared by every MCP request
#[derive(Clone)]
pub struct McpState {
    pub registry: Arc<McpRegistry>,
    pub context: ToolContext,
}

/// Create the MCP state with registered tools and resources
pub fn create_mcp_state(executor: Arc<dyn QueryExecutor>) -> Result<McpState, RegistryError> {
    let mut registry = McpRegistry::new();

    super::tools::register_all_tools(&mut registry)?;
    super::resources::register_all_resources(&mut registry)?;

    info!(
        "MCP registry initialized with {} tools and {} resources",
        registry.tool_count(),
        registry.resource_count()
    );

    Ok(McpState {
        registry: Arc::new(registry),
        context: ToolContext::new(executor),
    })
}

/// Handle a single MCP message. Returns `None` for notifications.
pub async fn handle_message(state: &McpState, text: &str) -> Option<McpResponse> {
    match parse_message(text) {
        Ok(request) => handle_request(state, request).await,
        Err(response) => Some(response),
    }
}

/// Parse one JSON-RPC message. Failures come back as the error response to send.
pub fn parse_message(text: &str) -> Result<McpRequest, McpResponse> {
    let raw: Value = serde_json::from_str(text)
        .map_err(|e| McpResponse::error(None, McpError::ParseError(e.to_string())))?;

    serde_json::from_value(raw)
        .map_err(|e| McpResponse::error(None, McpError::InvalidRequest(e.to_string())))
}

/// Route a parsed request. Returns `None` for notifications.
pub async fn handle_request(state: &McpState, request: McpRequest) -> Option<McpResponse> {
    if request.jsonrpc != JSONRPC_VERSION {
        return Some(McpResponse::error(
            request.id,
            McpError::InvalidRequest(format!("Unsupported jsonrpc version: {}", request.jsonrpc)),
        ));
    }

    let request_id = match request.id.clone() {
        Some(id) => id,
        None => {
            debug!(method = %request.method, "Received notification");
            return None;
        }
    };

    let result = match request.method.as_str() {
        methods::INITIALIZE => handle_initialize(&request),
        methods::PING => handle_ping(),
        methods::TOOLS_LIST => handle_tools_list(state),
        methods::TOOLS_CALL => handle_tools_call(&request, state).await,
        methods::RESOURCES_LIST => handle_resources_list(state),
        methods::RESOURCES_READ => handle_resources_read(&request, state).await,
        other => Err(McpError::MethodNotFound(other.to_string())),
    };

    Some(match result {
        Ok(value) => McpResponse::success(request_id, value),
        Err(error) => McpResponse::error(Some(request_id), error),
    })
}

fn parse_params<T: serde::de::DeserializeOwned>(request: &McpRequest) -> Result<Option<T>, McpError> {
    request
        .params
        .clone()
        .map(serde_json::from_value)
        .transpose()
        .map_err(|e| McpError::InvalidParams(e.to_string()))
}

fn handle_initialize(request: &McpRequest) -> Result<Value, McpError> {
    let params: InitializeParams = parse_params(request)?.unwrap_or(InitializeParams {
        protocol_version: MCP_PROTOCOL_VERSION.to_string(),
        capabilities: Value::Null,
        client_info: ClientInfo {
            name: "unknown".to_string(),
            version: "unknown".to_string(),
        },
    });

    info!(
        client = %params.client_info.name,
        client_version = %params.client_info.version,
        protocol_version = %params.protocol_version,
        "MCP client initializing"
    );

    let result = InitializeResult {
        protocol_version: MCP_PROTOCOL_VERSION.to_string(),
        capabilities: ServerCapabilities {
            tools: Some(ToolsCapability { list_changed: None }),
            resources: Some(ResourcesCapability {
                subscribe: Some(false),
                list_changed: None,
            }),
        },
        server_info: ServerInfo {
            name: SERVER_NAME.to_string(),
            version: server_version(),
        },
    };

    serde_json::to_value(result).map_err(|e| McpError::InternalError(e.to_string()))
}

fn handle_ping() -> Result<Value, McpError> {
    serde_json::to_value(PingResult {}).map_err(|e| McpError::InternalError(e.to_string()))
}

fn handle_tools_list(state: &McpState) -> Result<Value, McpError> {
    let result = ToolsListResult {
        tools: state.registry.tool_definitions(),
    };

    serde_json::to_value(result).map_err(|e| McpError::InternalError(e.to_string()))
}

async fn handle_tools_call(request: &McpRequest, state: &McpState) -> Result<Value, McpError> {
    let params: ToolsCallParams = parse_params(request)?
        .ok_or_else(|| McpError::InvalidParams("Missing params".to_string()))?;

    let arguments = params.arguments.unwrap_or(Value::Null);
    let start = Instant::now();
    let result = state
        .registry
        .call_tool(&params.name, state.context.clone(), arguments)
        .await;
    let elapsed = start.elapsed();

    // Unknown names are not tools, keep them out of the label set.
    if state.registry.get_tool(&params.name).is_some() {
        let status = match &result {
            Ok(_) => "ok",
            Err(e) => e.kind(),
        };
        record_tool_call(&params.name, status, elapsed);
        debug!(
            tool = %params.name,
            status,
            elapsed_ms = elapsed.as_millis() as u64,
            "Tool call finished"
        );
    }

    serde_json::to_value(result?).map_err(|e| McpError::InternalError(e.to_string()))
}

fn handle_resources_list(state: &McpState) -> Result<Value, McpError> {
    let result = ResourcesListResult {
        resources: state.registry.resource_definitions(),
    };

    serde_json::to_value(result).map_err(|e| McpError::InternalError(e.to_string()))
}

async fn handle_resources_read(request: &McpRequest, state: &McpState) -> Result<Value, McpError> {
    let params: ResourcesReadParams = parse_params(request)?
        .ok_or_else(|| McpError::InvalidParams("Missing params".to_string()))?;

    let contents = state
        .registry
        .read_resource(&params.uri, state.context.clone())
        .await?;

    let result = ResourcesReadResult { contents };

    serde_json::to_value(result).map_err(|e| McpError::InternalError(e.to_string()))
}
