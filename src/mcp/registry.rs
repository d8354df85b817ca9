//! MCP Tool and Resource Registry
//!
//! Manages registration, lookup and invocation of tools and resources.
//! Registration happens once at startup; the registry is read-only afterwards.

use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;
use tracing::debug;

use super::context::ToolContext;
use super::protocol::{
    McpError, ResourceContent, ResourceDefinition, ToolDefinition, ToolsCallResult,
};
use super::schema::InputContract;

// ============================================================================
// Tool Types
// ============================================================================

/// Result type for tool execution
pub type ToolResult = Result<ToolsCallResult, McpError>;

/// Boxed future for async tool execution
pub type ToolFuture = Pin<Box<dyn Future<Output = ToolResult> + Send>>;

/// Tool handler function type
pub type ToolHandler = Arc<dyn Fn(ToolContext, Value) -> ToolFuture + Send + Sync>;

/// A registered tool with metadata and handler
pub struct RegisteredTool {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
    pub handler: ToolHandler,
}

// ============================================================================
// Resource Types
// ============================================================================

/// Result type for resource read
pub type ResourceResult = Result<Vec<ResourceContent>, McpError>;

/// Boxed future for async resource read
pub type ResourceFuture = Pin<Box<dyn Future<Output = ResourceResult> + Send>>;

/// Resource handler function type
pub type ResourceHandler = Arc<dyn Fn(ToolContext, String) -> ResourceFuture + Send + Sync>;

/// A registered resource with metadata and handler
pub struct RegisteredResource {
    pub uri: String,
    pub name: String,
    pub description: Option<String>,
    pub mime_type: Option<String>,
    pub handler: ResourceHandler,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("Tool already registered: {0}")]
    DuplicateTool(String),

    #[error("Resource already registered: {0}")]
    DuplicateResource(String),
}

// ============================================================================
// Registry
// ============================================================================

/// Registry for MCP tools and resources
#[derive(Default)]
pub struct McpRegistry {
    tools: HashMap<String, RegisteredTool>,
    // Kept in registration order for listing.
    tool_order: Vec<String>,
    resources: Vec<RegisteredResource>,
}

impl McpRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool. Names are unique.
    pub fn register_tool(&mut self, tool: RegisteredTool) -> Result<(), RegistryError> {
        if self.tools.contains_key(&tool.name) {
            return Err(RegistryError::DuplicateTool(tool.name));
        }
        self.tool_order.push(tool.name.clone());
        self.tools.insert(tool.name.clone(), tool);
        Ok(())
    }

    /// Register a resource. URIs are unique.
    pub fn register_resource(&mut self, resource: RegisteredResource) -> Result<(), RegistryError> {
        if self.resources.iter().any(|r| r.uri == resource.uri) {
            return Err(RegistryError::DuplicateResource(resource.uri));
        }
        self.resources.push(resource);
        Ok(())
    }

    /// Definitions of all tools, in registration order
    pub fn tool_definitions(&self) -> Vec<ToolDefinition> {
        self.tool_order
            .iter()
            .filter_map(|name| self.tools.get(name))
            .map(|tool| ToolDefinition {
                name: tool.name.clone(),
                description: tool.description.clone(),
                input_schema: tool.input_schema.clone(),
            })
            .collect()
    }

    pub fn get_tool(&self, name: &str) -> Option<&RegisteredTool> {
        self.tools.get(name)
    }

    pub fn resource_definitions(&self) -> Vec<ResourceDefinition> {
        self.resources
            .iter()
            .map(|resource| ResourceDefinition {
                uri: resource.uri.clone(),
                name: resource.name.clone(),
                description: resource.description.clone(),
                mime_type: resource.mime_type.clone(),
            })
            .collect()
    }

    pub fn find_resource(&self, uri: &str) -> Option<&RegisteredResource> {
        self.resources.iter().find(|resource| resource.uri == uri)
    }

    /// Look up a tool and run it. Unknown names fail before anything runs.
    pub async fn call_tool(&self, name: &str, ctx: ToolContext, arguments: Value) -> ToolResult {
        let tool = self
            .get_tool(name)
            .ok_or_else(|| McpError::MethodNotFound(format!("Unknown tool: {}", name)))?;

        debug!(tool = name, "Invoking tool");
        (tool.handler)(ctx, arguments).await
    }

    /// Look up a resource by URI and read it.
    pub async fn read_resource(&self, uri: &str, ctx: ToolContext) -> ResourceResult {
        let resource = self
            .find_resource(uri)
            .ok_or_else(|| McpError::ResourceNotFound(uri.to_string()))?;

        (resource.handler)(ctx, uri.to_string()).await
    }

    /// Get the number of registered tools
    pub fn tool_count(&self) -> usize {
        self.tools.len()
    }

    /// Get the number of registered resources
    pub fn resource_count(&self) -> usize {
        self.resources.len()
    }
}

// ============================================================================
// Builder helpers
// ============================================================================

/// Builder for registering a tool
pub struct ToolBuilder {
    name: String,
    description: String,
    input_schema: Value,
}

impl ToolBuilder {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            input_schema: serde_json::json!({
                "type": "object",
                "properties": {}
            }),
        }
    }

    pub fn description(mut self, desc: impl Into<String>) -> Self {
        self.description = desc.into();
        self
    }

    /// Build with a handler that receives the raw, unvalidated arguments.
    pub fn build<F, Fut>(self, handler: F) -> RegisteredTool
    where
        F: Fn(ToolContext, Value) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ToolResult> + Send + 'static,
    {
        RegisteredTool {
            name: self.name,
            description: self.description,
            input_schema: self.input_schema,
            handler: Arc::new(move |ctx, params| Box::pin(handler(ctx, params))),
        }
    }

    /// Build with an input contract: its schema is advertised, and arguments
    /// are decoded before the handler runs. Decoding failures never reach it.
    pub fn validated<A, F, Fut>(self, handler: F) -> RegisteredTool
    where
        A: InputContract + Send + 'static,
        F: Fn(ToolContext, A) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ToolResult> + Send + 'static,
    {
        let tool_name = self.name.clone();
        RegisteredTool {
            name: self.name,
            description: self.description,
            input_schema: A::json_schema(),
            handler: Arc::new(move |ctx: ToolContext, params: Value| -> ToolFuture {
                match A::decode(&params) {
                    Ok(args) => Box::pin(handler(ctx, args)),
                    Err(e) => {
                        debug!(tool = %tool_name, error = %e, "Rejected tool arguments");
                        let err = McpError::InvalidParams(e.to_string());
                        Box::pin(async move { Err(err) })
                    }
                }
            }),
        }
    }
}

/// Builder for registering a resource
pub struct ResourceBuilder {
    uri: String,
    name: String,
    description: Option<String>,
    mime_type: Option<String>,
}

impl ResourceBuilder {
    pub fn new(uri: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            name: name.into(),
            description: None,
            mime_type: None,
        }
    }

    pub fn description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }

    pub fn mime_type(mut self, mime: impl Into<String>) -> Self {
        self.mime_type = Some(mime.into());
        self
    }

    pub fn build<F, Fut>(self, handler: F) -> RegisteredResource
    where
        F: Fn(ToolContext, String) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = ResourceResult> + Send + 'static,
    {
        RegisteredResource {
            uri: self.uri,
            name: self.name,
            description: self.description,
            mime_type: self.mime_type,
            handler: Arc::new(move |ctx, uri| Box::pin(handler(ctx, uri))),
        }
    }
}
