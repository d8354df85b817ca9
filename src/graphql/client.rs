//! HTTP client for the ledger indexer's GraphQL endpoint.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, warn};

use super::document::Document;
use crate::server::metrics::record_graphql_query;

/// A document plus its variable bindings.
#[derive(Debug, Clone)]
pub struct GraphqlQuery {
    pub document: Document,
    pub variables: Map<String, Value>,
}

impl GraphqlQuery {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            variables: Map::new(),
        }
    }

    pub fn with_variable(mut self, name: impl Into<String>, value: Value) -> Self {
        self.variables.insert(name.into(), value);
        self
    }

    pub fn operation_name(&self) -> &str {
        self.document.operation_name()
    }
}

/// Errors from a single round trip to the GraphQL endpoint.
#[derive(Debug, Error)]
pub enum QueryError {
    #[error("GraphQL request failed: {0}")]
    Transport(String),

    #[error("GraphQL endpoint returned status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("GraphQL errors: {}", messages.join("; "))]
    GraphQl { messages: Vec<String>, errors: Value },

    #[error("GraphQL response has no data")]
    MissingData,

    #[error("Failed to decode GraphQL response: {0}")]
    Decode(String),
}

impl QueryError {
    fn status_label(&self) -> &'static str {
        match self {
            QueryError::Transport(_) => "transport_error",
            QueryError::Status { .. } => "http_error",
            QueryError::GraphQl { .. } => "graphql_error",
            QueryError::MissingData => "missing_data",
            QueryError::Decode(_) => "decode_error",
        }
    }
}

/// Executes one query against a GraphQL endpoint.
///
/// Each call is independent: no retries, caching or batching.
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Run the query and return the `data` member of the response.
    async fn execute(&self, query: GraphqlQuery) -> Result<Value, QueryError>;
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GraphqlRequestBody<'a> {
    query: String,
    operation_name: &'a str,
    variables: &'a Map<String, Value>,
}

#[derive(Deserialize)]
struct GraphqlResponseBody {
    #[serde(default)]
    data: Option<Value>,
    #[serde(default)]
    errors: Option<Vec<Value>>,
}

/// reqwest-backed executor.
#[derive(Clone)]
pub struct GraphqlClient {
    client: Client,
    endpoint: String,
}

impl GraphqlClient {
    /// Create a new client.
    ///
    /// # Arguments
    /// * `endpoint` - Full URL of the GraphQL endpoint
    /// * `timeout_secs` - Request timeout in seconds
    pub fn new(endpoint: impl Into<String>, timeout_secs: u64) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn send(&self, query: &GraphqlQuery) -> Result<Value, QueryError> {
        let body = GraphqlRequestBody {
            query: query.document.render(),
            operation_name: query.operation_name(),
            variables: &query.variables,
        };

        let response = self
            .client
            .post(&self.endpoint)
            .json(&body)
            .send()
            .await
            .map_err(|e| QueryError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(QueryError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let body: GraphqlResponseBody = response
            .json()
            .await
            .map_err(|e| QueryError::Decode(e.to_string()))?;

        into_data(body)
    }
}

fn into_data(body: GraphqlResponseBody) -> Result<Value, QueryError> {
    if let Some(errors) = body.errors.filter(|e| !e.is_empty()) {
        let messages = errors
            .iter()
            .map(|e| {
                e.get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| e.to_string())
            })
            .collect();
        return Err(QueryError::GraphQl {
            messages,
            errors: Value::Array(errors),
        });
    }

    match body.data {
        Some(Value::Null) | None => Err(QueryError::MissingData),
        Some(data) => Ok(data),
    }
}

#[async_trait]
impl QueryExecutor for GraphqlClient {
    async fn execute(&self, query: GraphqlQuery) -> Result<Value, QueryError> {
        let start = Instant::now();
        let result = self.send(&query).await;
        let elapsed = start.elapsed();

        match &result {
            Ok(_) => {
                debug!(
                    operation = query.operation_name(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    "GraphQL query succeeded"
                );
                record_graphql_query(query.operation_name(), "ok");
            }
            Err(e) => {
                warn!(
                    operation = query.operation_name(),
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %e,
                    "GraphQL query failed"
                );
                record_graphql_query(query.operation_name(), e.status_label());
            }
        }

        result
    }
}
