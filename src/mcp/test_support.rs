//! Test doubles for the query executor.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::{json, Value};

use super::context::ToolContext;
use crate::graphql::{GraphqlQuery, QueryError, QueryExecutor};

enum Reply {
    Data(Value),
    Fail(Box<dyn Fn() -> QueryError + Send + Sync>),
}

/// Records every query it receives and answers with a canned reply.
#[derive(Clone)]
pub struct RecordingExecutor {
    reply: Arc<Reply>,
    queries: Arc<Mutex<Vec<GraphqlQuery>>>,
}

impl RecordingExecutor {
    /// Answers every query with an empty `data` object.
    pub fn new() -> Self {
        Self::responding(json!({}))
    }

    pub fn responding(data: Value) -> Self {
        Self {
            reply: Arc::new(Reply::Data(data)),
            queries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn failing(make_error: impl Fn() -> QueryError + Send + Sync + 'static) -> Self {
        Self {
            reply: Arc::new(Reply::Fail(Box::new(make_error))),
            queries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn context(&self) -> ToolContext {
        ToolContext::new(Arc::new(self.clone()))
    }

    pub fn call_count(&self) -> usize {
        self.queries.lock().unwrap().len()
    }

    pub fn queries(&self) -> Vec<GraphqlQuery> {
        self.queries.lock().unwrap().clone()
    }
}

#[async_trait]
impl QueryExecutor for RecordingExecutor {
    async fn execute(&self, query: GraphqlQuery) -> Result<Value, QueryError> {
        self.queries.lock().unwrap().push(query);
        match self.reply.as_ref() {
            Reply::Data(data) => Ok(data.clone()),
            Reply::Fail(make_error) => Err(make_error()),
        }
    }
}
