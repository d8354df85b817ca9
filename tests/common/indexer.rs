//! Fake ledger indexer
//!
//! Minimal GraphQL endpoint answering the operations the server sends, keyed
//! by operation name. Every received request body is recorded.

#![allow(dead_code)]

use super::constants::*;
use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::post, Json, Router};
use serde_json::{json, Value};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::net::TcpListener;

type Requests = Arc<Mutex<Vec<Value>>>;

pub struct FakeIndexer {
    /// Base URL, e.g. "http://127.0.0.1:12345"
    pub base_url: String,
    requests: Requests,
    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

fn block(height: u64, hash: &str) -> Value {
    json!({
        "hash": hash,
        "height": height,
        "protocolVersion": 1,
        "timestamp": LATEST_BLOCK_TIMESTAMP,
        "author": "author-key",
        "parent": {"hash": "parent-hash"},
        "transactions": [{"id": 1, "hash": TRANSACTION_HASH}]
    })
}

fn respond(body: &Value) -> Value {
    let variables = &body["variables"];
    match body["operationName"].as_str().unwrap_or_default() {
        "LatestBlock" => json!({"data": {"block": {
            "hash": LATEST_BLOCK_HASH,
            "height": LATEST_BLOCK_HEIGHT,
            "timestamp": LATEST_BLOCK_TIMESTAMP
        }}}),
        "LedgerStatus" => json!({"data": {"block": {"height": LATEST_BLOCK_HEIGHT}}}),
        "GetBlock" => {
            let offset = &variables["offset"];
            if offset["hash"] == UNKNOWN_BLOCK_HASH {
                json!({
                    "data": null,
                    "errors": [{"message": UNKNOWN_BLOCK_ERROR, "path": ["block"]}]
                })
            } else if let Some(height) = offset["height"].as_u64() {
                json!({"data": {"block": block(height, "by-height")}})
            } else {
                let hash = offset["hash"].as_str().unwrap_or_default();
                json!({"data": {"block": block(7, hash)}})
            }
        }
        "GetTransactions" => json!({"data": {"transactions": [{
            "id": 1,
            "hash": TRANSACTION_HASH,
            "identifiers": ["01"],
            "contractActions": [{"__typename": "ContractCall", "address": CONTRACT_ADDRESS, "entryPoint": "increment"}],
            "transactionResult": {"status": "SUCCESS"}
        }]}}),
        "GetContractAction" => json!({"data": {"contractAction": {
            "__typename": "ContractDeploy",
            "address": variables["address"],
            "state": "00",
            "zswapState": "00",
            "unshieldedBalances": []
        }}}),
        "GetDustGenerationStatus" => {
            let statuses: Vec<Value> = variables["cardanoStakeKeys"]
                .as_array()
                .cloned()
                .unwrap_or_default()
                .into_iter()
                .map(|key| json!({"cardanoStakeKey": key, "registered": key == STAKE_KEY_1}))
                .collect();
            json!({"data": {"dustGenerationStatus": statuses}})
        }
        other => json!({"errors": [{"message": format!("Unknown operation {}", other)}]}),
    }
}

async fn graphql(State(requests): State<Requests>, Json(body): Json<Value>) -> Json<Value> {
    let response = respond(&body);
    requests.lock().unwrap().push(body);
    Json(response)
}

async fn broken() -> impl IntoResponse {
    (StatusCode::BAD_GATEWAY, "upstream down")
}

async fn slow(State(requests): State<Requests>, Json(body): Json<Value>) -> Json<Value> {
    tokio::time::sleep(Duration::from_secs(5)).await;
    graphql(State(requests), Json(body)).await
}

impl FakeIndexer {
    pub async fn spawn() -> Self {
        let requests: Requests = Arc::new(Mutex::new(Vec::new()));

        let app = Router::new()
            .route("/graphql", post(graphql))
            .route("/broken", post(broken))
            .route("/slow", post(slow))
            .with_state(requests.clone());

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();
        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Fake indexer failed");
        });

        Self {
            base_url: format!("http://127.0.0.1:{}", port),
            requests,
            _shutdown_tx: Some(shutdown_tx),
        }
    }

    pub fn graphql_url(&self) -> String {
        format!("{}/graphql", self.base_url)
    }

    /// Request bodies received so far
    pub fn requests(&self) -> Vec<Value> {
        self.requests.lock().unwrap().clone()
    }
}

impl Drop for FakeIndexer {
    fn drop(&mut self) {
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
