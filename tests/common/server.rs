//! Test server lifecycle management
//!
//! Each test gets an isolated MCP server backed by its own fake indexer.

use super::constants::*;
use super::indexer::FakeIndexer;
use midnight_mcp::client::McpHttpClient;
use midnight_mcp::graphql::{GraphqlClient, QueryExecutor};
use midnight_mcp::server::{make_app, RequestsLoggingLevel, ServerConfig};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

/// Test server instance
///
/// When dropped, the server and its fake indexer shut down.
pub struct TestServer {
    /// Base URL for making requests (e.g., "http://127.0.0.1:12345")
    pub base_url: String,

    /// Full URL of the MCP endpoint
    pub mcp_url: String,

    pub indexer: FakeIndexer,

    _shutdown_tx: Option<tokio::sync::oneshot::Sender<()>>,
}

impl TestServer {
    /// Spawns a new test server on a random port
    pub async fn spawn() -> Self {
        let indexer = FakeIndexer::spawn().await;
        let executor: Arc<dyn QueryExecutor> = Arc::new(
            GraphqlClient::new(indexer.graphql_url(), 5).expect("Failed to create GraphQL client"),
        );

        // Bind to random port
        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");

        let port = listener
            .local_addr()
            .expect("Failed to get local address")
            .port();

        let base_url = format!("http://127.0.0.1:{}", port);

        let config = ServerConfig {
            port,
            bind_address: "127.0.0.1".to_string(),
            requests_logging_level: RequestsLoggingLevel::None,
            ..Default::default()
        };
        let mcp_url = format!("{}{}", base_url, config.mcp_path);

        let app = make_app(config, executor).expect("Failed to build app");

        let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel::<()>();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .expect("Server failed");
        });

        let server = Self {
            base_url,
            mcp_url,
            indexer,
            _shutdown_tx: Some(shutdown_tx),
        };

        server.wait_for_ready().await;

        server
    }

    /// Initialized MCP client pointed at this server
    #[allow(dead_code)]
    pub async fn client(&self) -> McpHttpClient {
        let client = McpHttpClient::new(self.mcp_url.clone(), 10).expect("Failed to create client");
        client.initialize().await.expect("Failed to initialize");
        client
    }

    /// Waits for the server to become ready by polling the banner endpoint
    async fn wait_for_ready(&self) {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(100))
            .build()
            .expect("Failed to build reqwest client");

        let start = std::time::Instant::now();
        let timeout = Duration::from_millis(SERVER_READY_TIMEOUT_MS);

        loop {
            if start.elapsed() > timeout {
                panic!(
                    "Server did not become ready within {}ms",
                    SERVER_READY_TIMEOUT_MS
                );
            }

            match client.get(format!("{}/", self.base_url)).send().await {
                Ok(response) if response.status().is_success() => return,
                _ => {
                    tokio::time::sleep(Duration::from_millis(SERVER_READY_POLL_INTERVAL_MS)).await;
                }
            }
        }
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        if let Some(tx) = self._shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}
