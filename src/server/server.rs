use anyhow::{Context, Result};
use std::{
    sync::Arc,
    time::{Duration, Instant},
};

use axum::{
    extract::State,
    middleware,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tracing::info;

use super::{log_requests, metrics::metrics_handler, state::ServerState, ServerConfig};
use crate::graphql::QueryExecutor;
use crate::mcp::protocol::{server_version, SERVER_NAME};
use crate::mcp::{create_mcp_state, mcp_get_handler, mcp_post_handler};

fn format_uptime(duration: Duration) -> String {
    let total_seconds = duration.as_secs();

    let days = total_seconds / 86_400;
    let hours = (total_seconds % 86_400) / 3600;
    let minutes = (total_seconds % 3600) / 60;
    let seconds = total_seconds % 60;

    format!("{}d {:02}:{:02}:{:02}", days, hours, minutes, seconds)
}

async fn home(State(state): State<ServerState>) -> String {
    format!(
        "{} {}\nMCP endpoint: POST {}\nUptime: {}\n",
        SERVER_NAME,
        server_version(),
        state.config.mcp_path,
        format_uptime(state.start_time.elapsed())
    )
}

pub fn make_app(config: ServerConfig, executor: Arc<dyn QueryExecutor>) -> Result<Router> {
    let mcp_state = create_mcp_state(executor).context("Failed to register MCP tools")?;

    let state = ServerState {
        config: config.clone(),
        start_time: Instant::now(),
        mcp_state,
    };

    let app: Router = Router::new()
        .route("/", get(home))
        .route(
            &config.mcp_path,
            post(mcp_post_handler).get(mcp_get_handler),
        )
        .layer(middleware::from_fn_with_state(state.clone(), log_requests))
        .with_state(state);

    Ok(app)
}

pub fn make_metrics_app() -> Router {
    Router::new().route("/metrics", get(metrics_handler))
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received");
    }
}

async fn bind(address: &str, port: u16) -> Result<TcpListener> {
    TcpListener::bind(format!("{}:{}", address, port))
        .await
        .with_context(|| format!("Failed to bind {}:{}", address, port))
}

pub async fn run_server(config: ServerConfig, executor: Arc<dyn QueryExecutor>) -> Result<()> {
    let app = make_app(config.clone(), executor)?;
    let listener = bind(&config.bind_address, config.port).await?;
    info!(
        "Ready to serve MCP at {}:{}{}",
        config.bind_address, config.port, config.mcp_path
    );

    let mcp_server = async {
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .context("MCP server failed")
    };

    match config.metrics_port {
        Some(metrics_port) => {
            let metrics_listener = bind(&config.bind_address, metrics_port).await?;
            info!("Metrics available at port {}!", metrics_port);
            let metrics_server = async {
                axum::serve(metrics_listener, make_metrics_app())
                    .with_graceful_shutdown(shutdown_signal())
                    .await
                    .context("Metrics server failed")
            };
            tokio::try_join!(mcp_server, metrics_server)?;
        }
        None => mcp_server.await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mcp::test_support::RecordingExecutor;
    use axum::{body::Body, http::Request, http::StatusCode};
    use tower::ServiceExt;

    fn app(config: ServerConfig) -> Router {
        make_app(config, Arc::new(RecordingExecutor::new())).unwrap()
    }

    async fn body_string(response: axum::response::Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[test]
    fn test_format_uptime() {
        assert_eq!(format_uptime(Duration::from_secs(0)), "0d 00:00:00");
        assert_eq!(format_uptime(Duration::from_secs(90_061)), "1d 01:01:01");
    }

    #[tokio::test]
    async fn test_home_banner() {
        let response = app(ServerConfig::default())
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;
        assert!(body.starts_with("midnight-mcp "));
        assert!(body.contains("POST /sse"));
    }

    #[tokio::test]
    async fn test_custom_mcp_path() {
        let config = ServerConfig {
            mcp_path: "/mcp".to_string(),
            requests_logging_level: super::super::RequestsLoggingLevel::None,
            ..Default::default()
        };
        let request = Request::builder()
            .method("POST")
            .uri("/mcp")
            .body(Body::from(r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#))
            .unwrap();
        let response = app(config.clone()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let request = Request::builder()
            .method("POST")
            .uri("/sse")
            .body(Body::from(r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#))
            .unwrap();
        let response = app(config).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_http_metrics_use_route_labels() {
        super::super::metrics::init_metrics();
        let app = app(ServerConfig {
            requests_logging_level: super::super::RequestsLoggingLevel::None,
            ..Default::default()
        });

        let request = Request::builder()
            .method("POST")
            .uri("/sse")
            .body(Body::from(r#"{"jsonrpc":"2.0","id":1,"method":"ping"}"#))
            .unwrap();
        app.clone().oneshot(request).await.unwrap();

        let request = Request::builder()
            .uri("/no/such/route/4711")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);

        let response = make_metrics_app()
            .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let body = body_string(response).await;
        assert!(body.contains(r#"path="/sse""#));
        assert!(body.contains(r#"path="unmatched""#));
        assert!(!body.contains("/no/such/route/4711"));
    }

    #[tokio::test]
    async fn test_metrics_endpoint() {
        super::super::metrics::init_metrics();
        super::super::metrics::record_tool_call("server_test_tool", "ok", Duration::from_millis(1));

        let response = make_metrics_app()
            .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_string(response).await;
        assert!(body.contains("midnight_mcp_tool_calls_total"));
    }
}
