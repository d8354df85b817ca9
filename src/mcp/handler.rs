//! MCP HTTP Handler
//!
//! Serves MCP over plain HTTP: each POST carries one JSON-RPC message and gets
//! its response back either as `application/json` or as a single
//! `text/event-stream` event, depending on what the client accepts.

use std::convert::Infallible;

use axum::{
    body::Bytes,
    extract::State,
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{
        sse::{Event, Sse},
        IntoResponse, Response,
    },
    Json,
};
use tracing::{debug, error};
use uuid::Uuid;

use super::dispatch::{handle_request, parse_message, McpState};
use super::protocol::{methods, McpError, McpResponse};

pub const SESSION_ID_HEADER: &str = "mcp-session-id";

const EVENT_STREAM: &str = "text/event-stream";
const APPLICATION_JSON: &str = "application/json";

/// Only answer with SSE when the client asks for it and can't take JSON.
fn wants_event_stream(headers: &HeaderMap) -> bool {
    let accept = headers
        .get_all(header::ACCEPT)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(','))
        .map(|v| v.split(';').next().unwrap_or("").trim().to_ascii_lowercase())
        .collect::<Vec<_>>();

    accept.iter().any(|m| m == EVENT_STREAM) && !accept.iter().any(|m| m == APPLICATION_JSON)
}

/// POST handler for the MCP endpoint
pub async fn mcp_post_handler(
    State(mcp_state): State<McpState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let text = match std::str::from_utf8(&body) {
        Ok(text) => text,
        Err(e) => {
            let response = McpResponse::error(None, McpError::ParseError(e.to_string()));
            return (StatusCode::BAD_REQUEST, Json(response)).into_response();
        }
    };

    let request = match parse_message(text) {
        Ok(request) => request,
        Err(response) => {
            debug!("Rejected malformed MCP message");
            return (StatusCode::BAD_REQUEST, Json(response)).into_response();
        }
    };

    let is_initialize = request.method == methods::INITIALIZE;

    let response = match handle_request(&mcp_state, request).await {
        Some(response) => response,
        None => return StatusCode::ACCEPTED.into_response(),
    };

    let opens_session = is_initialize && response.error.is_none();

    let mut http_response = if wants_event_stream(&headers) {
        match serde_json::to_string(&response) {
            Ok(json) => {
                let event = Event::default().event("message").data(json);
                let stream = futures::stream::once(async move { Ok::<_, Infallible>(event) });
                Sse::new(stream).into_response()
            }
            Err(e) => {
                error!("Failed to serialize MCP response: {}", e);
                return StatusCode::INTERNAL_SERVER_ERROR.into_response();
            }
        }
    } else {
        Json(response).into_response()
    };

    if opens_session {
        let session_id = Uuid::new_v4().to_string();
        if let Ok(value) = HeaderValue::from_str(&session_id) {
            http_response.headers_mut().insert(SESSION_ID_HEADER, value);
        }
    }

    http_response
}

/// GET on the MCP endpoint: there is no server-initiated stream.
pub async fn mcp_get_handler() -> impl IntoResponse {
    (
        StatusCode::METHOD_NOT_ALLOWED,
        [(header::ALLOW, "POST")],
        "Server-initiated streams are not supported",
    )
}
