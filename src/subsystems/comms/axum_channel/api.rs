//! Axum handlers for `/chat` and `/health`.

use std::time::Duration;

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::warn;

use super::AxumState;

const CHAT_TIMEOUT: Duration = Duration::from_secs(120);
const EMPTY_MESSAGE_DETAIL: &str = "Message must not be empty.";

// ── Request / response types ──────────────────────────────────────────────────

#[derive(Deserialize)]
pub(super) struct ChatRequest {
    message: String,
}

#[derive(Serialize)]
pub(super) struct ChatResponse {
    answer: String,
}

fn json_detail(status: StatusCode, detail: impl std::fmt::Display) -> Response {
    (status, Json(json!({ "detail": detail.to_string() }))).into_response()
}

// ── Handlers ──────────────────────────────────────────────────────────────────

/// GET /health
pub(super) async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// POST /chat
pub(super) async fn chat(State(state): State<AxumState>, Json(req): Json<ChatRequest>) -> Response {
    let message = req.message.trim();
    if message.is_empty() {
        return json_detail(StatusCode::BAD_REQUEST, EMPTY_MESSAGE_DETAIL);
    }

    match tokio::time::timeout(CHAT_TIMEOUT, state.comms.send_message(&state.channel_id, message)).await {
        Ok(Ok(answer)) => (StatusCode::OK, Json(ChatResponse { answer })).into_response(),
        Ok(Err(e)) => {
            warn!(channel_id = %state.channel_id, "chat request failed: {e}");
            json_detail(StatusCode::INTERNAL_SERVER_ERROR, e)
        }
        Err(_) => {
            warn!(channel_id = %state.channel_id, "chat request timed out");
            json_detail(StatusCode::GATEWAY_TIMEOUT, "request timed out")
        }
    }
}
