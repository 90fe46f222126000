//! HTTP comms channel on axum.
//!
//! Routes:
//! - `POST /chat`   — `{ "message": "..." }` → `{ "answer": "..." }`
//! - `GET  /health` — liveness check
//!
//! CORS admits the configured frontend origin only, with credentials.

mod api;

use std::sync::Arc;

use axum::Router;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use tokio::net::TcpListener;
use tokio_util::sync::CancellationToken;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tracing::info;

use crate::error::AppError;
use crate::subsystems::runtime::{Component, ComponentFuture};
use super::state::CommsState;

/// State handed to every handler.
#[derive(Clone)]
pub struct AxumState {
    pub comms: Arc<CommsState>,
    pub channel_id: String,
}

/// Build the router. Fails when `allowed_origin` is not a valid header value.
pub fn router(state: AxumState, allowed_origin: &str) -> Result<Router, AppError> {
    let origin = HeaderValue::from_str(allowed_origin)
        .map_err(|e| AppError::Config(format!("invalid CORS origin '{allowed_origin}': {e}")))?;

    // Mirroring (not `Any`) is required when credentials are allowed.
    let cors = CorsLayer::new()
        .allow_origin(origin)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true);

    Ok(Router::new()
        .route("/chat", post(api::chat))
        .route("/health", get(api::health))
        .layer(cors)
        .with_state(state))
}

pub struct AxumChannel {
    channel_id: String,
    bind_addr: String,
    allowed_origin: String,
    state: Arc<CommsState>,
}

impl AxumChannel {
    pub fn new(
        channel_id: impl Into<String>,
        bind_addr: impl Into<String>,
        allowed_origin: impl Into<String>,
        state: Arc<CommsState>,
    ) -> Self {
        Self {
            channel_id: channel_id.into(),
            bind_addr: bind_addr.into(),
            allowed_origin: allowed_origin.into(),
            state,
        }
    }
}

impl Component for AxumChannel {
    fn id(&self) -> &str {
        &self.channel_id
    }

    fn run(self: Box<Self>, shutdown: CancellationToken) -> ComponentFuture {
        Box::pin(run_axum(*self, shutdown))
    }
}

async fn run_axum(channel: AxumChannel, shutdown: CancellationToken) -> Result<(), AppError> {
    let AxumChannel { channel_id, bind_addr, allowed_origin, state } = channel;

    let app = router(
        AxumState { comms: state, channel_id: channel_id.clone() },
        &allowed_origin,
    )?;

    let listener = TcpListener::bind(&bind_addr)
        .await
        .map_err(|e| AppError::Comms(format!("http bind failed on {bind_addr}: {e}")))?;

    info!(%channel_id, %bind_addr, %allowed_origin, "http channel listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await
        .map_err(|e| AppError::Comms(format!("http server error: {e}")))?;

    info!(%channel_id, "http channel shut down");
    Ok(())
}
