//! Comms subsystem — manages all external I/O channels.
//!
//! # Architecture
//!
//! Each channel (console, HTTP) implements [`Component`] and is spawned as an
//! independent concurrent task by [`start`] via [`spawn_components`].
//! Channels capture their shared [`Arc<CommsState>`] at construction time.

mod state;
#[cfg(feature = "channel-pty")]
pub mod pty;
#[cfg(feature = "channel-axum")]
pub mod axum_channel;

pub use state::CommsState;

use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::config::Config;
use crate::subsystems::agents::WeatherAgent;
use crate::subsystems::runtime::{Component, SubsystemHandle, spawn_components};

// ── start ───────────────────────────────────────────────────────────────────

/// Spawn all configured comms channels and return a [`SubsystemHandle`].
///
/// If any channel exits with an error the shared `shutdown` token is
/// cancelled so siblings stop cooperatively. The handle resolves when all
/// channels have exited.
pub fn start(config: &Config, agent: Arc<WeatherAgent>, shutdown: CancellationToken) -> SubsystemHandle {
    let state = Arc::new(CommsState::new(agent));

    let mut components: Vec<Box<dyn Component>> = Vec::new();

    #[cfg(feature = "channel-pty")]
    {
        if config.comms_pty_should_load() {
            info!("loading console channel");
            components.push(Box::new(pty::PtyChannel::new("pty0", state.clone())));
        }
    }

    #[cfg(feature = "channel-axum")]
    {
        if config.comms_http_should_load() {
            info!(bind = %config.comms.http.bind, "loading http channel");
            components.push(Box::new(axum_channel::AxumChannel::new(
                "http0",
                config.comms.http.bind.clone(),
                config.app.url.clone(),
                state.clone(),
            )));
        }
    }

    if components.is_empty() {
        info!("no comms channels configured");
    }

    spawn_components(components, shutdown)
}
