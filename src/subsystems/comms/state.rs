//! Shared state for comms channels — the capability boundary.
//!
//! Channels receive an `Arc<CommsState>` and can only ask it to answer a
//! message. They never touch the agent's clients directly.

use std::sync::Arc;

use tracing::{Instrument, info_span};
use uuid::Uuid;

use crate::subsystems::agents::{AgentError, WeatherAgent};

pub struct CommsState {
    agent: Arc<WeatherAgent>,
}

impl CommsState {
    pub fn new(agent: Arc<WeatherAgent>) -> Self {
        Self { agent }
    }

    /// Run `content` through the agent pipeline.
    ///
    /// Every call gets its own span with a fresh request id.
    pub async fn send_message(&self, channel_id: &str, content: &str) -> Result<String, AgentError> {
        let span = info_span!("request", request_id = %Uuid::now_v7(), %channel_id);
        self.agent.run(content).instrument(span).await
    }
}
