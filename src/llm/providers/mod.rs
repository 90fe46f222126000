//! LLM provider implementations.
//!
//! `build(config, api_key, app)` is the factory — called once at startup.
//! Adding a new backend = new module + new match arm.

pub mod dummy;
pub mod openai_compatible;

use crate::config::{AppIdentity, LlmConfig};
use crate::llm::{LlmProvider, ProviderError};

/// Env var the API key is read from; named in the startup error.
pub const API_KEY_VAR: &str = "OPENROUTER_API_KEY";

/// Construct a `LlmProvider` from config and an optional API key.
///
/// The OpenAI-compatible provider refuses to start without a key; the dummy
/// provider ignores it.
pub fn build(
    config: &LlmConfig,
    api_key: Option<String>,
    app: &AppIdentity,
) -> Result<LlmProvider, ProviderError> {
    match config.provider.as_str() {
        "dummy" => Ok(LlmProvider::Dummy(dummy::DummyProvider)),
        "openai" | "openai-compatible" | "openrouter" => {
            let api_key = api_key
                .filter(|k| !k.trim().is_empty())
                .ok_or(ProviderError::MissingApiKey(API_KEY_VAR))?;
            let oai = &config.openai;
            let p = openai_compatible::OpenAiCompatibleProvider::new(
                oai.api_base_url.clone(),
                oai.model.clone(),
                oai.temperature,
                oai.timeout_seconds,
                api_key,
            )?
            .with_app_identity(&app.url, &app.name);
            Ok(LlmProvider::OpenAiCompatible(p))
        }
        _ => Err(ProviderError::UnknownProvider(config.provider.clone())),
    }
}
