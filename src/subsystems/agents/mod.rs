//! Agent pipeline — text in, text out.
//!
//! ```text
//! input ─▶ IntentClassifier ─▶ (weather?) WeatherTool ─▶ AnswerSynthesizer ─▶ answer
//! ```
//!
//! [`WeatherAgent`] owns only immutable clients, so one instance is shared
//! as `Arc<WeatherAgent>` by every channel and every concurrent request.
//! Each [`run`](WeatherAgent::run) is independent and strictly sequential.

pub mod answer;
pub mod intent;
pub mod prompt;

use thiserror::Error;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::AppError;
use crate::llm::{LlmProvider, ProviderError, providers};
use crate::subsystems::tools::WeatherTool;

pub use answer::AnswerSynthesizer;
pub use intent::{Intent, IntentClassifier};

/// Reply for blank input; no model or network call is made.
pub const EMPTY_INPUT_REPLY: &str = "Please provide a question.";

/// Infrastructure failures only. Weather problems are answers, not errors.
#[derive(Debug, Error)]
pub enum AgentError {
    #[error("llm error: {0}")]
    Llm(#[from] ProviderError),
}

#[derive(Debug, Clone)]
pub struct WeatherAgent {
    classifier: IntentClassifier,
    weather: WeatherTool,
    synthesizer: AnswerSynthesizer,
}

impl WeatherAgent {
    pub fn new(provider: LlmProvider, weather: WeatherTool, app_name: &str) -> Self {
        Self {
            classifier: IntentClassifier::new(provider.clone(), app_name),
            weather,
            synthesizer: AnswerSynthesizer::new(provider, app_name),
        }
    }

    /// Build the provider and weather tool from config. Fails at startup when
    /// a keyed provider has no API key.
    pub fn from_config(config: &Config) -> Result<Self, AppError> {
        let provider = providers::build(&config.llm, config.llm_api_key.clone(), &config.app)
            .map_err(|e| AppError::Config(e.to_string()))?;
        let weather = WeatherTool::new(&config.weather)?;
        info!(provider = provider.name(), "weather agent ready");
        Ok(Self::new(provider, weather, &config.app.name))
    }

    /// Answer one user message.
    pub async fn run(&self, input: &str) -> Result<String, AgentError> {
        let input = input.trim();
        if input.is_empty() {
            return Ok(EMPTY_INPUT_REPLY.to_string());
        }

        let intent = self.classifier.classify(input).await;

        let report = if intent.is_weather() {
            let target = match intent.city() {
                "" => input,
                city => city,
            };
            debug!(%target, "looking up weather");
            Some(self.weather.lookup(target).await)
        } else {
            None
        };

        let answer = self.synthesizer.synthesize(input, report.as_deref()).await?;
        Ok(answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::WeatherConfig;
    use crate::llm::providers::dummy::DummyProvider;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn agent(server: &MockServer) -> WeatherAgent {
        let weather = WeatherTool::new(&WeatherConfig {
            geocoding_url: format!("{}/v1/search", server.uri()),
            forecast_url: format!("{}/v1/forecast", server.uri()),
            timeout_seconds: 1,
        })
        .unwrap();
        WeatherAgent::new(LlmProvider::Dummy(DummyProvider), weather, "test")
    }

    #[tokio::test]
    async fn blank_input_short_circuits() {
        let server = MockServer::start().await;
        Mock::given(method("GET")).respond_with(ResponseTemplate::new(200)).expect(0).mount(&server).await;

        let a = agent(&server);
        assert_eq!(a.run("").await.unwrap(), EMPTY_INPUT_REPLY);
        assert_eq!(a.run(" \n\t ").await.unwrap(), EMPTY_INPUT_REPLY);
    }

    #[tokio::test]
    async fn non_weather_query_skips_lookup() {
        let server = MockServer::start().await;
        Mock::given(method("GET")).respond_with(ResponseTemplate::new(200)).expect(0).mount(&server).await;

        let out = agent(&server).run("Tell me a joke").await.unwrap();
        assert!(out.ends_with("Real weather data (may be null): null"), "{out}");
    }

    #[tokio::test]
    async fn heuristic_weather_query_looks_up_raw_input() {
        let server = MockServer::start().await;
        Mock::given(path("/v1/search"))
            .and(query_param("name", "Will it rain today?"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
            .expect(1)
            .mount(&server)
            .await;

        let out = agent(&server).run("  Will it rain today?  ").await.unwrap();
        assert!(out.contains("User question: Will it rain today?"), "{out}");
        assert!(out.contains("couldn't find weather data for 'Will it rain today?'"), "{out}");
    }

    #[test]
    fn from_config_rejects_missing_key() {
        let mut cfg = Config::test_default();
        cfg.llm.provider = "openai".into();
        let err = WeatherAgent::from_config(&cfg).unwrap_err();
        assert!(matches!(err, AppError::Config(_)));
        assert!(err.to_string().contains("OPENROUTER_API_KEY"));
    }

    #[test]
    fn from_config_builds_with_dummy() {
        assert!(WeatherAgent::from_config(&Config::test_default()).is_ok());
    }
}
