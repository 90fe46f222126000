//! Final answer synthesis, grounded in weather data when there is some.

use tracing::debug;

use crate::llm::{ChatMessage, LlmProvider, ProviderError};
use super::prompt::{ANSWER_SYSTEM, ANSWER_USER, PromptBuilder};

/// Placeholder rendered into the prompt when no lookup happened.
const NO_WEATHER_DATA: &str = "null";

#[derive(Debug, Clone)]
pub struct AnswerSynthesizer {
    provider: LlmProvider,
    system_prompt: String,
}

impl AnswerSynthesizer {
    pub fn new(provider: LlmProvider, app_name: &str) -> Self {
        let system_prompt = PromptBuilder::new()
            .append(ANSWER_SYSTEM)
            .var("app_name", app_name)
            .build();
        Self { provider, system_prompt }
    }

    /// Messages sent for `question`. `weather` is embedded verbatim.
    pub fn build_messages(&self, question: &str, weather: Option<&str>) -> [ChatMessage; 2] {
        let user = PromptBuilder::new()
            .append(ANSWER_USER)
            .with_vars([
                ("question", question),
                ("weather_data", weather.unwrap_or(NO_WEATHER_DATA)),
            ])
            .build();
        [ChatMessage::system(self.system_prompt.clone()), ChatMessage::user(user)]
    }

    /// One model call; the reply is returned as-is.
    pub async fn synthesize(
        &self,
        question: &str,
        weather: Option<&str>,
    ) -> Result<String, ProviderError> {
        debug!(has_weather = weather.is_some(), "synthesizing answer");
        self.provider.complete(&self.build_messages(question, weather)).await
    }
}
