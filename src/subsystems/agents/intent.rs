//! Weather intent classification.
//!
//! The model is asked for `{"is_weather": bool, "city": string}`. Its output
//! is untrusted text, so [`parse_intent`] is a fallible parse and anything it
//! rejects goes to the keyword heuristic instead.

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::llm::{ChatMessage, LlmProvider};
use super::prompt::{INTENT_CLASSIFIER, PromptBuilder};

/// Substrings that mark a query as weather-related when the model is no help.
const WEATHER_KEYWORDS: [&str; 4] = ["weather", "umbrella", "rain", "jacket"];

/// Outcome of classification, tagged by where the decision came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// The model returned well-formed JSON.
    Model { is_weather: bool, city: String },
    /// Model output was unusable; decided by keyword match. Never has a city.
    Heuristic { is_weather: bool },
}

impl Intent {
    pub fn is_weather(&self) -> bool {
        match self {
            Intent::Model { is_weather, .. } | Intent::Heuristic { is_weather } => *is_weather,
        }
    }

    /// Extracted city, empty when none.
    pub fn city(&self) -> &str {
        match self {
            Intent::Model { city, .. } => city,
            Intent::Heuristic { .. } => "",
        }
    }

    fn source(&self) -> &'static str {
        match self {
            Intent::Model { .. } => "model",
            Intent::Heuristic { .. } => "heuristic",
        }
    }
}

/// Parse raw model output. `None` unless the whole text is a JSON object.
pub fn parse_intent(raw: &str) -> Option<Intent> {
    let value: Value = serde_json::from_str(raw).ok()?;
    let object = value.as_object()?;
    Some(Intent::Model {
        is_weather: object.get("is_weather").is_some_and(truthy),
        city: city_field(object),
    })
}

/// Keyword fallback over the user's own text.
pub fn heuristic_intent(query: &str) -> Intent {
    let lowered = query.to_lowercase();
    Intent::Heuristic {
        is_weather: WEATHER_KEYWORDS.iter().any(|k| lowered.contains(k)),
    }
}

// Loose truthiness: models sometimes answer "true", 1 or "yes" instead of `true`.
fn truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(a) => !a.is_empty(),
        Value::Object(o) => !o.is_empty(),
    }
}

fn city_field(object: &Map<String, Value>) -> String {
    match object.get("city") {
        None => String::new(),
        Some(v) if !truthy(v) => String::new(),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(other) => other.to_string().trim().to_string(),
    }
}

/// Asks the model whether a query needs the weather tool.
#[derive(Debug, Clone)]
pub struct IntentClassifier {
    provider: LlmProvider,
    system_prompt: String,
}

impl IntentClassifier {
    pub fn new(provider: LlmProvider, app_name: &str) -> Self {
        let system_prompt = PromptBuilder::new()
            .append(INTENT_CLASSIFIER)
            .var("app_name", app_name)
            .build();
        Self { provider, system_prompt }
    }

    /// Messages sent for `query`.
    pub fn build_messages(&self, query: &str) -> [ChatMessage; 2] {
        [ChatMessage::system(self.system_prompt.clone()), ChatMessage::user(query)]
    }

    /// Classify `query`. Never fails: unparseable output and model errors
    /// both fall back to [`heuristic_intent`].
    pub async fn classify(&self, query: &str) -> Intent {
        let intent = match self.provider.complete(&self.build_messages(query)).await {
            Ok(raw) => parse_intent(&raw).unwrap_or_else(|| {
                debug!(raw = %raw, "intent output is not the expected JSON");
                heuristic_intent(query)
            }),
            Err(e) => {
                warn!(error = %e, "intent model call failed");
                heuristic_intent(query)
            }
        };

        debug!(
            source = intent.source(),
            is_weather = intent.is_weather(),
            city = intent.city(),
            "intent classified"
        );
        intent
    }
}
