//! End-to-end pipeline tests: real provider and weather clients against a
//! mocked LLM endpoint and a mocked Open-Meteo.

use sanchai_weather::config::{AppIdentity, LlmConfig, OpenAiConfig, WeatherConfig};
use sanchai_weather::llm::providers;
use sanchai_weather::subsystems::agents::{AgentError, EMPTY_INPUT_REPLY, WeatherAgent};
use sanchai_weather::subsystems::tools::WeatherTool;
use serde_json::json;
use wiremock::matchers::{body_string_contains, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const CHAT_PATH: &str = "/v1/chat/completions";
const CLASSIFIER_MARKER: &str = "intent classifier";
const ANSWER_MARKER: &str = "User question:";

fn agent(server: &MockServer) -> WeatherAgent {
    let app = AppIdentity { name: "SanchAI Weather".into(), url: "http://localhost:5173".into() };
    let llm = LlmConfig {
        provider: "openai".into(),
        openai: OpenAiConfig {
            api_base_url: format!("{}{CHAT_PATH}", server.uri()),
            model: "openai/gpt-4o-mini".into(),
            temperature: 0.2,
            timeout_seconds: 5,
        },
    };
    let provider = providers::build(&llm, Some("sk-test".into()), &app).unwrap();
    let weather = WeatherTool::new(&WeatherConfig {
        geocoding_url: format!("{}/v1/search", server.uri()),
        forecast_url: format!("{}/v1/forecast", server.uri()),
        timeout_seconds: 2,
    })
    .unwrap();
    WeatherAgent::new(provider, weather, &app.name)
}

fn completion(content: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "choices": [{ "message": { "role": "assistant", "content": content } }]
    }))
}

async fn mount_classifier(server: &MockServer, response: ResponseTemplate) {
    Mock::given(method("POST"))
        .and(path(CHAT_PATH))
        .and(body_string_contains(CLASSIFIER_MARKER))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn weather_question_is_answered_from_real_data() {
    let server = MockServer::start().await;
    mount_classifier(&server, completion(r#"{"is_weather": true, "city": "Pune"}"#)).await;

    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(query_param("name", "Pune"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [{
            "name": "Pune", "latitude": 18.52, "longitude": 73.86, "country_code": "IN"
        }]})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "current_weather": {
            "temperature": 26.5, "windspeed": 10.2, "time": "2024-01-01T12:00"
        }})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(CHAT_PATH))
        .and(body_string_contains(ANSWER_MARKER))
        .and(body_string_contains(
            "Current weather for Pune, IN: 26.5°C, wind 10.2 km/h (as of 2024-01-01T12:00).",
        ))
        .respond_with(completion("It's 26.5°C in Pune with a light breeze."))
        .expect(1)
        .mount(&server)
        .await;

    let answer = agent(&server).run("What is the weather of Pune?").await.unwrap();
    assert_eq!(answer, "It's 26.5°C in Pune with a light breeze.");
}

#[tokio::test]
async fn non_weather_question_never_touches_open_meteo() {
    let server = MockServer::start().await;
    mount_classifier(&server, completion(r#"{"is_weather": false, "city": ""}"#)).await;

    Mock::given(method("GET")).respond_with(ResponseTemplate::new(200)).expect(0).mount(&server).await;
    Mock::given(method("POST"))
        .and(path(CHAT_PATH))
        .and(body_string_contains("Real weather data (may be null): null"))
        .respond_with(completion("Why did the cloud break up? It needed space."))
        .expect(1)
        .mount(&server)
        .await;

    let answer = agent(&server).run("Tell me a joke").await.unwrap();
    assert!(answer.contains("cloud"), "{answer}");
}

#[tokio::test]
async fn empty_input_makes_no_calls() {
    let server = MockServer::start().await;
    Mock::given(wiremock::matchers::any())
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let a = agent(&server);
    assert_eq!(a.run("").await.unwrap(), EMPTY_INPUT_REPLY);
    assert_eq!(a.run("   ").await.unwrap(), EMPTY_INPUT_REPLY);
}

#[tokio::test]
async fn malformed_classifier_output_falls_back_to_keywords() {
    let server = MockServer::start().await;
    mount_classifier(&server, completion("Sure! The city is Delhi.")).await;

    // Heuristic intents carry no city; the whole question is geocoded.
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(query_param("name", "Do I need a jacket in Delhi?"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(CHAT_PATH))
        .and(body_string_contains(ANSWER_MARKER))
        .and(body_string_contains("couldn't find weather data for 'Do I need a jacket in Delhi?'"))
        .respond_with(completion("I couldn't find that place."))
        .expect(1)
        .mount(&server)
        .await;

    let answer = agent(&server).run("Do I need a jacket in Delhi?").await.unwrap();
    assert_eq!(answer, "I couldn't find that place.");
}

#[tokio::test]
async fn classifier_outage_still_produces_an_answer() {
    let server = MockServer::start().await;
    mount_classifier(
        &server,
        ResponseTemplate::new(503).set_body_json(json!({ "error": { "message": "overloaded" } })),
    )
    .await;
    Mock::given(method("POST"))
        .and(path(CHAT_PATH))
        .and(body_string_contains(ANSWER_MARKER))
        .respond_with(completion("Here is a joke."))
        .expect(1)
        .mount(&server)
        .await;

    let answer = agent(&server).run("Tell me a joke").await.unwrap();
    assert_eq!(answer, "Here is a joke.");
}

#[tokio::test]
async fn synthesis_failure_is_an_error() {
    let server = MockServer::start().await;
    mount_classifier(&server, completion(r#"{"is_weather": false, "city": ""}"#)).await;
    Mock::given(method("POST"))
        .and(path(CHAT_PATH))
        .and(body_string_contains(ANSWER_MARKER))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = agent(&server).run("Tell me a joke").await.unwrap_err();
    assert!(matches!(err, AgentError::Llm(_)), "{err:?}");
}

#[tokio::test]
async fn synthesized_answer_is_returned_unmodified() {
    for reply in ["  x\n", ""] {
        let server = MockServer::start().await;
        mount_classifier(&server, completion(r#"{"is_weather": false}"#)).await;
        Mock::given(method("POST"))
            .and(path(CHAT_PATH))
            .and(body_string_contains(ANSWER_MARKER))
            .respond_with(completion(reply))
            .expect(1)
            .mount(&server)
            .await;

        let answer = agent(&server).run("Tell me a joke").await.unwrap();
        assert_eq!(answer, reply);
    }
}

#[tokio::test]
async fn blank_classifier_reply_falls_back_to_keywords() {
    let server = MockServer::start().await;
    mount_classifier(&server, completion("  \n")).await;
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(query_param("name", "Will it rain today?"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "results": [] })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(CHAT_PATH))
        .and(body_string_contains(ANSWER_MARKER))
        .respond_with(completion("No data."))
        .expect(1)
        .mount(&server)
        .await;

    assert_eq!(agent(&server).run("Will it rain today?").await.unwrap(), "No data.");
}
