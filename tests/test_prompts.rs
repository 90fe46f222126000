//! Tests for prompt files under config/prompts

use std::fs;

#[test]
fn test_intent_prompt_file_exists() {
    let path = "config/prompts/intent_classifier.md";
    assert!(fs::metadata(path).is_ok(), "intent_classifier.md prompt file missing");
}

#[test]
fn test_answer_prompt_files_exist() {
    for path in ["config/prompts/answer_system.md", "config/prompts/answer_user.md"] {
        assert!(fs::metadata(path).is_ok(), "{path} prompt file missing");
    }
}

#[test]
fn test_intent_prompt_demands_json() {
    let text = fs::read_to_string("config/prompts/intent_classifier.md").unwrap();
    assert!(text.contains("{{app_name}}"), "intent_classifier.md should contain {{app_name}} variable");
    assert!(text.contains(r#"{"is_weather": true/false, "city": "<city or empty string>"}"#));
}

#[test]
fn test_answer_system_forbids_guessing() {
    let text = fs::read_to_string("config/prompts/answer_system.md").unwrap();
    assert!(text.contains("{{app_name}}"), "answer_system.md should contain {{app_name}} variable");
    assert!(text.contains("MUST NOT guess"));
}

#[test]
fn test_answer_user_template_vars() {
    let text = fs::read_to_string("config/prompts/answer_user.md").unwrap();
    assert!(text.contains("{{question}}"), "answer_user.md should contain {{question}} variable");
    assert!(text.contains("{{weather_data}}"), "answer_user.md should contain {{weather_data}} variable");
}
