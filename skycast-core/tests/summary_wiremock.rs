//! HTTP-level tests for the text-generation client: happy path, fail-closed
//! degradation, and bounded retry.

use skycast_core::config::SummaryConfig;
use skycast_core::model::CurrentConditions;
use skycast_core::retry::RetryConfig;
use skycast_core::summary::{GeminiClient, Summarizer};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn test_client(server: &MockServer) -> GeminiClient {
    let config = SummaryConfig {
        api_key: Some("GEN_KEY".to_string()),
        base_url: server.uri(),
        model: "gemini-pro".to_string(),
        max_prompt_words: 50,
        timeout_secs: 5,
        retry: RetryConfig::new(2, 1, 2),
    };
    GeminiClient::new(&config).expect("client builds from test config")
}

fn sample_conditions() -> CurrentConditions {
    CurrentConditions {
        temperature_c: Some(21.5),
        sky_text: Some("Partly Cloudy".to_string()),
        uv_index_text: Some("High".to_string()),
        ..CurrentConditions::default()
    }
}

fn generation_response(text: &str) -> serde_json::Value {
    serde_json::json!({
        "candidates": [
            { "content": { "parts": [ { "text": text } ] } }
        ]
    })
}

#[tokio::test]
async fn summarize_returns_generated_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-pro:generateContent"))
        .and(query_param("key", "GEN_KEY"))
        .respond_with(ResponseTemplate::new(200).set_body_json(generation_response(
            "Light jacket weather; sunscreen recommended.",
        )))
        .mount(&server)
        .await;

    let text = test_client(&server).summarize(&sample_conditions()).await;

    assert_eq!(text, "Light jacket weather; sunscreen recommended.");
}

#[tokio::test]
async fn auth_failure_degrades_to_message_without_retry() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-pro:generateContent"))
        .respond_with(ResponseTemplate::new(403).set_body_string("API key invalid"))
        .expect(1)
        .mount(&server)
        .await;

    let text = test_client(&server).summarize(&sample_conditions()).await;

    assert!(text.starts_with("Weather summary unavailable"));
    assert!(text.contains("403"));
}

#[tokio::test]
async fn transient_failures_are_retried_then_degraded() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-pro:generateContent"))
        .respond_with(ResponseTemplate::new(503))
        // 1 initial attempt + 2 retries.
        .expect(3)
        .mount(&server)
        .await;

    let text = test_client(&server).summarize(&sample_conditions()).await;

    assert!(text.starts_with("Weather summary unavailable"));
}

#[tokio::test]
async fn recovery_after_transient_failure_returns_text() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-pro:generateContent"))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-pro:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(generation_response("All clear.")))
        .mount(&server)
        .await;

    let text = test_client(&server).summarize(&sample_conditions()).await;

    assert_eq!(text, "All clear.");
}

#[tokio::test]
async fn malformed_generation_response_degrades_to_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/models/gemini-pro:generateContent"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&server)
        .await;

    let text = test_client(&server).summarize(&sample_conditions()).await;

    assert!(text.starts_with("Weather summary unavailable"));
    assert!(text.contains("no text"));
}
