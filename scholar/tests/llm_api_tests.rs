mod common;

use std::sync::Arc;

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use common::{agent_with, init_test_logger};
use scholar::config::LlmConfig;
use scholar::error::ScholarError;
use scholar::llm::{
    CompletionRequest, CompletionResult, CompletionService, LlmApiClient, SummaryLength,
};

fn llm_config_with_base_url(model: &str, base_url: String) -> LlmConfig {
    LlmConfig {
        model: model.to_string(),
        api_key: Some("test-key".to_string()),
        base_url: Some(base_url),
        timeout_secs: 5,
    }
}

fn completion_request(prompt: &str) -> CompletionRequest {
    CompletionRequest {
        model_id: "openai/gpt-3.5-turbo".to_string(),
        system_instruction: "You are a helpful academic assistant.".to_string(),
        user_prompt: prompt.to_string(),
        max_tokens: 300,
        temperature: 0.7,
    }
}

fn completion_body(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "created": 1,
        "model": "gpt-3.5-turbo",
        "choices": [
            {
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": content
                },
                "finish_reason": "stop"
            }
        ],
        "usage": {
            "prompt_tokens": 1,
            "completion_tokens": 1,
            "total_tokens": 2
        }
    })
}

fn api_error_body(message: &str, error_type: &str, code: &str) -> serde_json::Value {
    json!({
        "error": {
            "message": message,
            "type": error_type,
            "param": serde_json::Value::Null,
            "code": code
        }
    })
}

async fn client_for(server: &MockServer) -> LlmApiClient {
    init_test_logger();
    let config = llm_config_with_base_url("openai/gpt-3.5-turbo", format!("{}/v1", server.uri()));
    LlmApiClient::new(&config).expect("client should be created")
}

#[tokio::test]
async fn test_complete_returns_response_content() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("Hello from mock")))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;

    let result = client.complete_request(&completion_request("Hello")).await;

    match result {
        Ok(value) => assert_eq!(value, "Hello from mock"),
        Err(error) => panic!("Expected completion to succeed, got: {error}"),
    }
}

#[tokio::test]
async fn test_request_body_carries_generation_parameters() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_partial_json(json!({
            "model": "gpt-3.5-turbo",
            "max_tokens": 300,
            "messages": [
                {"role": "system", "content": "You are a helpful academic assistant."},
                {"role": "user", "content": "What is entropy?"}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("Disorder.")))
        .expect(1)
        .mount(&server)
        .await;

    let client = client_for(&server).await;

    let result = client.complete(&completion_request("What is entropy?")).await;

    assert_eq!(result, CompletionResult::success("Disorder."));

    let received = server
        .received_requests()
        .await
        .expect("request recording should be enabled");
    let body: serde_json::Value = received[0].body_json().expect("body should be JSON");
    let temperature = body["temperature"].as_f64().expect("temperature should be set");
    assert!((temperature - 0.7).abs() < 1e-6);
}

#[tokio::test]
async fn test_auth_error_becomes_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(api_error_body(
            "Invalid API key",
            "invalid_request_error",
            "invalid_api_key",
        )))
        .mount(&server)
        .await;

    let client = client_for(&server).await;

    match client.complete_request(&completion_request("Auth test")).await {
        Err(ScholarError::LlmAuth(message)) => {
            assert!(message.contains("Invalid API key"));
        }
        other => panic!("Expected LlmAuth error, got: {other:?}"),
    }

    match client.complete(&completion_request("Auth test")).await {
        CompletionResult::Failure { message } => {
            assert!(message.to_lowercase().contains("authentication failed"));
        }
        other => panic!("Expected failure, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_quota_error_is_rate_limit() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(429).set_body_json(api_error_body(
            "You exceeded your current quota",
            "insufficient_quota",
            "insufficient_quota",
        )))
        .mount(&server)
        .await;

    let client = client_for(&server).await;

    let result = client.complete_request(&completion_request("Quota test")).await;

    assert!(matches!(
        result,
        Err(ScholarError::LlmRateLimit { retry_after: None })
    ));
}

#[tokio::test]
async fn test_blank_content_is_trimmed_to_empty() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion_body("   ")))
        .mount(&server)
        .await;

    let client = client_for(&server).await;
    let raw = client
        .complete_request(&completion_request("Empty test"))
        .await
        .expect("blank content is still a completion");
    assert_eq!(raw, "   ");

    let agent = agent_with(Arc::new(client));
    let summary = agent
        .summarize_text("Some text.", SummaryLength::Brief)
        .await;
    assert_eq!(summary, "");
}

#[tokio::test]
async fn test_missing_content_is_failure() {
    let server = MockServer::start().await;
    let mut body = completion_body("unused");
    body["choices"][0]["message"]["content"] = serde_json::Value::Null;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(body))
        .mount(&server)
        .await;

    let client = client_for(&server).await;

    match client.complete_request(&completion_request("Null test")).await {
        Err(ScholarError::Llm(message)) => assert!(message.contains("no content")),
        other => panic!("Expected Llm error, got: {other:?}"),
    }
}

#[tokio::test]
async fn test_agent_over_http_end_to_end() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(body_partial_json(json!({ "max_tokens": 80 })))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(completion_body("  Cells make energy.  ")),
        )
        .expect(1)
        .mount(&server)
        .await;

    let agent = agent_with(Arc::new(client_for(&server).await));

    let summary = agent
        .summarize_text("Mitochondria produce ATP.", SummaryLength::Brief)
        .await;

    assert_eq!(summary, "Cells make energy.");
}

#[tokio::test]
async fn test_agent_over_http_renders_failure() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_json(api_error_body(
            "Invalid API key",
            "invalid_request_error",
            "invalid_api_key",
        )))
        .mount(&server)
        .await;

    let agent = agent_with(Arc::new(client_for(&server).await));

    let answer = agent.answer_question("What is DNA?").await;

    assert!(answer.starts_with("An error occurred while generating response: "));
    assert!(answer.contains("Invalid API key"));
}
