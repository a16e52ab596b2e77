//! Integration tests for the provider adapters against mocked provider APIs

use investmal::ai::{normalize, BackendRegistry, ModelSwitcher};
use investmal::error::ProviderError;
use investmal::services::llm::{
    BackendAdapter, HttpBackend, ProviderConfig, ProviderKind, SharedBackend,
};
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const TIMEOUT: Duration = Duration::from_secs(2);

fn openai(server: &MockServer, model: &str) -> HttpBackend {
    HttpBackend::new(
        ProviderConfig::OpenAi {
            api_key: "sk-test".to_string(),
            base_url: server.uri(),
        },
        model,
        TIMEOUT,
    )
    .unwrap()
}

#[tokio::test]
async fn openai_chat_completion_round_trip() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "gpt-4.1-mini",
            "max_tokens": 128,
            "messages": [{"role": "user", "content": "Explain RSI"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "chatcmpl-1",
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "RSI measures momentum."}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let backend = openai(&server, "gpt-4.1-mini");
    assert_eq!(backend.id(), "openai/gpt-4.1-mini");
    assert_eq!(backend.kind(), ProviderKind::OpenAi);
    assert_eq!(backend.model(), "gpt-4.1-mini");

    let raw = backend.invoke("Explain RSI", 128).await.unwrap();
    assert_eq!(normalize(raw).unwrap(), "RSI measures momentum.");
}

#[tokio::test]
async fn anthropic_messages_round_trip() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("x-api-key", "ak-test"))
        .and(header("anthropic-version", "2023-06-01"))
        .and(body_partial_json(json!({"model": "claude-sonnet-4-0", "max_tokens": 64})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "type": "message",
            "content": [{"type": "text", "text": "Momentum is fading."}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let backend = HttpBackend::new(
        ProviderConfig::Anthropic {
            api_key: "ak-test".to_string(),
            base_url: format!("{}/", server.uri()),
        },
        "claude-sonnet-4-0",
        TIMEOUT,
    )
    .unwrap();

    let raw = backend.invoke("Explain MACD", 64).await.unwrap();
    assert_eq!(normalize(raw).unwrap(), "Momentum is fading.");
}

#[tokio::test]
async fn gemini_generate_content_round_trip() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1beta/models/gemini-2.0-flash:generateContent"))
        .and(header("x-goog-api-key", "g-test"))
        .and(body_partial_json(json!({"generationConfig": {"maxOutputTokens": 32}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{"content": {"role": "model", "parts": [{"text": "Range-bound."}]}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let backend = HttpBackend::new(
        ProviderConfig::Gemini {
            api_key: "g-test".to_string(),
            base_url: server.uri(),
        },
        "gemini-2.0-flash",
        TIMEOUT,
    )
    .unwrap();

    let raw = backend.invoke("Explain volatility", 32).await.unwrap();
    assert_eq!(normalize(raw).unwrap(), "Range-bound.");
}

#[tokio::test]
async fn ollama_chat_round_trip() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/chat"))
        .and(body_partial_json(json!({
            "model": "llama3.1",
            "stream": false,
            "options": {"num_predict": 16}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "model": "llama3.1",
            "message": {"role": "assistant", "content": "Hold."},
            "done": true
        })))
        .expect(1)
        .mount(&server)
        .await;

    let backend = HttpBackend::new(
        ProviderConfig::Ollama {
            base_url: server.uri(),
        },
        "llama3.1",
        TIMEOUT,
    )
    .unwrap();
    assert_eq!(backend.id(), "ollama/llama3.1");

    let raw = backend.invoke("Hello", 16).await.unwrap();
    assert_eq!(normalize(raw).unwrap(), "Hold.");
}

async fn openai_error(status: u16) -> ProviderError {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(status).set_body_string("upstream says no"))
        .mount(&server)
        .await;

    openai(&server, "gpt-4.1-mini")
        .invoke("hi", 16)
        .await
        .unwrap_err()
}

#[tokio::test]
async fn provider_status_codes_are_classified() {
    assert_eq!(openai_error(401).await, ProviderError::Unauthorized(401));
    assert_eq!(openai_error(403).await, ProviderError::Unauthorized(403));
    assert_eq!(openai_error(429).await, ProviderError::RateLimited);
    assert_eq!(
        openai_error(500).await,
        ProviderError::Status {
            status: 500,
            body: "upstream says no".to_string(),
        }
    );
}

#[tokio::test]
async fn malformed_body_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let err = openai(&server, "gpt-4.1-mini")
        .invoke("hi", 16)
        .await
        .unwrap_err();
    assert!(matches!(err, ProviderError::MalformedResponse(_)));
}

#[tokio::test]
async fn slow_provider_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_secs(2))
                .set_body_json(json!({"choices": []})),
        )
        .mount(&server)
        .await;

    let backend = HttpBackend::new(
        ProviderConfig::OpenAi {
            api_key: "sk-test".to_string(),
            base_url: server.uri(),
        },
        "gpt-4.1-mini",
        Duration::from_millis(100),
    )
    .unwrap();

    let err = backend.invoke("hi", 16).await.unwrap_err();
    assert_eq!(err, ProviderError::Timeout(Duration::from_millis(100)));
}

#[tokio::test]
async fn switcher_falls_back_across_real_adapters() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({"model": "gpt-4o"})))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(body_partial_json(json!({"model": "gpt-4.1-mini"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {"content": "fallback answer"}}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let default: SharedBackend = Arc::new(openai(&server, "gpt-4.1-mini"));
    let alt: SharedBackend = Arc::new(openai(&server, "gpt-4o"));
    let registry = Arc::new(BackendRegistry::new("gpt-4.1-mini", default).with_backend("gpt-4o", alt));
    let switcher = ModelSwitcher::new(registry, TIMEOUT);

    let text = switcher.generate("hi", Some("gpt-4o"), 16).await.unwrap();
    assert_eq!(text, "fallback answer");
}
