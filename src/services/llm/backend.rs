//! Backend adapters: one uniform `invoke` over heterogeneous provider APIs.

use crate::error::ProviderError;
use crate::services::llm::messages::{
    AnthropicRequest, AnthropicResponse, ChatCompletionRequest, ChatCompletionResponse,
    ChatMessage, GeminiContent, GeminiGenerationConfig, GeminiPart, GeminiRequest,
    GeminiResponse, OllamaChatRequest, OllamaChatResponse, OllamaOptions, RawResponse,
};
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

const ANTHROPIC_VERSION: &str = "2023-06-01";

/// Capability shared by every language-model backend.
#[async_trait]
pub trait BackendAdapter: Send + Sync {
    /// Qualified identifier, e.g. `openai/gpt-4.1-mini`.
    fn id(&self) -> &str;

    async fn invoke(&self, prompt: &str, max_tokens: u32) -> Result<RawResponse, ProviderError>;
}

pub type SharedBackend = Arc<dyn BackendAdapter>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    OpenAi,
    Anthropic,
    Gemini,
    Ollama,
}

impl ProviderKind {
    pub const ALL: [ProviderKind; 4] = [
        ProviderKind::OpenAi,
        ProviderKind::Anthropic,
        ProviderKind::Gemini,
        ProviderKind::Ollama,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Anthropic => "anthropic",
            ProviderKind::Gemini => "gemini",
            ProviderKind::Ollama => "ollama",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "openai" => Some(ProviderKind::OpenAi),
            "anthropic" => Some(ProviderKind::Anthropic),
            "gemini" | "google" => Some(ProviderKind::Gemini),
            "ollama" | "local" => Some(ProviderKind::Ollama),
            _ => None,
        }
    }

    /// Guess the provider from a bare model name.
    pub fn infer_from_model(model: &str) -> Option<Self> {
        let model = model.to_ascii_lowercase();
        if model.starts_with("gpt-")
            || model.starts_with("o1")
            || model.starts_with("o3")
            || model.starts_with("o4")
            || model.starts_with("chatgpt")
        {
            Some(ProviderKind::OpenAi)
        } else if model.starts_with("claude") {
            Some(ProviderKind::Anthropic)
        } else if model.starts_with("gemini") {
            Some(ProviderKind::Gemini)
        } else {
            None
        }
    }

    pub fn api_key_variable(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "OPENAI_API_KEY",
            ProviderKind::Anthropic => "ANTHROPIC_API_KEY",
            ProviderKind::Gemini => "GEMINI_API_KEY",
            ProviderKind::Ollama => "OLLAMA_BASE_URL",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "https://api.openai.com/v1",
            ProviderKind::Anthropic => "https://api.anthropic.com",
            ProviderKind::Gemini => "https://generativelanguage.googleapis.com",
            ProviderKind::Ollama => "http://localhost:11434",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Endpoint and credentials of one provider.
#[derive(Clone, PartialEq, Eq)]
pub enum ProviderConfig {
    OpenAi { api_key: String, base_url: String },
    Anthropic { api_key: String, base_url: String },
    Gemini { api_key: String, base_url: String },
    Ollama { base_url: String },
}

impl ProviderConfig {
    pub fn kind(&self) -> ProviderKind {
        match self {
            ProviderConfig::OpenAi { .. } => ProviderKind::OpenAi,
            ProviderConfig::Anthropic { .. } => ProviderKind::Anthropic,
            ProviderConfig::Gemini { .. } => ProviderKind::Gemini,
            ProviderConfig::Ollama { .. } => ProviderKind::Ollama,
        }
    }

    fn base_url(&self) -> &str {
        let url = match self {
            ProviderConfig::OpenAi { base_url, .. }
            | ProviderConfig::Anthropic { base_url, .. }
            | ProviderConfig::Gemini { base_url, .. }
            | ProviderConfig::Ollama { base_url } => base_url,
        };
        url.trim_end_matches('/')
    }
}

// Keys stay out of logs.
impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("kind", &self.kind())
            .field("base_url", &self.base_url())
            .finish()
    }
}

/// HTTP adapter for one provider/model pair.
#[derive(Debug)]
pub struct HttpBackend {
    id: String,
    model: String,
    provider: ProviderConfig,
    client: Client,
    timeout: Duration,
}

impl HttpBackend {
    pub fn new(
        provider: ProviderConfig,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(provider, model, client, timeout))
    }

    pub fn with_client(
        provider: ProviderConfig,
        model: impl Into<String>,
        client: Client,
        timeout: Duration,
    ) -> Self {
        let model = model.into();
        Self {
            id: format!("{}/{}", provider.kind(), model),
            model,
            provider,
            client,
            timeout,
        }
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn kind(&self) -> ProviderKind {
        self.provider.kind()
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ProviderError> {
        let response = request.send().await.map_err(|e| self.transport_error(e))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ProviderError::Unauthorized(status.as_u16()));
        }
        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(ProviderError::RateLimited);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response.json::<T>().await.map_err(|e| {
            if e.is_timeout() {
                ProviderError::Timeout(self.timeout)
            } else {
                ProviderError::MalformedResponse(e.to_string())
            }
        })
    }

    fn transport_error(&self, err: reqwest::Error) -> ProviderError {
        if err.is_timeout() {
            ProviderError::Timeout(self.timeout)
        } else {
            ProviderError::Transport(err.to_string())
        }
    }
}

#[async_trait]
impl BackendAdapter for HttpBackend {
    fn id(&self) -> &str {
        &self.id
    }

    async fn invoke(&self, prompt: &str, max_tokens: u32) -> Result<RawResponse, ProviderError> {
        debug!(backend = %self.id, max_tokens, "Invoking language-model backend");
        let base_url = self.provider.base_url();

        match &self.provider {
            ProviderConfig::OpenAi { api_key, .. } => {
                let body = ChatCompletionRequest {
                    model: self.model.clone(),
                    messages: vec![ChatMessage::user(prompt)],
                    max_tokens,
                };
                let request = self
                    .client
                    .post(format!("{base_url}/chat/completions"))
                    .bearer_auth(api_key)
                    .json(&body);
                self.send::<ChatCompletionResponse>(request)
                    .await
                    .map(RawResponse::ChatCompletion)
            }
            ProviderConfig::Anthropic { api_key, .. } => {
                let body = AnthropicRequest {
                    model: self.model.clone(),
                    max_tokens,
                    messages: vec![ChatMessage::user(prompt)],
                };
                let request = self
                    .client
                    .post(format!("{base_url}/v1/messages"))
                    .header("x-api-key", api_key)
                    .header("anthropic-version", ANTHROPIC_VERSION)
                    .json(&body);
                self.send::<AnthropicResponse>(request)
                    .await
                    .map(RawResponse::Anthropic)
            }
            ProviderConfig::Gemini { api_key, .. } => {
                let body = GeminiRequest {
                    contents: vec![GeminiContent {
                        role: Some("user".to_string()),
                        parts: vec![GeminiPart {
                            text: Some(prompt.to_string()),
                        }],
                    }],
                    generation_config: GeminiGenerationConfig {
                        max_output_tokens: max_tokens,
                    },
                };
                let request = self
                    .client
                    .post(format!(
                        "{base_url}/v1beta/models/{}:generateContent",
                        self.model
                    ))
                    .header("x-goog-api-key", api_key)
                    .json(&body);
                self.send::<GeminiResponse>(request)
                    .await
                    .map(RawResponse::Gemini)
            }
            ProviderConfig::Ollama { .. } => {
                let body = OllamaChatRequest {
                    model: self.model.clone(),
                    messages: vec![ChatMessage::user(prompt)],
                    stream: false,
                    options: OllamaOptions {
                        num_predict: max_tokens,
                    },
                };
                let request = self
                    .client
                    .post(format!("{base_url}/api/chat"))
                    .json(&body);
                self.send::<OllamaChatResponse>(request)
                    .await
                    .map(RawResponse::Ollama)
            }
        }
    }
}
