//! Model switcher: resolve, invoke with a timeout, fall back once, normalize.

use crate::ai::registry::BackendRegistry;
use crate::error::{GenerationError, ProviderError};
use crate::metrics::Metrics;
use crate::services::llm::{RawResponse, SharedBackend};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

pub struct ModelSwitcher {
    registry: Arc<BackendRegistry>,
    timeout: Duration,
    metrics: Option<Arc<Metrics>>,
}

impl ModelSwitcher {
    pub fn new(registry: Arc<BackendRegistry>, timeout: Duration) -> Self {
        Self {
            registry,
            timeout,
            metrics: None,
        }
    }

    pub fn with_metrics(mut self, metrics: Arc<Metrics>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn registry(&self) -> &BackendRegistry {
        &self.registry
    }

    /// Generate text for `prompt` on the requested model.
    ///
    /// Unknown models run on the default backend. A failure of any other backend is
    /// retried exactly once on the default; a failure of the default is final.
    pub async fn generate(
        &self,
        prompt: &str,
        model: Option<&str>,
        max_tokens: u32,
    ) -> Result<String, GenerationError> {
        if prompt.trim().is_empty() {
            return Err(GenerationError::InvalidInput(
                "Prompt cannot be empty".to_string(),
            ));
        }

        let backend = match self.registry.resolve(model) {
            Ok(backend) => backend,
            Err(unknown) => {
                warn!(
                    model = %unknown.0,
                    default = %self.registry.default_model(),
                    "Unknown model requested, using default backend"
                );
                self.registry.default_backend()
            }
        };

        let err = match self.invoke(&backend, prompt, max_tokens).await {
            Ok(text) => return Ok(text),
            Err(err) => err,
        };

        if self.registry.is_default(&backend) {
            warn!(backend = %backend.id(), error = %err, "Default backend failed");
            return Err(GenerationError::Exhausted {
                model: backend.id().to_string(),
                source: err,
            });
        }

        warn!(
            backend = %backend.id(),
            error = %err,
            "Backend failed, retrying once on default backend"
        );
        if let Some(metrics) = &self.metrics {
            metrics.llm_fallbacks_total.inc();
        }

        let default = self.registry.default_backend();
        self.invoke(&default, prompt, max_tokens)
            .await
            .map_err(|source| {
                warn!(backend = %default.id(), error = %source, "Fallback backend failed");
                GenerationError::Exhausted {
                    model: default.id().to_string(),
                    source,
                }
            })
    }

    /// One bounded call. Timeouts and empty envelopes count as provider errors.
    async fn invoke(
        &self,
        backend: &SharedBackend,
        prompt: &str,
        max_tokens: u32,
    ) -> Result<String, ProviderError> {
        let result = match tokio::time::timeout(self.timeout, backend.invoke(prompt, max_tokens))
            .await
        {
            Ok(result) => result.and_then(normalize),
            Err(_) => Err(ProviderError::Timeout(self.timeout)),
        };

        if let Some(metrics) = &self.metrics {
            let outcome = if result.is_ok() { "success" } else { "failure" };
            metrics
                .llm_backend_invocations_total
                .with_label_values(&[backend.id(), outcome])
                .inc();
        }
        if result.is_ok() {
            debug!(backend = %backend.id(), "Backend invocation succeeded");
        }
        result
    }
}

/// Flatten a provider envelope into trimmed text.
pub fn normalize(raw: RawResponse) -> Result<String, ProviderError> {
    let text = match raw {
        RawResponse::ChatCompletion(response) => response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .unwrap_or_default(),
        RawResponse::Anthropic(response) => response
            .content
            .into_iter()
            .filter(|block| block.block_type == "text")
            .filter_map(|block| block.text)
            .collect::<Vec<_>>()
            .join(""),
        RawResponse::Gemini(response) => response
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default(),
        RawResponse::Ollama(response) => response
            .message
            .map(|message| message.content)
            .unwrap_or_default(),
        RawResponse::Text(text) => text,
    };

    let text = text.trim();
    if text.is_empty() {
        Err(ProviderError::EmptyResponse)
    } else {
        Ok(text.to_string())
    }
}
