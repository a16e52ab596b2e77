//! Backend registry: model identifier to adapter, fixed at startup.

use crate::config::{Config, ProviderSettings};
use crate::error::{ConfigError, UnknownModelError};
use crate::services::llm::{HttpBackend, ProviderConfig, ProviderKind, SharedBackend};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info};

/// Alias that always resolves to the default backend.
pub const DEFAULT_ALIAS: &str = "default";

pub struct BackendRegistry {
    backends: HashMap<String, SharedBackend>,
    default_model: String,
    default_backend: SharedBackend,
}

impl BackendRegistry {
    /// Registry containing only the default backend, reachable under `default_model`,
    /// its qualified id, and the `default` alias.
    pub fn new(default_model: impl Into<String>, default_backend: SharedBackend) -> Self {
        let default_model = default_model.into();
        let mut backends = HashMap::new();
        backends.insert(default_model.clone(), default_backend.clone());
        backends.insert(default_backend.id().to_string(), default_backend.clone());
        backends.insert(DEFAULT_ALIAS.to_string(), default_backend.clone());

        Self {
            backends,
            default_model,
            default_backend,
        }
    }

    /// Register an additional backend under `model` and its qualified id.
    ///
    /// Identifiers already bound (the default's included) are left untouched.
    pub fn with_backend(mut self, model: impl Into<String>, backend: SharedBackend) -> Self {
        for key in [model.into(), backend.id().to_string()] {
            self.backends.entry(key).or_insert_with(|| backend.clone());
        }
        self
    }

    /// Resolve an identifier; absent or blank means the default backend.
    pub fn resolve(&self, model: Option<&str>) -> Result<SharedBackend, UnknownModelError> {
        match model.map(str::trim).filter(|m| !m.is_empty()) {
            None => Ok(self.default_backend.clone()),
            Some(id) => self
                .backends
                .get(id)
                .cloned()
                .ok_or_else(|| UnknownModelError(id.to_string())),
        }
    }

    pub fn default_backend(&self) -> SharedBackend {
        self.default_backend.clone()
    }

    pub fn default_model(&self) -> &str {
        &self.default_model
    }

    pub fn is_default(&self, backend: &SharedBackend) -> bool {
        Arc::ptr_eq(backend, &self.default_backend)
    }

    /// Every registered identifier, sorted.
    pub fn models(&self) -> Vec<String> {
        let mut models: Vec<String> = self.backends.keys().cloned().collect();
        models.sort();
        models
    }

    /// Build HTTP adapters for every configured provider.
    ///
    /// The default model's provider must have credentials; other providers are skipped
    /// when theirs are absent.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let (default_kind, default_name) = split_model_id(&config.default_model)?;
        let timeout = config.backend_timeout;

        let default_provider = provider_config(default_kind, config, true)?.ok_or(
            ConfigError::MissingCredentials {
                provider: default_kind.name(),
                variable: default_kind.api_key_variable(),
            },
        )?;
        let default_backend = build_backend(default_provider, default_name, timeout)?;

        let mut registry = Self::new(config.default_model.clone(), default_backend)
            .with_alias(default_name);

        for kind in ProviderKind::ALL {
            let required = kind == default_kind;
            let Some(provider) = provider_config(kind, config, required)? else {
                debug!(provider = %kind, "Provider not configured, skipping");
                continue;
            };
            for model in &settings_for(kind, config).models {
                let backend = build_backend(provider.clone(), model, timeout)?;
                registry = registry.with_backend(model.clone(), backend);
            }
        }

        info!(
            default_model = %registry.default_model,
            models = ?registry.models(),
            "Backend registry initialized"
        );
        Ok(registry)
    }

    fn with_alias(mut self, alias: &str) -> Self {
        self.backends
            .entry(alias.to_string())
            .or_insert_with(|| self.default_backend.clone());
        self
    }
}

/// Split `provider/model` or infer the provider of a bare model name.
fn split_model_id(id: &str) -> Result<(ProviderKind, &str), ConfigError> {
    if let Some((prefix, model)) = id.split_once('/') {
        if let Some(kind) = ProviderKind::from_name(prefix) {
            return Ok((kind, model));
        }
    }
    ProviderKind::infer_from_model(id)
        .map(|kind| (kind, id))
        .ok_or_else(|| ConfigError::UnknownProvider(id.to_string()))
}

fn settings_for(kind: ProviderKind, config: &Config) -> &ProviderSettings {
    match kind {
        ProviderKind::OpenAi => &config.openai,
        ProviderKind::Anthropic => &config.anthropic,
        ProviderKind::Gemini => &config.gemini,
        ProviderKind::Ollama => &config.ollama,
    }
}

/// Provider endpoint for `kind`, or `None` when it is not configured.
///
/// Ollama needs no key: it counts as configured when its URL is set or it serves the
/// default model.
fn provider_config(
    kind: ProviderKind,
    config: &Config,
    required: bool,
) -> Result<Option<ProviderConfig>, ConfigError> {
    let settings = settings_for(kind, config);
    let base_url = settings
        .base_url
        .clone()
        .unwrap_or_else(|| kind.default_base_url().to_string());

    let provider = match (kind, settings.api_key.clone()) {
        (ProviderKind::Ollama, _) => {
            if settings.base_url.is_none() && !required {
                return Ok(None);
            }
            ProviderConfig::Ollama { base_url }
        }
        (_, None) => return Ok(None),
        (ProviderKind::OpenAi, Some(api_key)) => ProviderConfig::OpenAi { api_key, base_url },
        (ProviderKind::Anthropic, Some(api_key)) => {
            ProviderConfig::Anthropic { api_key, base_url }
        }
        (ProviderKind::Gemini, Some(api_key)) => ProviderConfig::Gemini { api_key, base_url },
    };
    Ok(Some(provider))
}

fn build_backend(
    provider: ProviderConfig,
    model: &str,
    timeout: Duration,
) -> Result<SharedBackend, ConfigError> {
    let backend = HttpBackend::new(provider, model, timeout)
        .map_err(|e| ConfigError::HttpClient(e.to_string()))?;
    debug!(
        provider = %backend.kind(),
        model = %backend.model(),
        "Built language model backend"
    );
    Ok(Arc::new(backend))
}
