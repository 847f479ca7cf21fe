//! Model endpoint settings
//!
//! The API key is only ever read from a `SecretStore`. Model name, base URL
//! and provider come from the store first, then from the config file's
//! `model` section.

use crate::secrets::SecretStore;
use super::traits::{ConfigError, ConfigResult, ModelSection};

/// Environment key for the API key
pub const ENV_API_KEY: &str = "LLM_API_KEY";
/// Environment key for the API base URL
pub const ENV_BASE_URL: &str = "LLM_BASE_URL";
/// Environment key for the model name
pub const ENV_MODEL: &str = "LLM_MODEL";
/// Environment key for the provider identifier
pub const ENV_PROVIDER: &str = "LLM_PROVIDER";

/// Provider used when none is configured (OpenAI-compatible endpoint)
pub const DEFAULT_PROVIDER: &str = "openai";

/// Resolved settings for the chat-completion endpoint
#[derive(Clone, PartialEq)]
pub struct ModelSettings {
    pub provider: String,
    pub model: String,
    pub api_key: String,
    pub api_base: String,
}

impl ModelSettings {
    /// Resolve settings from a store, falling back to file defaults
    pub fn resolve(store: &dyn SecretStore, defaults: Option<&ModelSection>) -> ConfigResult<Self> {
        let api_key = store
            .get(ENV_API_KEY)
            .ok_or_else(|| ConfigError::MissingSetting(ENV_API_KEY.to_string()))?;

        let api_base = store
            .get(ENV_BASE_URL)
            .or_else(|| defaults.and_then(|d| d.api_base.clone()))
            .ok_or_else(|| ConfigError::MissingSetting(ENV_BASE_URL.to_string()))?;

        let model = store
            .get(ENV_MODEL)
            .or_else(|| defaults.and_then(|d| d.name.clone()))
            .ok_or_else(|| ConfigError::MissingSetting(ENV_MODEL.to_string()))?;

        let provider = store
            .get(ENV_PROVIDER)
            .or_else(|| defaults.and_then(|d| d.provider.clone()))
            .unwrap_or_else(|| DEFAULT_PROVIDER.to_string());

        Ok(Self {
            provider,
            model,
            api_key,
            api_base,
        })
    }

    /// Replace the model name
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

impl std::fmt::Debug for ModelSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ModelSettings")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("api_key", &"***")
            .field("api_base", &self.api_base)
            .finish()
    }
}
