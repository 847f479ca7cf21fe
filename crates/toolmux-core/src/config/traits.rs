//! Configuration provider trait

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::types::BackendDescriptor;
use super::validation::validate_backends;

/// Configuration file structure
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConfigFile {
    /// System instruction for new conversations
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,

    /// Model defaults (environment settings take precedence)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<ModelSection>,

    /// Tool server descriptors, in connection order
    #[serde(default)]
    pub servers: Vec<BackendDescriptor>,
}

/// Model defaults from the configuration file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelSection {
    /// Provider identifier (e.g. "openai")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    /// Model name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// API base URL
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_base: Option<String>,
}

/// Configuration provider abstraction
///
/// Implementations:
/// - `MemoryConfigProvider`: In-memory for testing
/// - `FileConfigProvider`: YAML file (~/.config/toolmux/config.yaml)
#[async_trait]
pub trait ConfigProvider: Send + Sync {
    /// Load the raw configuration
    async fn load(&self) -> ConfigResult<ConfigFile>;

    /// All backend descriptors, validated, in listed order
    async fn backends(&self) -> ConfigResult<Vec<BackendDescriptor>> {
        let config = self.load().await?;
        validate_backends(&config.servers)?;
        Ok(config.servers)
    }

    /// Only the enabled backend descriptors, in listed order
    async fn enabled_backends(&self) -> ConfigResult<Vec<BackendDescriptor>> {
        Ok(self
            .backends()
            .await?
            .into_iter()
            .filter(|b| b.enabled)
            .collect())
    }
}

/// Errors that can occur during configuration operations
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Duplicate backend name: {0}")]
    DuplicateBackend(String),

    #[error("Invalid backend '{name}': {reason}")]
    InvalidBackend { name: String, reason: String },

    #[error("Missing required setting: {0}")]
    MissingSetting(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse configuration: {0}")]
    Parse(String),
}

impl ConfigError {
    /// Create an invalid backend error
    pub fn invalid_backend(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidBackend {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;
