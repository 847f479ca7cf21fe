//! In-memory configuration provider

use async_trait::async_trait;

use crate::types::BackendDescriptor;
use super::traits::{ConfigFile, ConfigProvider, ConfigResult};

/// In-memory configuration provider for testing and embedding hosts
#[derive(Debug, Default, Clone)]
pub struct MemoryConfigProvider {
    config: ConfigFile,
}

impl MemoryConfigProvider {
    /// Create a new empty memory config provider
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a memory config provider with initial backends
    pub fn with_backends(backends: Vec<BackendDescriptor>) -> Self {
        Self {
            config: ConfigFile {
                servers: backends,
                ..Default::default()
            },
        }
    }

    /// Create a memory config provider from a full configuration
    pub fn with_config(config: ConfigFile) -> Self {
        Self { config }
    }
}

#[async_trait]
impl ConfigProvider for MemoryConfigProvider {
    async fn load(&self) -> ConfigResult<ConfigFile> {
        Ok(self.config.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigError;

    #[tokio::test]
    async fn test_enabled_backends_keep_order() {
        let provider = MemoryConfigProvider::with_backends(vec![
            BackendDescriptor::command("first", "node first.js"),
            BackendDescriptor::command("skipped", "node skipped.js").disabled(),
            BackendDescriptor::stream("second", "http://localhost:3001/mcp"),
        ]);

        let names: Vec<String> = provider
            .enabled_backends()
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.name)
            .collect();
        assert_eq!(names, vec!["first", "second"]);
        assert_eq!(provider.backends().await.unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_invalid_backends_rejected() {
        let provider = MemoryConfigProvider::with_backends(vec![
            BackendDescriptor::command("dup", "node a.js"),
            BackendDescriptor::command("dup", "node b.js"),
        ]);
        assert!(matches!(
            provider.enabled_backends().await,
            Err(ConfigError::DuplicateBackend(_))
        ));
    }
}
