//! In-memory secret store

use std::collections::HashMap;

use super::traits::SecretStore;

/// In-memory secret store for testing and embedding hosts
#[derive(Debug, Default, Clone)]
pub struct MemorySecretStore {
    secrets: HashMap<String, String>,
}

impl MemorySecretStore {
    /// Create a new empty memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a memory store with initial values
    pub fn with_secrets(initial: HashMap<String, String>) -> Self {
        Self { secrets: initial }
    }

    /// Add a value
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.secrets.insert(key.into(), value.into());
        self
    }

    /// Get the number of values in the store
    pub fn len(&self) -> usize {
        self.secrets.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.secrets.is_empty()
    }
}

impl SecretStore for MemorySecretStore {
    fn name(&self) -> &str {
        "memory"
    }

    fn get(&self, key: &str) -> Option<String> {
        self.secrets.get(key).filter(|v| !v.is_empty()).cloned()
    }
}
