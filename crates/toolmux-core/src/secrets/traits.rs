//! Core trait for secret lookup

/// Read-only source of secrets and settings
///
/// Implementations:
/// - Environment variables (`EnvSecretStore`)
/// - In-memory for testing (`MemorySecretStore`)
///
/// # Example
///
/// ```
/// use toolmux_core::secrets::{SecretStore, MemorySecretStore};
///
/// let store = MemorySecretStore::new().with("LLM_API_KEY", "sk-test");
/// assert_eq!(store.get("LLM_API_KEY"), Some("sk-test".to_string()));
/// ```
pub trait SecretStore: Send + Sync {
    /// Human-readable name of this store
    fn name(&self) -> &str;

    /// Retrieve a value by key; empty values count as missing
    fn get(&self, key: &str) -> Option<String>;

    /// Check if a value exists
    fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }
}
