//! Environment variable secret store

use std::env;
use std::path::{Path, PathBuf};

use super::traits::SecretStore;

/// Secret store that reads from environment variables
///
/// Optionally falls back to a `.env` file for keys missing from the
/// process environment. The file is never written.
#[derive(Debug, Default)]
pub struct EnvSecretStore {
    dotenv_path: Option<PathBuf>,
}

impl EnvSecretStore {
    /// Create a store over the process environment only
    pub fn new() -> Self {
        Self { dotenv_path: None }
    }

    /// Also consult `.env` in the current directory
    pub fn with_dotenv() -> Self {
        Self::with_dotenv_file(".env")
    }

    /// Also consult the given dotenv file
    pub fn with_dotenv_file(path: impl Into<PathBuf>) -> Self {
        Self {
            dotenv_path: Some(path.into()),
        }
    }

    /// The dotenv file consulted, if any
    pub fn dotenv_path(&self) -> Option<&Path> {
        self.dotenv_path.as_deref()
    }

    fn from_dotenv(&self, key: &str) -> Option<String> {
        let path = self.dotenv_path.as_ref()?;
        let content = std::fs::read_to_string(path).ok()?;
        parse_dotenv_value(&content, key)
    }
}

/// Find `key` in dotenv-formatted text
fn parse_dotenv_value(content: &str, key: &str) -> Option<String> {
    for line in content.lines() {
        let line = line.trim();
        if line.starts_with('#') || line.is_empty() {
            continue;
        }
        let line = line.strip_prefix("export ").unwrap_or(line);
        if let Some((k, v)) = line.split_once('=') {
            if k.trim() == key {
                let value = v.trim().trim_matches('"').trim_matches('\'');
                if !value.is_empty() {
                    return Some(value.to_string());
                }
            }
        }
    }
    None
}

impl SecretStore for EnvSecretStore {
    fn name(&self) -> &str {
        "env"
    }

    fn get(&self, key: &str) -> Option<String> {
        if let Ok(value) = env::var(key) {
            if !value.is_empty() {
                return Some(value);
            }
        }
        self.from_dotenv(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_env_store_reads_process_env() {
        env::set_var("TOOLMUX_TEST_ENV_STORE_KEY", "value-1");
        let store = EnvSecretStore::new();
        assert_eq!(store.get("TOOLMUX_TEST_ENV_STORE_KEY"), Some("value-1".to_string()));
        assert!(!store.has("TOOLMUX_TEST_ENV_STORE_MISSING"));
        env::remove_var("TOOLMUX_TEST_ENV_STORE_KEY");
    }

    #[test]
    fn test_dotenv_fallback() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(
            &path,
            "# model settings\nTOOLMUX_DOTENV_MODEL=\"gpt-4o-mini\"\nexport TOOLMUX_DOTENV_BASE='http://localhost:8080/v1'\nTOOLMUX_DOTENV_EMPTY=\n",
        )
        .unwrap();

        let store = EnvSecretStore::with_dotenv_file(&path);
        assert_eq!(store.get("TOOLMUX_DOTENV_MODEL"), Some("gpt-4o-mini".to_string()));
        assert_eq!(
            store.get("TOOLMUX_DOTENV_BASE"),
            Some("http://localhost:8080/v1".to_string())
        );
        assert_eq!(store.get("TOOLMUX_DOTENV_EMPTY"), None);
        assert_eq!(store.get("TOOLMUX_DOTENV_ABSENT"), None);
    }

    #[test]
    fn test_missing_dotenv_file() {
        let store = EnvSecretStore::with_dotenv_file("/nonexistent/.env");
        assert_eq!(store.get("TOOLMUX_DOTENV_NOPE"), None);
    }
}
