//! File-based configuration provider (YAML)
//!
//! Supports user-level (~/.config/toolmux/config.yaml), workspace-level
//! (.config/toolmux/config.yaml) and explicit paths.

use std::fs;
use std::path::{Path, PathBuf};

use async_trait::async_trait;

use super::traits::{ConfigError, ConfigFile, ConfigProvider, ConfigResult};

/// Config level (user, workspace or an explicit file)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigLevel {
    /// User-level config (~/.config/toolmux/config.yaml)
    User,
    /// Workspace-level config (.config/toolmux/config.yaml in workspace root)
    Workspace,
    /// A path given on the command line
    Explicit,
}

impl ConfigLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfigLevel::User => "user",
            ConfigLevel::Workspace => "workspace",
            ConfigLevel::Explicit => "explicit",
        }
    }
}

/// File-based configuration provider
///
/// Reads backend descriptors and model defaults from a YAML file. A missing
/// file is treated as an empty configuration.
///
/// # Example
///
/// ```no_run
/// use toolmux_core::config::FileConfigProvider;
///
/// // User-level config
/// let user_config = FileConfigProvider::user();
///
/// // Workspace-level config
/// let workspace_config = FileConfigProvider::workspace("/path/to/workspace");
/// ```
pub struct FileConfigProvider {
    path: PathBuf,
    level: ConfigLevel,
}

impl FileConfigProvider {
    /// Create a new file config provider for a specific path
    pub fn new(path: impl Into<PathBuf>, level: ConfigLevel) -> Self {
        Self {
            path: path.into(),
            level,
        }
    }

    /// Create a provider for an explicit file path
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self::new(path, ConfigLevel::Explicit)
    }

    /// Create a user-level config provider (~/.config/toolmux/config.yaml)
    pub fn user() -> Self {
        // XDG config directory on Linux, ~/Library/Application Support on macOS
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| dirs::home_dir().unwrap_or_else(|| PathBuf::from(".")).join(".config"));
        let path = config_dir.join("toolmux").join("config.yaml");
        Self::new(path, ConfigLevel::User)
    }

    /// Create a workspace-level config provider (.config/toolmux/config.yaml)
    pub fn workspace(workspace_root: impl AsRef<Path>) -> Self {
        let path = workspace_root.as_ref().join(".config").join("toolmux").join("config.yaml");
        Self::new(path, ConfigLevel::Workspace)
    }

    /// Get the config file path
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Get the config level
    pub fn level(&self) -> ConfigLevel {
        self.level
    }

    /// Check if the config file exists
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    fn read(&self) -> ConfigResult<ConfigFile> {
        if !self.path.exists() {
            return Ok(ConfigFile::default());
        }

        let content = fs::read_to_string(&self.path)?;
        if content.trim().is_empty() {
            return Ok(ConfigFile::default());
        }

        serde_yaml::from_str(&content).map_err(|e| {
            ConfigError::Parse(format!("{}: {}", self.path.display(), e))
        })
    }
}

impl std::fmt::Debug for FileConfigProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileConfigProvider")
            .field("path", &self.path)
            .field("level", &self.level)
            .field("exists", &self.exists())
            .finish()
    }
}

#[async_trait]
impl ConfigProvider for FileConfigProvider {
    async fn load(&self) -> ConfigResult<ConfigFile> {
        self.read()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{BackendKind, BackendTransport};
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let provider = FileConfigProvider::at(dir.path().join("config.yaml"));

        assert!(!provider.exists());
        assert_eq!(provider.load().await.unwrap(), ConfigFile::default());
        assert!(provider.enabled_backends().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_load_servers() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(
            &path,
            r#"
system_prompt: Answer briefly.
model:
  name: gpt-4o-mini
servers:
  - name: mongo
    type: process-command
    command: node ~/mcp/mongo/index.js mongodb://localhost:27017/db
    env:
      DEBUG: "1"
  - name: demo
    type: network-stream
    url: http://localhost:3001/mcp
    isEnabled: false
"#,
        )
        .unwrap();

        let provider = FileConfigProvider::at(&path);
        let config = provider.load().await.unwrap();
        assert_eq!(config.system_prompt.as_deref(), Some("Answer briefly."));
        assert_eq!(
            config.model.and_then(|m| m.name).as_deref(),
            Some("gpt-4o-mini")
        );

        let all = provider.backends().await.unwrap();
        assert_eq!(all.len(), 2);
        assert_eq!(all[0].kind(), BackendKind::Command);
        match &all[0].transport {
            BackendTransport::Command { env, .. } => {
                assert_eq!(env.get("DEBUG").map(String::as_str), Some("1"));
            }
            other => panic!("unexpected transport: {:?}", other),
        }

        let enabled = provider.enabled_backends().await.unwrap();
        assert_eq!(enabled.len(), 1);
        assert_eq!(enabled[0].name, "mongo");
    }

    #[tokio::test]
    async fn test_parse_error_names_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        fs::write(&path, "servers: [ { name: a, type: carrier-pigeon } ]").unwrap();

        let provider = FileConfigProvider::at(&path);
        match provider.load().await {
            Err(ConfigError::Parse(msg)) => assert!(msg.contains("config.yaml")),
            other => panic!("expected parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_workspace_path() {
        let provider = FileConfigProvider::workspace("/work");
        assert_eq!(provider.level(), ConfigLevel::Workspace);
        assert!(provider.path().ends_with(".config/toolmux/config.yaml"));
    }
}
