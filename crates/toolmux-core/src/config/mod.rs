//! Configuration loading
//!
//! - `ConfigProvider` trait with `FileConfigProvider` (YAML) and
//!   `MemoryConfigProvider`
//! - `ModelSettings` for the chat-completion endpoint

mod file;
mod memory;
mod settings;
mod traits;
mod validation;

pub use file::{ConfigLevel, FileConfigProvider};
pub use memory::MemoryConfigProvider;
pub use settings::{
    ModelSettings, DEFAULT_PROVIDER, ENV_API_KEY, ENV_BASE_URL, ENV_MODEL, ENV_PROVIDER,
};
pub use traits::{ConfigError, ConfigFile, ConfigProvider, ConfigResult, ModelSection};
pub use validation::{validate_backend, validate_backends};
