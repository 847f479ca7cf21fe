//! toolmux core
//!
//! Runtime-agnostic tool orchestration between a chat-completion model and
//! any number of MCP tool servers. The host (the `toolmux` CLI, or anything
//! embedding this crate) supplies configuration, a logger and an input loop.
//!
//! ## Query loop
//!
//! The `orchestrator` module owns the conversation and the live sessions.
//! Tools from every backend are offered to the model under qualified names
//! (`<backend>__<tool>`) and each requested call is routed back to its
//! backend:
//!
//! ```rust,ignore
//! use toolmux_core::orchestrator::Orchestrator;
//! use toolmux_core::mcp::McpConnector;
//! use toolmux_core::providers::{GenaiGateway, ProviderModelConfig};
//!
//! let mut orchestrator = Orchestrator::new(
//!     Arc::new(McpConnector::new(logger.clone())),
//!     Arc::new(GenaiGateway::new("openai", logger.clone())),
//!     ProviderModelConfig::from(&settings),
//!     logger,
//! );
//!
//! orchestrator.connect_all(&backends).await?;
//! let reply = orchestrator.process_query("find X").await?;
//! orchestrator.shutdown().await;
//! ```

pub mod config;
pub mod conversation;
pub mod logging;
pub mod mcp;
pub mod orchestrator;
pub mod providers;
pub mod secrets;
pub mod tools;
pub mod types;

// Re-export commonly used types
pub use types::{
    BackendDescriptor, BackendKind, BackendTransport, ChatMessage, ContentPart, MessageContent,
    MessageRole, Tool, ToolCall, ToolChoice, ToolContent, ToolOutput,
};

pub use secrets::{EnvSecretStore, MemorySecretStore, SecretStore};

pub use logging::{Logger, NoOpLogger, SharedLogger, TracingLogger};

pub use config::{
    ConfigError, ConfigProvider, FileConfigProvider, MemoryConfigProvider, ModelSettings,
};

pub use conversation::{Conversation, DEFAULT_SYSTEM_PROMPT};

pub use mcp::{BackendSession, McpClient, McpConnector, McpError, McpResult, SessionConnector};

pub use tools::{
    CatalogEntry, DispatchError, QualifiedToolName, RegistryError, SessionRegistry, ToolError,
};

pub use providers::{Completion, GenaiGateway, ModelGateway, ProviderError, ProviderModelConfig};

pub use orchestrator::{ControlInput, Orchestrator, OrchestratorError, StartupReport};
