//! Backend (tool server) descriptors

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Identity and connection recipe for one tool server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackendDescriptor {
    /// Unique backend name, used as the qualified tool name prefix
    pub name: String,
    /// How to reach the backend
    #[serde(flatten)]
    pub transport: BackendTransport,
    /// Whether to connect at startup (default: true)
    #[serde(default = "default_enabled", alias = "isEnabled", alias = "isOpen")]
    pub enabled: bool,
}

fn default_enabled() -> bool {
    true
}

/// Kind-specific connection parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum BackendTransport {
    /// Spawn a process and speak MCP over its stdio
    #[serde(alias = "process-command")]
    Command {
        /// Command line; split on whitespace into program and arguments
        command: String,
        /// Extra arguments appended after those in `command`
        #[serde(default, skip_serializing_if = "Vec::is_empty")]
        args: Vec<String>,
        /// Extra environment variables for the child
        #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
        env: BTreeMap<String, String>,
    },
    /// Connect to a network endpoint (streamable HTTP)
    #[serde(alias = "network-stream", alias = "sse", alias = "http")]
    Stream {
        url: String,
    },
    /// Connect to a Unix domain socket
    Unix {
        path: PathBuf,
    },
}

/// Backend kind, without connection parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackendKind {
    Command,
    Stream,
    Unix,
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendKind::Command => write!(f, "process-command"),
            BackendKind::Stream => write!(f, "network-stream"),
            BackendKind::Unix => write!(f, "unix-socket"),
        }
    }
}

impl BackendDescriptor {
    /// Create a descriptor for a process-command backend
    pub fn command(name: impl Into<String>, command: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transport: BackendTransport::Command {
                command: command.into(),
                args: Vec::new(),
                env: BTreeMap::new(),
            },
            enabled: true,
        }
    }

    /// Create a descriptor for a network-stream backend
    pub fn stream(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transport: BackendTransport::Stream { url: url.into() },
            enabled: true,
        }
    }

    /// Create a descriptor for a Unix socket backend
    pub fn unix(name: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            transport: BackendTransport::Unix { path: path.into() },
            enabled: true,
        }
    }

    /// Disable the backend
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    /// The backend kind
    pub fn kind(&self) -> BackendKind {
        match self.transport {
            BackendTransport::Command { .. } => BackendKind::Command,
            BackendTransport::Stream { .. } => BackendKind::Stream,
            BackendTransport::Unix { .. } => BackendKind::Unix,
        }
    }
}
