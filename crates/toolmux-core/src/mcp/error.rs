//! MCP session errors

use thiserror::Error;

/// MCP client errors
#[derive(Error, Debug)]
pub enum McpError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Initialization failed: {0}")]
    InitializationFailed(String),

    #[error("Tool call failed: {0}")]
    ToolCallFailed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Session already closed")]
    Closed,

    #[error("Unsupported transport: {0}")]
    Unsupported(String),
}

pub type McpResult<T> = Result<T, McpError>;
