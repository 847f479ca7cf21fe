//! MCP (Model Context Protocol) sessions
//!
//! `BackendSession` is the capability the registry depends on. `McpClient`
//! implements it with the official rmcp SDK over child-process stdio,
//! streamable HTTP or a Unix socket; `McpConnector` picks the transport from
//! the backend descriptor.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use toolmux_core::logging::NoOpLogger;
//! use toolmux_core::mcp::{McpConnector, SessionConnector};
//! use toolmux_core::types::BackendDescriptor;
//!
//! let connector = McpConnector::new(Arc::new(NoOpLogger::new()));
//! let descriptor = BackendDescriptor::stream("demo", "http://localhost:3001/mcp");
//!
//! let session = connector.connect(&descriptor).await?;
//! let tools = session.list_tools().await?;
//! let result = session.call_tool("lookup", json!({"q": "X"})).await?;
//! ```

mod client;
mod command;
mod error;
mod mock;
mod session;

pub use client::{tool_output, McpClient, McpConnector};
pub use command::{expand_home, PreparedCommand};
pub use error::{McpError, McpResult};
pub use mock::{MockConnector, MockSession};
pub use session::{BackendSession, SessionConnector};
