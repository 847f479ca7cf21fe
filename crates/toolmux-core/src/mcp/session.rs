//! Backend session capability
//!
//! One interface over every transport. The registry only ever talks to
//! `dyn BackendSession`, so rmcp-backed sessions and test doubles are
//! interchangeable.

use async_trait::async_trait;
use serde_json::Value;

use crate::types::{BackendDescriptor, Tool, ToolOutput};
use super::error::McpResult;

/// A connected handle to one tool server
#[async_trait]
pub trait BackendSession: Send + Sync {
    /// Query the backend's current tool list
    async fn list_tools(&self) -> McpResult<Vec<Tool>>;

    /// Invoke a backend-local tool
    ///
    /// A result the backend flags as an error is returned as `Ok` with
    /// `is_error` set; `Err` is reserved for transport and protocol failures.
    async fn call_tool(&self, name: &str, arguments: Value) -> McpResult<ToolOutput>;

    /// Close the transport
    async fn close(&mut self) -> McpResult<()>;
}

/// Opens sessions from descriptors
#[async_trait]
pub trait SessionConnector: Send + Sync {
    /// Establish the transport for `descriptor` and complete the handshake
    async fn connect(&self, descriptor: &BackendDescriptor) -> McpResult<Box<dyn BackendSession>>;
}
