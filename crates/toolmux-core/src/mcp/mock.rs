//! Scripted sessions for testing
//!
//! `MockSession` is `Clone` and shares its recorded state between clones, so
//! a test can hand one copy to the registry and inspect the other.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value;

use crate::types::{BackendDescriptor, Tool, ToolOutput};
use super::error::{McpError, McpResult};
use super::session::{BackendSession, SessionConnector};

#[derive(Debug, Default)]
struct MockState {
    calls: Mutex<Vec<(String, Value)>>,
    list_count: AtomicUsize,
    closed: AtomicBool,
}

/// A scripted backend session
#[derive(Debug, Clone, Default)]
pub struct MockSession {
    tools: Vec<Tool>,
    results: HashMap<String, Result<ToolOutput, String>>,
    list_failure: Option<String>,
    close_failure: Option<String>,
    state: Arc<MockState>,
}

impl MockSession {
    /// Create a session with no tools
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tool with an empty object schema
    pub fn with_tool(mut self, name: impl Into<String>, description: impl Into<String>) -> Self {
        let tool = Tool::new(name, description)
            .with_schema(serde_json::json!({"type": "object", "properties": {}}));
        self.tools.push(tool);
        self
    }

    /// Script the result of a tool
    ///
    /// Tools without a scripted result echo their arguments back.
    pub fn with_result(mut self, tool: impl Into<String>, output: ToolOutput) -> Self {
        self.results.insert(tool.into(), Ok(output));
        self
    }

    /// Make calls to a tool fail at the transport level
    pub fn with_call_failure(mut self, tool: impl Into<String>, message: impl Into<String>) -> Self {
        self.results.insert(tool.into(), Err(message.into()));
        self
    }

    /// Make `list_tools` fail
    pub fn with_list_failure(mut self, message: impl Into<String>) -> Self {
        self.list_failure = Some(message.into());
        self
    }

    /// Make `close` fail
    pub fn with_close_failure(mut self, message: impl Into<String>) -> Self {
        self.close_failure = Some(message.into());
        self
    }

    /// Calls received so far, as (tool, arguments)
    pub fn calls(&self) -> Vec<(String, Value)> {
        self.state
            .calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }

    /// Number of `list_tools` requests received
    pub fn list_count(&self) -> usize {
        self.state.list_count.load(Ordering::SeqCst)
    }

    /// Whether `close` has been called
    pub fn is_closed(&self) -> bool {
        self.state.closed.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BackendSession for MockSession {
    async fn list_tools(&self) -> McpResult<Vec<Tool>> {
        self.state.list_count.fetch_add(1, Ordering::SeqCst);
        match &self.list_failure {
            Some(message) => Err(McpError::Protocol(message.clone())),
            None => Ok(self.tools.clone()),
        }
    }

    async fn call_tool(&self, name: &str, arguments: Value) -> McpResult<ToolOutput> {
        if self.is_closed() {
            return Err(McpError::Closed);
        }
        self.state
            .calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push((name.to_string(), arguments.clone()));

        if !self.tools.iter().any(|t| t.name == name) {
            return Ok(ToolOutput::error(format!("Unknown tool: {}", name)));
        }

        match self.results.get(name) {
            Some(Ok(output)) => Ok(output.clone()),
            Some(Err(message)) => Err(McpError::ToolCallFailed(message.clone())),
            None => Ok(ToolOutput::structured(arguments)),
        }
    }

    async fn close(&mut self) -> McpResult<()> {
        self.state.closed.store(true, Ordering::SeqCst);
        match &self.close_failure {
            Some(message) => Err(McpError::Protocol(message.clone())),
            None => Ok(()),
        }
    }
}

/// Connector handing out scripted sessions by backend name
#[derive(Debug, Default)]
pub struct MockConnector {
    sessions: HashMap<String, MockSession>,
    failures: HashMap<String, String>,
    attempts: Mutex<Vec<String>>,
}

impl MockConnector {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `session` for the backend called `name`
    pub fn with_session(mut self, name: impl Into<String>, session: MockSession) -> Self {
        self.sessions.insert(name.into(), session);
        self
    }

    /// Refuse connections to the backend called `name`
    pub fn with_failure(mut self, name: impl Into<String>, message: impl Into<String>) -> Self {
        self.failures.insert(name.into(), message.into());
        self
    }

    /// Backend names connect was attempted for, in order
    pub fn attempts(&self) -> Vec<String> {
        self.attempts.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

#[async_trait]
impl SessionConnector for MockConnector {
    async fn connect(&self, descriptor: &BackendDescriptor) -> McpResult<Box<dyn BackendSession>> {
        self.attempts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(descriptor.name.clone());

        if let Some(message) = self.failures.get(&descriptor.name) {
            return Err(McpError::ConnectionFailed(message.clone()));
        }

        match self.sessions.get(&descriptor.name) {
            Some(session) => Ok(Box::new(session.clone())),
            None => Err(McpError::ConnectionFailed(format!(
                "no server listening for '{}'",
                descriptor.name
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_scripted_results() {
        let session = MockSession::new()
            .with_tool("lookup", "Find things")
            .with_tool("echo", "Echo arguments")
            .with_result("lookup", ToolOutput::structured(json!({"found": true})));

        let output = session.call_tool("lookup", json!({"q": "X"})).await.unwrap();
        assert_eq!(output.to_text(), r#"{"found":true}"#);

        let echoed = session.call_tool("echo", json!({"a": 1})).await.unwrap();
        assert_eq!(echoed.to_text(), r#"{"a":1}"#);

        let unknown = session.call_tool("missing", json!({})).await.unwrap();
        assert!(unknown.is_error);

        assert_eq!(session.calls().len(), 3);
    }

    #[tokio::test]
    async fn test_shared_state_between_clones() {
        let session = MockSession::new().with_tool("ping", "Ping");
        let mut handed_out = session.clone();

        handed_out.list_tools().await.unwrap();
        handed_out.close().await.unwrap();

        assert_eq!(session.list_count(), 1);
        assert!(session.is_closed());
    }

    #[tokio::test]
    async fn test_connector() {
        let connector = MockConnector::new()
            .with_session("a", MockSession::new())
            .with_failure("b", "connection refused");

        assert!(connector.connect(&BackendDescriptor::command("a", "x")).await.is_ok());
        assert!(matches!(
            connector.connect(&BackendDescriptor::command("b", "x")).await,
            Err(McpError::ConnectionFailed(_))
        ));
        assert!(connector.connect(&BackendDescriptor::command("c", "x")).await.is_err());
        assert_eq!(connector.attempts(), vec!["a", "b", "c"]);
    }
}
