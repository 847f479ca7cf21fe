//! Session registry: live backend sessions and tool dispatch
//!
//! The registry owns every connected session, keyed by backend name and kept
//! in connection order. It aggregates tool catalogs under qualified names
//! and routes calls back to the owning backend. Per-backend failures are
//! isolated: a backend that cannot list its tools is left out of the catalog
//! and a backend that fails to close does not stop the others from closing.

use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use crate::logging::Logger;
use crate::mcp::{BackendSession, McpError, SessionConnector};
use crate::types::{BackendDescriptor, Tool, ToolOutput};
use super::qualified::{validate_backend_name, NameError, QualifiedToolName};

/// One aggregated catalog entry, as offered to the model
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    /// Qualified tool name (`<backend>__<tool>`)
    pub name: QualifiedToolName,
    /// Description prefixed with the owning backend
    pub description: String,
    /// JSON Schema for the tool parameters
    pub input_schema: Value,
}

impl From<&CatalogEntry> for Tool {
    fn from(entry: &CatalogEntry) -> Self {
        Tool {
            name: entry.name.to_string(),
            description: entry.description.clone(),
            input_schema: Some(entry.input_schema.clone()),
        }
    }
}

/// Failures while adding a backend
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Failed to connect to server '{backend}': {source}")]
    Connection {
        backend: String,
        #[source]
        source: McpError,
    },

    #[error("Server '{0}' is already connected")]
    DuplicateBackend(String),

    #[error("Invalid server name: {0}")]
    InvalidName(#[from] NameError),
}

/// A backend-reported failure executing a tool
#[derive(Error, Debug, Clone, PartialEq)]
#[error("{message}")]
pub struct ToolError {
    pub backend: String,
    pub tool: String,
    pub message: String,
}

/// Failures routing or executing a tool call
#[derive(Error, Debug)]
pub enum DispatchError {
    #[error("Server {0} not found")]
    UnknownBackend(String),

    #[error("Invalid tool name: {0}")]
    InvalidToolName(#[from] NameError),

    #[error("Invalid arguments for {tool}: {message}")]
    InvalidArguments { tool: String, message: String },

    #[error("Server {backend} failed: {source}")]
    Transport {
        backend: String,
        #[source]
        source: McpError,
    },

    #[error(transparent)]
    Tool(#[from] ToolError),
}

struct Entry {
    name: String,
    session: Box<dyn BackendSession>,
}

/// Registry of live backend sessions
pub struct SessionRegistry {
    connector: Arc<dyn SessionConnector>,
    sessions: Vec<Entry>,
    logger: Arc<dyn Logger>,
}

impl SessionRegistry {
    /// Create an empty registry that opens sessions through `connector`
    pub fn new(connector: Arc<dyn SessionConnector>, logger: Arc<dyn Logger>) -> Self {
        Self {
            connector,
            sessions: Vec::new(),
            logger,
        }
    }

    /// Connect to a backend and register the session under its name
    ///
    /// Returns the backend-local names of the tools it reported, for
    /// diagnostics. A failed connect never enters the registry.
    pub async fn connect(&mut self, descriptor: &BackendDescriptor) -> Result<Vec<String>, RegistryError> {
        validate_backend_name(&descriptor.name)?;
        if self.contains(&descriptor.name) {
            return Err(RegistryError::DuplicateBackend(descriptor.name.clone()));
        }

        self.logger.info(&format!(
            "[SessionRegistry] Connecting to server '{}' ({})",
            descriptor.name,
            descriptor.kind()
        ));

        let connection_error = |source| RegistryError::Connection {
            backend: descriptor.name.clone(),
            source,
        };

        let mut session = self
            .connector
            .connect(descriptor)
            .await
            .map_err(connection_error)?;

        let tools = match session.list_tools().await {
            Ok(tools) => tools,
            Err(e) => {
                if let Err(close_err) = session.close().await {
                    self.logger.warn(&format!(
                        "[SessionRegistry] Failed to close '{}' after handshake failure: {}",
                        descriptor.name, close_err
                    ));
                }
                return Err(connection_error(e));
            }
        };

        let names: Vec<String> = tools.into_iter().map(|t| t.name).collect();
        self.logger.info(&format!(
            "[SessionRegistry] Connected to server '{}' with tools: {:?}",
            descriptor.name, names
        ));

        self.sessions.push(Entry {
            name: descriptor.name.clone(),
            session,
        });
        Ok(names)
    }

    /// Register an already-open session
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        session: Box<dyn BackendSession>,
    ) -> Result<(), RegistryError> {
        let name = name.into();
        validate_backend_name(&name)?;
        if self.contains(&name) {
            return Err(RegistryError::DuplicateBackend(name));
        }
        self.sessions.push(Entry { name, session });
        Ok(())
    }

    /// Close and remove one session
    ///
    /// Returns `false` if no session was registered under `name`.
    pub async fn disconnect(&mut self, name: &str) -> bool {
        let Some(pos) = self.sessions.iter().position(|e| e.name == name) else {
            return false;
        };

        let mut entry = self.sessions.remove(pos);
        match entry.session.close().await {
            Ok(()) => self.logger.info(&format!("[SessionRegistry] Disconnected from '{}'", name)),
            Err(e) => self.logger.error(&format!(
                "[SessionRegistry] Error closing '{}': {}",
                name, e
            )),
        }
        true
    }

    /// Aggregate the tool catalogs of every live session
    ///
    /// Queried fresh on each call. A backend whose listing fails is skipped
    /// with a warning; tools whose names cannot be qualified are skipped too.
    pub async fn list_all_tools(&self) -> Vec<CatalogEntry> {
        let mut catalog = Vec::new();

        for entry in &self.sessions {
            let tools = match entry.session.list_tools().await {
                Ok(tools) => tools,
                Err(e) => {
                    self.logger.warn(&format!(
                        "[SessionRegistry] Failed to list tools for '{}': {}",
                        entry.name, e
                    ));
                    continue;
                }
            };

            for tool in tools {
                let name = match QualifiedToolName::new(&entry.name, &tool.name) {
                    Ok(name) => name,
                    Err(e) => {
                        self.logger.warn(&format!(
                            "[SessionRegistry] Skipping tool '{}' on '{}': {}",
                            tool.name, entry.name, e
                        ));
                        continue;
                    }
                };

                catalog.push(CatalogEntry {
                    name,
                    description: format!("[{}] {}", entry.name, tool.description),
                    input_schema: tool
                        .input_schema
                        .unwrap_or_else(|| serde_json::json!({"type": "object", "properties": {}})),
                });
            }
        }

        self.logger.debug(&format!(
            "[SessionRegistry] Catalog has {} tools from {} servers",
            catalog.len(),
            self.sessions.len()
        ));
        catalog
    }

    /// Route a call to the backend named in `qualified`
    pub async fn invoke(&self, qualified: &str, arguments: Value) -> Result<ToolOutput, DispatchError> {
        let name = QualifiedToolName::parse(qualified)?;

        let entry = self
            .sessions
            .iter()
            .find(|e| e.name == name.backend())
            .ok_or_else(|| DispatchError::UnknownBackend(name.backend().to_string()))?;

        let output = entry
            .session
            .call_tool(name.tool(), arguments)
            .await
            .map_err(|source| DispatchError::Transport {
                backend: entry.name.clone(),
                source,
            })?;

        if output.is_error {
            return Err(ToolError {
                backend: entry.name.clone(),
                tool: name.tool().to_string(),
                message: output.to_text(),
            }
            .into());
        }
        Ok(output)
    }

    /// Close every session, logging individual failures
    ///
    /// The registry is empty afterwards.
    pub async fn close_all(&mut self) {
        for mut entry in self.sessions.drain(..) {
            match entry.session.close().await {
                Ok(()) => self
                    .logger
                    .debug(&format!("[SessionRegistry] Closed '{}'", entry.name)),
                Err(e) => self.logger.error(&format!(
                    "[SessionRegistry] Error closing '{}': {}",
                    entry.name, e
                )),
            }
        }
    }

    /// Names of the live sessions, in connection order
    pub fn backend_names(&self) -> Vec<&str> {
        self.sessions.iter().map(|e| e.name.as_str()).collect()
    }

    /// Whether a session is registered under `name`
    pub fn contains(&self, name: &str) -> bool {
        self.sessions.iter().any(|e| e.name == name)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}

impl std::fmt::Debug for SessionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionRegistry")
            .field("sessions", &self.backend_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::{LogLevel, MemoryLogger, NoOpLogger};
    use crate::mcp::{MockConnector, MockSession};
    use serde_json::json;

    fn registry_with(connector: MockConnector) -> SessionRegistry {
        SessionRegistry::new(Arc::new(connector), Arc::new(NoOpLogger::new()))
    }

    #[tokio::test]
    async fn test_connect_reports_tools() {
        let alpha = MockSession::new().with_tool("lookup", "Find a record");
        let mut registry = registry_with(MockConnector::new().with_session("alpha", alpha));

        let tools = registry
            .connect(&BackendDescriptor::command("alpha", "node alpha.js"))
            .await
            .unwrap();
        assert_eq!(tools, vec!["lookup"]);
        assert!(registry.contains("alpha"));
    }

    #[tokio::test]
    async fn test_failed_connect_not_registered() {
        let mut registry = registry_with(MockConnector::new().with_failure("down", "refused"));

        let err = registry
            .connect(&BackendDescriptor::stream("down", "http://localhost:1/mcp"))
            .await
            .unwrap_err();
        assert!(matches!(err, RegistryError::Connection { ref backend, .. } if backend == "down"));
        assert!(registry.is_empty());
    }

    #[tokio::test]
    async fn test_failed_listing_at_connect_closes_session() {
        let broken = MockSession::new().with_list_failure("handshake timeout");
        let mut registry = registry_with(MockConnector::new().with_session("broken", broken.clone()));

        assert!(registry
            .connect(&BackendDescriptor::command("broken", "x"))
            .await
            .is_err());
        assert!(registry.is_empty());
        assert!(broken.is_closed());
    }

    #[tokio::test]
    async fn test_duplicate_and_invalid_names() {
        let mut registry = registry_with(MockConnector::new().with_session("a", MockSession::new()));
        registry.connect(&BackendDescriptor::command("a", "x")).await.unwrap();

        assert!(matches!(
            registry.connect(&BackendDescriptor::command("a", "x")).await,
            Err(RegistryError::DuplicateBackend(_))
        ));
        assert!(matches!(
            registry.insert("bad__name", Box::new(MockSession::new())),
            Err(RegistryError::InvalidName(_))
        ));
    }

    #[tokio::test]
    async fn test_same_tool_on_two_backends() {
        let mut registry = registry_with(MockConnector::new());
        registry
            .insert("a", Box::new(MockSession::new().with_tool("ping", "Ping a")))
            .unwrap();
        registry
            .insert("b", Box::new(MockSession::new().with_tool("ping", "Ping b")))
            .unwrap();

        let catalog = registry.list_all_tools().await;
        let names: Vec<String> = catalog.iter().map(|e| e.name.to_string()).collect();
        assert_eq!(names, vec!["a__ping", "b__ping"]);
        assert_eq!(catalog[0].description, "[a] Ping a");

        let tool: Tool = (&catalog[1]).into();
        assert_eq!(tool.name, "b__ping");
    }

    #[tokio::test]
    async fn test_catalog_skips_failing_backend() {
        let logger = Arc::new(MemoryLogger::new());
        let mut registry = SessionRegistry::new(Arc::new(MockConnector::new()), logger.clone());
        registry
            .insert("up", Box::new(MockSession::new().with_tool("ping", "Ping")))
            .unwrap();
        registry
            .insert("down", Box::new(MockSession::new().with_list_failure("broken pipe")))
            .unwrap();

        let catalog = registry.list_all_tools().await;
        assert_eq!(catalog.len(), 1);
        assert_eq!(catalog[0].name.backend(), "up");
        assert!(logger.contains(LogLevel::Warn, "down"));
    }

    #[tokio::test]
    async fn test_catalog_is_recomputed() {
        let session = MockSession::new().with_tool("ping", "Ping");
        let mut registry = registry_with(MockConnector::new());
        registry.insert("a", Box::new(session.clone())).unwrap();

        registry.list_all_tools().await;
        registry.list_all_tools().await;
        assert_eq!(session.list_count(), 2);
    }

    #[tokio::test]
    async fn test_invoke_routes_to_backend() {
        let alpha = MockSession::new()
            .with_tool("lookup", "Find")
            .with_result("lookup", ToolOutput::structured(json!({"found": true})));
        let mut registry = registry_with(MockConnector::new());
        registry.insert("alpha", Box::new(alpha.clone())).unwrap();

        let output = registry.invoke("alpha__lookup", json!({"q": "X"})).await.unwrap();
        assert_eq!(output.to_text(), r#"{"found":true}"#);
        assert_eq!(alpha.calls(), vec![("lookup".to_string(), json!({"q": "X"}))]);
    }

    #[tokio::test]
    async fn test_invoke_failures() {
        let alpha = MockSession::new()
            .with_tool("fails", "Always fails")
            .with_tool("broken", "Transport dies")
            .with_result("fails", ToolOutput::error("collection not found"))
            .with_call_failure("broken", "pipe closed");
        let mut registry = registry_with(MockConnector::new());
        registry.insert("alpha", Box::new(alpha)).unwrap();

        match registry.invoke("ghost__lookup", json!({})).await {
            Err(DispatchError::UnknownBackend(name)) => assert_eq!(name, "ghost"),
            other => panic!("expected unknown backend, got {:?}", other),
        }

        match registry.invoke("alpha__fails", json!({})).await {
            Err(DispatchError::Tool(e)) => {
                assert_eq!(e.backend, "alpha");
                assert_eq!(e.message, "collection not found");
            }
            other => panic!("expected tool error, got {:?}", other),
        }

        assert!(matches!(
            registry.invoke("alpha__broken", json!({})).await,
            Err(DispatchError::Transport { .. })
        ));
        assert!(matches!(
            registry.invoke("lookup", json!({})).await,
            Err(DispatchError::InvalidToolName(_))
        ));
    }

    #[tokio::test]
    async fn test_close_all_tolerates_failures() {
        let a = MockSession::new().with_close_failure("already gone");
        let b = MockSession::new();
        let logger = Arc::new(MemoryLogger::new());
        let mut registry = SessionRegistry::new(Arc::new(MockConnector::new()), logger.clone());
        registry.insert("a", Box::new(a.clone())).unwrap();
        registry.insert("b", Box::new(b.clone())).unwrap();

        registry.close_all().await;

        assert!(registry.is_empty());
        assert!(a.is_closed());
        assert!(b.is_closed());
        assert!(logger.contains(LogLevel::Error, "already gone"));
    }

    #[tokio::test]
    async fn test_disconnect() {
        let a = MockSession::new();
        let mut registry = registry_with(MockConnector::new());
        registry.insert("a", Box::new(a.clone())).unwrap();

        assert!(registry.disconnect("a").await);
        assert!(a.is_closed());
        assert!(!registry.disconnect("a").await);
        assert!(registry.backend_names().is_empty());
    }
}
