//! MCP client using the official rmcp SDK
//!
//! Connects to tool servers over a child process's stdio, streamable HTTP,
//! or a Unix socket.

#[cfg(unix)]
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use rmcp::{
    model::{
        CallToolRequestParams, CallToolResult, ClientCapabilities, ClientInfo, Content,
        Implementation, RawContent,
    },
    service::RunningService,
    transport::{StreamableHttpClientTransport, TokioChildProcess},
    RoleClient, ServiceExt,
};
use serde_json::Value;

#[cfg(unix)]
use tokio::net::UnixStream;

use crate::logging::Logger;
use crate::types::{BackendDescriptor, BackendTransport, Tool, ToolOutput};
use super::command::PreparedCommand;
use super::error::{McpError, McpResult};
use super::session::{BackendSession, SessionConnector};

fn client_info() -> ClientInfo {
    ClientInfo {
        meta: None,
        protocol_version: Default::default(),
        capabilities: ClientCapabilities::default(),
        client_info: Implementation {
            name: "toolmux".to_string(),
            title: Some("toolmux".to_string()),
            version: env!("CARGO_PKG_VERSION").to_string(),
            website_url: None,
            icons: None,
        },
    }
}

/// MCP session to one tool server
pub struct McpClient {
    /// The underlying rmcp running service; `None` once closed
    client: Option<RunningService<RoleClient, ClientInfo>>,
    /// Backend name, for log lines
    label: String,
    /// Logger
    logger: Arc<dyn Logger>,
}

impl McpClient {
    /// Spawn a process and speak MCP over its stdio
    pub async fn connect_command(
        label: &str,
        command: &PreparedCommand,
        logger: Arc<dyn Logger>,
    ) -> McpResult<Self> {
        logger.info(&format!(
            "[McpClient] {}: spawning {} {:?}",
            label, command.program, command.args
        ));

        let transport = TokioChildProcess::new(command.to_command())
            .map_err(|e| McpError::ConnectionFailed(format!("{}: {}", command.program, e)))?;

        let client = client_info()
            .serve(transport)
            .await
            .map_err(|e| McpError::InitializationFailed(e.to_string()))?;

        Ok(Self::initialized(label, client, logger))
    }

    /// Connect to an MCP server over HTTP (Streamable HTTP transport)
    pub async fn connect_http(label: &str, url: &str, logger: Arc<dyn Logger>) -> McpResult<Self> {
        logger.info(&format!("[McpClient] {}: connecting to HTTP: {}", label, url));

        let transport = StreamableHttpClientTransport::from_uri(url);
        let client = client_info()
            .serve(transport)
            .await
            .map_err(|e| McpError::InitializationFailed(e.to_string()))?;

        Ok(Self::initialized(label, client, logger))
    }

    /// Connect to an MCP server over a Unix socket
    #[cfg(unix)]
    pub async fn connect_unix<P: AsRef<Path>>(
        label: &str,
        socket_path: P,
        logger: Arc<dyn Logger>,
    ) -> McpResult<Self> {
        let path = socket_path.as_ref();
        logger.info(&format!("[McpClient] {}: connecting to Unix socket: {:?}", label, path));

        let stream = UnixStream::connect(path)
            .await
            .map_err(|e| McpError::ConnectionFailed(format!("{:?}: {}", path, e)))?;

        let client = client_info()
            .serve(stream)
            .await
            .map_err(|e| McpError::InitializationFailed(e.to_string()))?;

        Ok(Self::initialized(label, client, logger))
    }

    fn initialized(
        label: &str,
        client: RunningService<RoleClient, ClientInfo>,
        logger: Arc<dyn Logger>,
    ) -> Self {
        logger.debug(&format!("[McpClient] {}: initialized", label));
        Self {
            client: Some(client),
            label: label.to_string(),
            logger,
        }
    }

    fn service(&self) -> McpResult<&RunningService<RoleClient, ClientInfo>> {
        self.client.as_ref().ok_or(McpError::Closed)
    }

    /// Get server info
    pub fn server_info(&self) -> Option<&Implementation> {
        self.client
            .as_ref()
            .and_then(|c| c.peer_info())
            .map(|info| &info.server_info)
    }
}

#[async_trait]
impl BackendSession for McpClient {
    async fn list_tools(&self) -> McpResult<Vec<Tool>> {
        let tools = self
            .service()?
            .list_all_tools()
            .await
            .map_err(|e| McpError::Protocol(e.to_string()))?;

        self.logger.debug(&format!(
            "[McpClient] {}: listed {} tools",
            self.label,
            tools.len()
        ));

        Ok(tools
            .into_iter()
            .map(|t| Tool {
                name: t.name.to_string(),
                description: t.description.map(|d| d.to_string()).unwrap_or_default(),
                input_schema: Some(Value::Object(t.input_schema.as_ref().clone())),
            })
            .collect())
    }

    async fn call_tool(&self, name: &str, arguments: Value) -> McpResult<ToolOutput> {
        self.logger.debug(&format!("[McpClient] {}: calling tool {}", self.label, name));

        let params = CallToolRequestParams {
            meta: None,
            name: name.to_owned().into(),
            arguments: arguments.as_object().cloned(),
            task: None,
        };

        let result = self
            .service()?
            .call_tool(params)
            .await
            .map_err(|e| McpError::ToolCallFailed(e.to_string()))?;

        Ok(tool_output(result))
    }

    async fn close(&mut self) -> McpResult<()> {
        let client = self.client.take().ok_or(McpError::Closed)?;
        self.logger.debug(&format!("[McpClient] {}: closing connection", self.label));
        client
            .cancel()
            .await
            .map_err(|e| McpError::Protocol(e.to_string()))?;
        Ok(())
    }
}

/// Convert an MCP call result into a `ToolOutput`
///
/// All-text content is joined with newlines. Otherwise the structured
/// content (if the server sent some and no text) or the raw content array
/// is kept as JSON.
pub fn tool_output(result: CallToolResult) -> ToolOutput {
    output_from_parts(
        &result.content,
        result.structured_content,
        result.is_error.unwrap_or(false),
    )
}

fn output_from_parts(content: &[Content], structured: Option<Value>, is_error: bool) -> ToolOutput {
    let texts: Vec<&str> = content
        .iter()
        .filter_map(|c| match &c.raw {
            RawContent::Text(t) => Some(t.text.as_str()),
            _ => None,
        })
        .collect();

    let mut output = if !content.is_empty() && texts.len() == content.len() {
        ToolOutput::text(texts.join("\n"))
    } else if let (true, Some(value)) = (texts.is_empty(), structured) {
        ToolOutput::structured(value)
    } else if content.is_empty() {
        ToolOutput::text(String::new())
    } else {
        ToolOutput::structured(serde_json::to_value(content).unwrap_or_default())
    };
    output.is_error = is_error;
    output
}

/// Connector that picks the rmcp transport from the descriptor kind
pub struct McpConnector {
    logger: Arc<dyn Logger>,
}

impl McpConnector {
    pub fn new(logger: Arc<dyn Logger>) -> Self {
        Self { logger }
    }
}

#[async_trait]
impl SessionConnector for McpConnector {
    async fn connect(&self, descriptor: &BackendDescriptor) -> McpResult<Box<dyn BackendSession>> {
        let logger = self.logger.clone();
        let name = descriptor.name.as_str();

        let client = match &descriptor.transport {
            BackendTransport::Command { command, args, env } => {
                let prepared = PreparedCommand::parse(command, args, env)?;
                McpClient::connect_command(name, &prepared, logger).await?
            }
            BackendTransport::Stream { url } => McpClient::connect_http(name, url, logger).await?,
            #[cfg(unix)]
            BackendTransport::Unix { path } => McpClient::connect_unix(name, path, logger).await?,
            #[cfg(not(unix))]
            BackendTransport::Unix { .. } => {
                return Err(McpError::Unsupported(
                    "unix sockets are not available on this platform".to_string(),
                ))
            }
        };

        Ok(Box::new(client))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_text_content_joined() {
        let content = vec![Content::text("line one"), Content::text("line two")];
        let output = output_from_parts(&content, None, false);
        assert_eq!(output.to_text(), "line one\nline two");
        assert!(!output.is_error);
    }

    #[test]
    fn test_structured_content() {
        let output = output_from_parts(&[], Some(json!({"found": true})), false);
        assert_eq!(output.to_text(), r#"{"found":true}"#);
    }

    #[test]
    fn test_error_flag_kept() {
        let output = output_from_parts(&[Content::text("no such collection")], None, true);
        assert!(output.is_error);
        assert_eq!(output.to_text(), "no such collection");
    }

    #[test]
    fn test_empty_result() {
        let output = output_from_parts(&[], None, false);
        assert_eq!(output.to_text(), "");
    }
}
