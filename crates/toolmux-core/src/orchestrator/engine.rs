//! The query loop
//!
//! Each query runs the same bounded sequence: one model request, one
//! sequential dispatch batch per choice that asks for tools, and one
//! follow-up request for that batch. Tool calls requested by the follow-up
//! itself are logged and dropped. Failures below the query level become
//! text in the conversation; only a failed model request is returned to the
//! caller.

use std::sync::Arc;

use crate::conversation::{Conversation, DEFAULT_SYSTEM_PROMPT};
use crate::logging::Logger;
use crate::mcp::SessionConnector;
use crate::providers::{ChatOptions, Completion, ModelGateway, ProviderModelConfig};
use crate::tools::{DispatchError, QualifiedToolName, SessionRegistry, SEPARATOR};
use crate::types::{BackendDescriptor, ChatMessage, Tool, ToolCall};
use super::error::{OrchestratorError, OrchestratorResult};

/// A backend that connected at startup
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectedBackend {
    pub name: String,
    pub tools: Vec<String>,
}

/// A backend that could not be connected at startup
#[derive(Debug, Clone, PartialEq)]
pub struct FailedBackend {
    pub name: String,
    pub error: String,
}

/// Outcome of connecting the enabled backends
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StartupReport {
    pub connected: Vec<ConnectedBackend>,
    pub failed: Vec<FailedBackend>,
}

/// Drives the conversation between the model and the tool servers
pub struct Orchestrator {
    registry: SessionRegistry,
    conversation: Conversation,
    gateway: Arc<dyn ModelGateway>,
    model: ProviderModelConfig,
    options: ChatOptions,
    logger: Arc<dyn Logger>,
}

impl Orchestrator {
    /// Create an orchestrator with no sessions and the default system prompt
    pub fn new(
        connector: Arc<dyn SessionConnector>,
        gateway: Arc<dyn ModelGateway>,
        model: ProviderModelConfig,
        logger: Arc<dyn Logger>,
    ) -> Self {
        Self {
            registry: SessionRegistry::new(connector, logger.clone()),
            conversation: Conversation::new(DEFAULT_SYSTEM_PROMPT),
            gateway,
            model,
            options: ChatOptions::default(),
            logger,
        }
    }

    /// Replace the system prompt (resets the conversation)
    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.conversation = Conversation::new(prompt);
        self
    }

    /// Set sampling options used for every request (tools are filled per query)
    pub fn with_options(mut self, options: ChatOptions) -> Self {
        self.options = options;
        self
    }

    /// Connect every enabled backend, in listed order
    ///
    /// Individual failures are logged and reported; it is only an error when
    /// nothing could be connected.
    pub async fn connect_all(
        &mut self,
        descriptors: &[BackendDescriptor],
    ) -> OrchestratorResult<StartupReport> {
        let mut report = StartupReport::default();
        let enabled: Vec<&BackendDescriptor> = descriptors.iter().filter(|d| d.enabled).collect();

        for descriptor in &enabled {
            match self.registry.connect(descriptor).await {
                Ok(tools) => report.connected.push(ConnectedBackend {
                    name: descriptor.name.clone(),
                    tools,
                }),
                Err(e) => {
                    self.logger.error(&format!("[Orchestrator] {}", e));
                    report.failed.push(FailedBackend {
                        name: descriptor.name.clone(),
                        error: e.to_string(),
                    });
                }
            }
        }

        if report.connected.is_empty() {
            return Err(OrchestratorError::NoBackendsConnected {
                attempted: enabled.len(),
            });
        }

        self.logger.info(&format!(
            "[Orchestrator] {} of {} servers connected",
            report.connected.len(),
            enabled.len()
        ));
        Ok(report)
    }

    /// Answer one user query
    ///
    /// Returns every text segment produced along the way (model text, tool
    /// traces and tool results) joined with newlines.
    pub async fn process_query(&mut self, query: &str) -> OrchestratorResult<String> {
        if self.registry.is_empty() {
            return Err(OrchestratorError::NoActiveSessions);
        }

        self.conversation.append(ChatMessage::user(query));

        let catalog: Vec<Tool> = self
            .registry
            .list_all_tools()
            .await
            .iter()
            .map(Tool::from)
            .collect();

        let completion = self.request(&catalog).await?;
        let mut reply = Vec::new();

        for choice in completion.choices {
            if let Some(text) = choice.non_empty_text() {
                self.conversation.append(ChatMessage::assistant(text));
                reply.push(text.to_string());
            }

            if choice.tool_calls.is_empty() {
                continue;
            }

            self.conversation
                .append(ChatMessage::assistant_tool_calls(choice.tool_calls.clone()));

            for call in &choice.tool_calls {
                let content = self.dispatch(call, &mut reply).await;
                self.conversation
                    .append(ChatMessage::tool_result(call.id.clone(), content));
            }

            let follow_up = self.request(&catalog).await?;
            self.absorb_follow_up(follow_up, &mut reply);
        }

        Ok(reply.join("\n"))
    }

    /// Reset the conversation; sessions are untouched
    pub fn clear_history(&mut self) {
        self.conversation.reset();
        self.logger.info("[Orchestrator] Conversation history cleared");
    }

    /// Close every session
    pub async fn shutdown(&mut self) {
        self.logger.info(&format!(
            "[Orchestrator] Closing {} sessions",
            self.registry.len()
        ));
        self.registry.close_all().await;
    }

    /// The conversation so far
    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// The live sessions
    pub fn registry(&self) -> &SessionRegistry {
        &self.registry
    }

    /// Mutable access to the live sessions (e.g. to disconnect one)
    pub fn registry_mut(&mut self) -> &mut SessionRegistry {
        &mut self.registry
    }

    async fn request(&self, catalog: &[Tool]) -> OrchestratorResult<Completion> {
        let options = self.options.clone().with_tools(catalog.to_vec());
        let messages = self.conversation.snapshot().to_vec();
        Ok(self.gateway.complete(messages, &self.model, options).await?)
    }

    /// Run one tool call and return the content for its tool turn
    async fn dispatch(&self, call: &ToolCall, reply: &mut Vec<String>) -> String {
        let (backend, tool) = split_for_trace(&call.name);
        let parsed = call.parse_arguments();
        let shown_args = match &parsed {
            Ok(value) => value.to_string(),
            Err(_) => call.arguments.clone(),
        };

        self.logger.info(&format!(
            "[Orchestrator] Calling tool {} on server {}",
            tool, backend
        ));
        reply.push(format!(
            "[Calling tool {} on server {} with args {}]",
            tool, backend, shown_args
        ));

        let result = match parsed {
            Ok(arguments) if arguments.is_object() => {
                self.registry.invoke(&call.name, arguments).await
            }
            Ok(arguments) => Err(DispatchError::InvalidArguments {
                tool: call.name.clone(),
                message: format!("expected a JSON object, got {}", json_kind(&arguments)),
            }),
            Err(e) => Err(DispatchError::InvalidArguments {
                tool: call.name.clone(),
                message: e.to_string(),
            }),
        };

        let content = match result {
            Ok(output) => output.to_text(),
            Err(e) => {
                self.logger.warn(&format!(
                    "[Orchestrator] Tool call {} ({}) failed: {}",
                    call.id, call.name, e
                ));
                format!("[Error: {}]", e)
            }
        };
        reply.push(content.clone());
        content
    }

    fn absorb_follow_up(&mut self, follow_up: Completion, reply: &mut Vec<String>) {
        for choice in follow_up.choices {
            if let Some(text) = choice.non_empty_text() {
                self.conversation.append(ChatMessage::assistant(text));
                reply.push(text.to_string());
            }
            if !choice.tool_calls.is_empty() {
                self.logger.warn(&format!(
                    "[Orchestrator] Ignoring {} tool calls requested in follow-up",
                    choice.tool_calls.len()
                ));
            }
        }
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

/// Backend and tool components for the trace line, even for bad names
fn split_for_trace(name: &str) -> (String, String) {
    match QualifiedToolName::parse(name) {
        Ok(qualified) => (qualified.backend().to_string(), qualified.tool().to_string()),
        Err(_) => match name.split_once(SEPARATOR) {
            Some((backend, tool)) => (backend.to_string(), tool.to_string()),
            None => ("unknown".to_string(), name.to_string()),
        },
    }
}

impl std::fmt::Debug for Orchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("registry", &self.registry)
            .field("turns", &self.conversation.len())
            .field("gateway", &self.gateway.name())
            .field("model", &self.model)
            .finish()
    }
}
