//! Model gateway trait definition

use async_trait::async_trait;

use crate::config::ModelSettings;
use crate::types::{ChatMessage, Tool, ToolCall, ToolChoice};
use super::error::ProviderResult;

/// Model configuration for gateway requests
#[derive(Clone, PartialEq)]
pub struct ProviderModelConfig {
    /// Model identifier as used by the provider's API
    pub model: String,
    /// API key for authentication
    pub api_key: Option<String>,
    /// Custom API base URL
    pub api_base: Option<String>,
}

impl ProviderModelConfig {
    /// Create a new model config
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            api_key: None,
            api_base: None,
        }
    }

    /// Set the API key
    pub fn with_api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set the API base URL
    pub fn with_api_base(mut self, base: impl Into<String>) -> Self {
        self.api_base = Some(base.into());
        self
    }
}

impl From<&ModelSettings> for ProviderModelConfig {
    fn from(settings: &ModelSettings) -> Self {
        Self::new(settings.model.clone())
            .with_api_key(settings.api_key.clone())
            .with_api_base(settings.api_base.clone())
    }
}

impl std::fmt::Debug for ProviderModelConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderModelConfig")
            .field("model", &self.model)
            .field("api_key", &self.api_key.as_ref().map(|_| "***"))
            .field("api_base", &self.api_base)
            .finish()
    }
}

/// Options for a chat completion request
#[derive(Debug, Clone, Default)]
pub struct ChatOptions {
    /// Temperature for response generation (0.0 - 2.0)
    pub temperature: Option<f32>,
    /// Maximum tokens to generate
    pub max_tokens: Option<u32>,
    /// Tools available for the model to use
    pub tools: Vec<Tool>,
    /// Tool choice behavior
    pub tool_choice: ToolChoice,
}

impl ChatOptions {
    /// Create new options with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Set temperature
    pub fn with_temperature(mut self, temp: f32) -> Self {
        self.temperature = Some(temp);
        self
    }

    /// Set max tokens
    pub fn with_max_tokens(mut self, tokens: u32) -> Self {
        self.max_tokens = Some(tokens);
        self
    }

    /// Set tools
    pub fn with_tools(mut self, tools: Vec<Tool>) -> Self {
        self.tools = tools;
        self
    }

    /// Set tool choice
    pub fn with_tool_choice(mut self, choice: ToolChoice) -> Self {
        self.tool_choice = choice;
        self
    }
}

/// One response choice: optional text plus the tool calls it requests
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Choice {
    pub text: Option<String>,
    pub tool_calls: Vec<ToolCall>,
}

impl Choice {
    /// A text-only choice
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            tool_calls: Vec::new(),
        }
    }

    /// A choice requesting tool calls
    pub fn tool_calls(calls: Vec<ToolCall>) -> Self {
        Self {
            text: None,
            tool_calls: calls,
        }
    }

    /// The text, if present and non-empty
    pub fn non_empty_text(&self) -> Option<&str> {
        self.text.as_deref().filter(|t| !t.is_empty())
    }
}

/// Gateway response
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Completion {
    pub choices: Vec<Choice>,
}

impl Completion {
    /// A completion with a single choice
    pub fn single(choice: Choice) -> Self {
        Self {
            choices: vec![choice],
        }
    }

    /// A completion with a single text choice
    pub fn text(text: impl Into<String>) -> Self {
        Self::single(Choice::text(text))
    }

    /// A completion with a single tool-call choice
    pub fn tool_calls(calls: Vec<ToolCall>) -> Self {
        Self::single(Choice::tool_calls(calls))
    }

    /// Whether any choice requests a tool call
    pub fn has_tool_calls(&self) -> bool {
        self.choices.iter().any(|c| !c.tool_calls.is_empty())
    }
}

/// Chat-completion capability used by the orchestrator
///
/// Implementations:
/// - `GenaiGateway`: Any genai-supported or OpenAI-compatible endpoint
/// - `MockGateway`: Scripted responses for tests
#[async_trait]
pub trait ModelGateway: Send + Sync {
    /// Get the gateway name (e.g., "openai")
    fn name(&self) -> &str;

    /// Request a completion for the full conversation
    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        model: &ProviderModelConfig,
        options: ChatOptions,
    ) -> ProviderResult<Completion>;
}
