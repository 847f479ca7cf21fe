//! Tool/function calling types

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Tool definition for function calling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tool {
    /// Tool name (function name)
    pub name: String,
    /// Description of what the tool does
    pub description: String,
    /// JSON Schema for the input parameters
    #[serde(rename = "inputSchema", skip_serializing_if = "Option::is_none")]
    pub input_schema: Option<Value>,
}

impl Tool {
    /// Create a new tool definition
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema: None,
        }
    }

    /// Set the input schema
    pub fn with_schema(mut self, schema: Value) -> Self {
        self.input_schema = Some(schema);
        self
    }
}

/// Tool call requested by the model
///
/// `arguments` is kept as the raw JSON text the model produced; it is only
/// parsed at dispatch time so a malformed payload can be reported back to the
/// model instead of failing the whole round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    /// Unique identifier for this tool call
    pub id: String,
    /// Qualified name of the tool being called
    pub name: String,
    /// Arguments as JSON text
    pub arguments: String,
}

impl ToolCall {
    /// Create a new tool call
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments: arguments.into(),
        }
    }

    /// Create a tool call from already-structured arguments
    pub fn with_value(id: impl Into<String>, name: impl Into<String>, arguments: &Value) -> Self {
        Self::new(id, name, arguments.to_string())
    }

    /// Parse the argument payload
    ///
    /// An empty payload is treated as an empty object.
    pub fn parse_arguments(&self) -> Result<Value, serde_json::Error> {
        if self.arguments.trim().is_empty() {
            return Ok(Value::Object(Default::default()));
        }
        serde_json::from_str(&self.arguments)
    }
}

/// Tool choice option for requests
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolChoice {
    /// Let the model decide whether to use tools
    #[default]
    Auto,
    /// Don't use tools
    None,
    /// Force tool use
    Required,
}

/// Content returned by a backend tool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ToolContent {
    /// Plain text result
    Text(String),
    /// Structured result
    Structured(Value),
}

/// Result of invoking a tool on a backend
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolOutput {
    /// The result content
    pub content: ToolContent,
    /// Whether the backend reported this result as a failure
    #[serde(rename = "isError", default, skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

impl ToolOutput {
    /// Create a successful text result
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            content: ToolContent::Text(text.into()),
            is_error: false,
        }
    }

    /// Create a successful structured result
    pub fn structured(value: Value) -> Self {
        Self {
            content: ToolContent::Structured(value),
            is_error: false,
        }
    }

    /// Create a backend-reported failure
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            content: ToolContent::Text(message.into()),
            is_error: true,
        }
    }

    /// Textual form fed back to the model
    ///
    /// Text passes through unchanged; structured content is encoded as
    /// compact JSON.
    pub fn to_text(&self) -> String {
        match &self.content {
            ToolContent::Text(text) => text.clone(),
            ToolContent::Structured(value) => value.to_string(),
        }
    }
}
