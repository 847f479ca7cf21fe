//! Adapter between toolmux types and genai types
//!
//! Tool-call arguments travel as raw JSON text on our side and as a
//! `serde_json::Value` on genai's. Going out, text that does not parse is
//! carried as a JSON string so history is replayed as recorded. Coming back,
//! genai's OpenAI adapter parses argument text itself and fails the whole
//! response when it is not valid JSON, so such a reply surfaces as a
//! `ProviderError` rather than as a tool call.

use std::future::Future;
use std::pin::Pin;

use genai::chat::{
    ChatMessage as GenaiMessage, ChatOptions as GenaiOptions, ChatResponse, ChatRole as GenaiRole,
    MessageContent as GenaiContent, Tool as GenaiTool, ToolCall as GenaiToolCall,
    ToolResponse as GenaiToolResponse,
};
use genai::resolver::{AuthData, AuthResolver, Endpoint, ServiceTargetResolver};
use genai::{adapter::AdapterKind, Client, ModelIden, ServiceTarget};
use serde_json::{json, Value};

use crate::types::{ChatMessage, ContentPart, MessageContent, MessageRole, Tool, ToolCall};
use super::error::ProviderResult;
use super::traits::{ChatOptions, Choice, Completion};

// ============================================================================
// Message Conversion: toolmux -> genai
// ============================================================================

/// Convert a role to genai's role
pub fn to_genai_role(role: MessageRole) -> GenaiRole {
    match role {
        MessageRole::System => GenaiRole::System,
        MessageRole::User => GenaiRole::User,
        MessageRole::Assistant => GenaiRole::Assistant,
        MessageRole::Tool => GenaiRole::Tool,
    }
}

/// Convert a tool call to genai's representation
pub fn to_genai_tool_call(call: &ToolCall) -> ProviderResult<GenaiToolCall> {
    let arguments = match serde_json::from_str::<Value>(&call.arguments) {
        Ok(value) => value,
        Err(_) => Value::String(call.arguments.clone()),
    };

    let genai_call = serde_json::from_value(json!({
        "call_id": call.id,
        "fn_name": call.name,
        "fn_arguments": arguments,
    }))?;
    Ok(genai_call)
}

/// Convert one conversation turn to a genai message
///
/// Assistant tool-call turns and tool result turns map to genai's dedicated
/// message forms; everything else is plain text under its role.
pub fn to_genai_message(msg: ChatMessage) -> ProviderResult<GenaiMessage> {
    let parts = match msg.content {
        MessageContent::Text(text) => return Ok(text_message(msg.role, text)),
        MessageContent::Parts(parts) => parts,
    };

    let calls: Vec<&ToolCall> = parts
        .iter()
        .filter_map(|p| match p {
            ContentPart::ToolCall { tool_call } => Some(tool_call),
            _ => None,
        })
        .collect();
    if !calls.is_empty() {
        let genai_calls = calls
            .into_iter()
            .map(to_genai_tool_call)
            .collect::<ProviderResult<Vec<_>>>()?;
        return Ok(GenaiMessage::from(genai_calls));
    }

    if let Some((call_id, content)) = parts.iter().find_map(|p| match p {
        ContentPart::ToolResult { call_id, content } => Some((call_id.clone(), content.clone())),
        _ => None,
    }) {
        return Ok(GenaiMessage::from(GenaiToolResponse::new(call_id, content)));
    }

    let text = parts
        .into_iter()
        .filter_map(|p| match p {
            ContentPart::Text { text } => Some(text),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("\n");
    Ok(text_message(msg.role, text))
}

fn text_message(role: MessageRole, text: String) -> GenaiMessage {
    let content = GenaiContent::from(text);
    match role {
        MessageRole::System => GenaiMessage::system(content),
        MessageRole::User | MessageRole::Tool => GenaiMessage::user(content),
        MessageRole::Assistant => GenaiMessage::assistant(content),
    }
}

/// Convert the full conversation
pub fn to_genai_messages(messages: Vec<ChatMessage>) -> ProviderResult<Vec<GenaiMessage>> {
    messages.into_iter().map(to_genai_message).collect()
}

// ============================================================================
// Tool and Options Conversion: toolmux -> genai
// ============================================================================

/// Convert a tool definition to genai's tool
pub fn to_genai_tool(tool: Tool) -> GenaiTool {
    let mut genai_tool = GenaiTool::new(&tool.name).with_description(&tool.description);

    if let Some(schema) = tool.input_schema {
        genai_tool = genai_tool.with_schema(schema);
    }

    genai_tool
}

/// Convert tool definitions to genai tools
pub fn to_genai_tools(tools: Vec<Tool>) -> Vec<GenaiTool> {
    tools.into_iter().map(to_genai_tool).collect()
}

/// Convert request options to genai's options
pub fn to_genai_options(options: &ChatOptions) -> GenaiOptions {
    let mut genai_opts = GenaiOptions::default();

    if let Some(temp) = options.temperature {
        genai_opts = genai_opts.with_temperature(temp as f64);
    }

    if let Some(max_tokens) = options.max_tokens {
        genai_opts = genai_opts.with_max_tokens(max_tokens);
    }

    genai_opts
}

// ============================================================================
// Response Conversion: genai -> toolmux
// ============================================================================

/// Convert a genai tool call, keeping the arguments as JSON text
pub fn from_genai_tool_call(tc: &GenaiToolCall) -> ToolCall {
    let arguments = match &tc.fn_arguments {
        Value::String(raw) => raw.clone(),
        other => other.to_string(),
    };
    ToolCall::new(tc.call_id.clone(), tc.fn_name.clone(), arguments)
}

/// Convert a genai response to a single-choice completion
pub fn from_genai_response(response: &ChatResponse) -> Completion {
    let tool_calls = response
        .tool_calls()
        .into_iter()
        .map(from_genai_tool_call)
        .collect();

    Completion::single(Choice {
        text: response.first_text().map(str::to_string),
        tool_calls,
    })
}

// ============================================================================
// Client Creation
// ============================================================================

/// Provider configuration for routing
#[derive(Clone)]
pub struct ProviderConfig {
    /// Provider identifier (e.g., "openai", "azure", "openrouter")
    pub provider: String,
    /// API key for authentication
    pub api_key: Option<String>,
    /// Custom API base URL
    pub api_base: Option<String>,
}

/// Check if a provider speaks the OpenAI chat-completions protocol
pub fn is_openai_compatible(provider: &str) -> bool {
    matches!(
        provider.to_lowercase().as_str(),
        "openai" | "azure" | "openrouter" | "mistral" | "compatible" | "redhat" | "rhel" | "rhai"
    )
}

/// Normalize a base URL so genai can append endpoint paths to it
pub fn endpoint_url(api_base: &str) -> String {
    if api_base.ends_with('/') {
        api_base.to_string()
    } else {
        format!("{}/", api_base)
    }
}

/// Create a genai Client with explicit auth and endpoint resolution
///
/// The key from the config is always used; genai's own environment lookup is
/// bypassed. A configured base URL overrides genai's default endpoint.
pub fn create_client(config: &ProviderConfig) -> Client {
    let auth_key = config.api_key.clone();

    let auth_resolver = AuthResolver::from_resolver_async_fn(
        move |_model_iden: ModelIden| -> Pin<Box<dyn Future<Output = genai::resolver::Result<Option<AuthData>>> + Send>> {
            let key = auth_key.clone();
            Box::pin(async move { Ok(key.map(AuthData::from_single)) })
        },
    );

    let target_provider = config.provider.clone();
    let target_api_base = config.api_base.clone();

    let target_resolver = ServiceTargetResolver::from_resolver_fn(
        move |target: ServiceTarget| -> Result<ServiceTarget, genai::resolver::Error> {
            let Some(api_base) = target_api_base.as_deref() else {
                return Ok(target);
            };

            let ServiceTarget { ref model, .. } = target;
            let adapter_kind = if is_openai_compatible(&target_provider) {
                AdapterKind::OpenAI
            } else {
                model.adapter_kind
            };

            Ok(ServiceTarget {
                endpoint: Endpoint::from_owned(endpoint_url(api_base)),
                auth: target.auth,
                model: ModelIden::new(adapter_kind, model.model_name.clone()),
            })
        },
    );

    Client::builder()
        .with_auth_resolver(auth_resolver)
        .with_service_target_resolver(target_resolver)
        .build()
}
