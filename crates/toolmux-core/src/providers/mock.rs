//! Mock gateway for testing
//!
//! Replays a queue of scripted completions and records every request, so
//! tests can assert on exactly what the model was shown.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;

use super::error::{ProviderError, ProviderResult};
use super::traits::{ChatOptions, Completion, ModelGateway, ProviderModelConfig};
use crate::types::{ChatMessage, ToolCall};

/// A request as seen by the mock gateway
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub messages: Vec<ChatMessage>,
    pub model: String,
    /// Names of the tools offered
    pub tools: Vec<String>,
}

/// Scripted model gateway
#[derive(Debug, Default)]
pub struct MockGateway {
    responses: Mutex<VecDeque<ProviderResult<Completion>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockGateway {
    /// Create a gateway with an empty script
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a completion
    pub fn with_completion(self, completion: Completion) -> Self {
        self.push(Ok(completion));
        self
    }

    /// Queue a text-only completion
    pub fn with_text(self, text: impl Into<String>) -> Self {
        self.with_completion(Completion::text(text))
    }

    /// Queue a completion requesting tool calls
    pub fn with_tool_calls(self, calls: Vec<ToolCall>) -> Self {
        self.with_completion(Completion::tool_calls(calls))
    }

    /// Queue a failure
    pub fn with_error(self, message: impl Into<String>) -> Self {
        self.push(Err(ProviderError::api_error("mock", message)));
        self
    }

    fn push(&self, response: ProviderResult<Completion>) {
        self.responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(response);
    }

    /// Requests received so far
    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    /// Number of scripted responses not yet consumed
    pub fn remaining(&self) -> usize {
        self.responses.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

#[async_trait]
impl ModelGateway for MockGateway {
    fn name(&self) -> &str {
        "mock"
    }

    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        model: &ProviderModelConfig,
        options: ChatOptions,
    ) -> ProviderResult<Completion> {
        self.requests
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(RecordedRequest {
                messages,
                model: model.model.clone(),
                tools: options.tools.iter().map(|t| t.name.clone()).collect(),
            });

        self.responses
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .unwrap_or_else(|| Err(ProviderError::Other("mock gateway script exhausted".to_string())))
    }
}
