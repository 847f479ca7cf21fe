//! GenaiGateway - chat completion through the genai crate
//!
//! Handles every genai-supported provider as well as OpenAI-compatible
//! endpoints reached through a custom base URL.

use std::sync::Arc;

use async_trait::async_trait;
use genai::chat::ChatRequest;

use crate::logging::Logger;
use crate::types::{ChatMessage, ToolChoice};
use super::error::{ProviderError, ProviderResult};
use super::genai_adapter::{
    create_client, from_genai_response, to_genai_messages, to_genai_options, to_genai_tools,
    ProviderConfig,
};
use super::traits::{ChatOptions, Completion, ModelGateway, ProviderModelConfig};

/// Gateway using genai for the chat-completion call
pub struct GenaiGateway {
    /// Provider identifier
    provider_id: String,
    /// Logger for debug output
    logger: Arc<dyn Logger>,
}

impl GenaiGateway {
    /// Create a new GenaiGateway
    pub fn new(provider_id: impl Into<String>, logger: Arc<dyn Logger>) -> Self {
        Self {
            provider_id: provider_id.into(),
            logger,
        }
    }
}

#[async_trait]
impl ModelGateway for GenaiGateway {
    fn name(&self) -> &str {
        &self.provider_id
    }

    async fn complete(
        &self,
        messages: Vec<ChatMessage>,
        model_config: &ProviderModelConfig,
        options: ChatOptions,
    ) -> ProviderResult<Completion> {
        // Org-scoped ids such as "deepseek-ai/DeepSeek-V3" are sent verbatim
        let model_name = model_config.model.as_str();
        self.logger.debug(&format!(
            "[GenaiGateway] complete: provider={}, model={}, messages={}, tools={}",
            self.provider_id,
            model_name,
            messages.len(),
            options.tools.len()
        ));

        let client = create_client(&ProviderConfig {
            provider: self.provider_id.clone(),
            api_key: model_config.api_key.clone(),
            api_base: model_config.api_base.clone(),
        });

        let mut chat_req = ChatRequest::new(to_genai_messages(messages)?);

        match options.tool_choice {
            ToolChoice::None => {}
            _ if options.tools.is_empty() => {}
            ToolChoice::Auto => {
                chat_req = chat_req.with_tools(to_genai_tools(options.tools.clone()));
            }
            ToolChoice::Required => {
                self.logger
                    .warn("[GenaiGateway] tool_choice=required is not supported; using auto");
                chat_req = chat_req.with_tools(to_genai_tools(options.tools.clone()));
            }
        }

        let genai_options = to_genai_options(&options);

        let response = client
            .exec_chat(model_name, chat_req, Some(&genai_options))
            .await
            .map_err(|e| {
                self.logger.error(&format!("[GenaiGateway] Request failed: {}", e));
                ProviderError::api_error(&self.provider_id, e.to_string())
            })?;

        let completion = from_genai_response(&response);
        self.logger.debug(&format!(
            "[GenaiGateway] Response: text={}, tool_calls={}",
            completion.choices.iter().any(|c| c.non_empty_text().is_some()),
            completion.choices.iter().map(|c| c.tool_calls.len()).sum::<usize>()
        ));

        Ok(completion)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::logging::NoOpLogger;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Answer a single request with `body`; the handle yields the raw request
    async fn serve_once(body: String) -> (String, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let handle = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut chunk = [0u8; 4096];
            loop {
                let n = socket.read(&mut chunk).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&chunk[..n]);
                if request_complete(&request) {
                    break;
                }
            }

            let response = format!(
                "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.ok();
            String::from_utf8_lossy(&request).into_owned()
        });

        (format!("http://{}/v1", addr), handle)
    }

    fn request_complete(request: &[u8]) -> bool {
        let text = String::from_utf8_lossy(request);
        let Some(header_end) = text.find("\r\n\r\n") else {
            return false;
        };
        let length = text[..header_end]
            .lines()
            .filter_map(|line| line.split_once(':'))
            .find(|(name, _)| name.trim().eq_ignore_ascii_case("content-length"))
            .and_then(|(_, value)| value.trim().parse::<usize>().ok())
            .unwrap_or(0);
        request.len() >= header_end + 4 + length
    }

    fn tool_call_response(arguments: &str) -> String {
        serde_json::json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "created": 0,
            "model": "deepseek-ai/DeepSeek-V3",
            "choices": [{
                "index": 0,
                "message": {
                    "role": "assistant",
                    "content": null,
                    "tool_calls": [{
                        "id": "c1",
                        "type": "function",
                        "function": { "name": "a__ping", "arguments": arguments }
                    }]
                },
                "finish_reason": "tool_calls"
            }],
            "usage": { "prompt_tokens": 1, "completion_tokens": 1, "total_tokens": 2 }
        })
        .to_string()
    }

    fn config(api_base: String) -> ProviderModelConfig {
        ProviderModelConfig::new("deepseek-ai/DeepSeek-V3")
            .with_api_key("sk-test")
            .with_api_base(api_base)
    }

    #[tokio::test]
    async fn test_org_scoped_model_sent_verbatim() {
        let (base, server) = serve_once(tool_call_response(r#"{"host":"db1"}"#)).await;
        let gateway = GenaiGateway::new("openai", Arc::new(NoOpLogger));

        gateway
            .complete(vec![ChatMessage::user("hi")], &config(base), ChatOptions::default())
            .await
            .unwrap();

        let request = server.await.unwrap();
        assert!(request.contains(r#""model":"deepseek-ai/DeepSeek-V3""#), "{}", request);
        assert!(request.contains("Bearer sk-test"));
    }

    #[tokio::test]
    async fn test_tool_call_arguments_from_response() {
        let (base, server) = serve_once(tool_call_response(r#"{"host":"db1"}"#)).await;
        let gateway = GenaiGateway::new("openai", Arc::new(NoOpLogger));

        let completion = gateway
            .complete(vec![ChatMessage::user("ping db1")], &config(base), ChatOptions::default())
            .await
            .unwrap();
        server.await.unwrap();

        let calls = &completion.choices[0].tool_calls;
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].id, "c1");
        assert_eq!(calls[0].name, "a__ping");
        assert_eq!(calls[0].arguments, r#"{"host":"db1"}"#);
    }

    #[tokio::test]
    async fn test_malformed_arguments_fail_the_response() {
        // genai parses argument text itself and rejects the whole response
        let (base, server) = serve_once(tool_call_response(r#"{"host": "#)).await;
        let gateway = GenaiGateway::new("openai", Arc::new(NoOpLogger));

        let result = gateway
            .complete(vec![ChatMessage::user("ping")], &config(base), ChatOptions::default())
            .await;
        server.await.unwrap();

        assert!(matches!(result, Err(ProviderError::ApiError { .. })));
    }

    #[test]
    fn test_name() {
        let gateway = GenaiGateway::new("openai", Arc::new(NoOpLogger));
        assert_eq!(gateway.name(), "openai");
    }
}
