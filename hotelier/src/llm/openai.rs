//! OpenAI-compatible Chat Completions client implementing `LlmClient` (ChatOpenAI).
//!
//! Works with any endpoint speaking the Chat Completions protocol; the hotel
//! finder points it at Gemini's OpenAI-compatible base URL. Tools are sent as
//! function definitions and assistant tool calls / tool results are replayed on
//! the next turn so the model can see its own calls and their outcomes.
//!
//! Failed requests are retried `max_retries` times with exponential backoff.

use std::time::Duration;

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionMessageToolCall, ChatCompletionMessageToolCalls,
        ChatCompletionRequestAssistantMessageArgs, ChatCompletionRequestMessage,
        ChatCompletionRequestSystemMessage, ChatCompletionRequestToolMessageArgs,
        ChatCompletionRequestUserMessage, ChatCompletionTool, ChatCompletionToolChoiceOption,
        ChatCompletionTools, CreateChatCompletionRequest, CreateChatCompletionRequestArgs,
        CreateChatCompletionResponse, FunctionCall, FunctionObject, ToolChoiceOptions,
    },
    Client,
};
use async_trait::async_trait;
use tracing::{debug, trace, warn};

use crate::error::AgentError;
use crate::llm::{LlmClient, LlmResponse, LlmUsage, ToolChoiceMode};
use crate::message::Message;
use crate::state::ToolCall;
use crate::tool_source::ToolSpec;

/// Retries after the first failed request.
pub const DEFAULT_MAX_RETRIES: u32 = 2;

const RETRY_BASE_DELAY: Duration = Duration::from_millis(250);

/// Chat Completions client.
///
/// Build with [`ChatOpenAI::with_config`] (API key and base URL) and enable
/// tool calling with [`ChatOpenAI::with_tools`].
pub struct ChatOpenAI {
    client: Client<OpenAIConfig>,
    model: String,
    tools: Option<Vec<ToolSpec>>,
    temperature: Option<f32>,
    tool_choice: Option<ToolChoiceMode>,
    max_retries: u32,
    timeout: Option<Duration>,
}

impl ChatOpenAI {
    /// Build client with default config (API key from `OPENAI_API_KEY` env).
    pub fn new(model: impl Into<String>) -> Self {
        Self::with_config(OpenAIConfig::new(), model)
    }

    /// Build client with custom config (API key and base URL).
    pub fn with_config(config: OpenAIConfig, model: impl Into<String>) -> Self {
        Self {
            client: Client::with_config(config),
            model: model.into(),
            tools: None,
            temperature: None,
            tool_choice: None,
            max_retries: DEFAULT_MAX_RETRIES,
            timeout: None,
        }
    }

    /// Set tools for this completion (enables tool calls in the response).
    pub fn with_tools(mut self, tools: Vec<ToolSpec>) -> Self {
        self.tools = Some(tools);
        self
    }

    /// Set temperature (0–2).
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set tool choice mode. Left unset, the backend default applies (auto).
    pub fn with_tool_choice(mut self, mode: ToolChoiceMode) -> Self {
        self.tool_choice = Some(mode);
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Per-attempt timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    fn tool_call_to_request(call: &ToolCall) -> ChatCompletionMessageToolCalls {
        ChatCompletionMessageToolCalls::Function(ChatCompletionMessageToolCall {
            id: call.id.clone(),
            function: FunctionCall {
                name: call.name.clone(),
                arguments: call.arguments.clone(),
            },
        })
    }

    /// Convert our `Message` list to request messages, tool calls and tool results included.
    fn messages_to_request(
        messages: &[Message],
    ) -> Result<Vec<ChatCompletionRequestMessage>, AgentError> {
        let build_err =
            |e: async_openai::error::OpenAIError| AgentError::ExecutionFailed(format!("message build failed: {}", e));
        messages
            .iter()
            .map(|m| match m {
                Message::System { content } => Ok(ChatCompletionRequestMessage::System(
                    ChatCompletionRequestSystemMessage::from(content.as_str()),
                )),
                Message::User { content } => Ok(ChatCompletionRequestMessage::User(
                    ChatCompletionRequestUserMessage::from(content.as_str()),
                )),
                Message::Assistant {
                    content,
                    tool_calls,
                } if tool_calls.is_empty() => {
                    Ok(ChatCompletionRequestMessage::Assistant(content.as_str().into()))
                }
                Message::Assistant {
                    content,
                    tool_calls,
                } => {
                    let msg = ChatCompletionRequestAssistantMessageArgs::default()
                        .content(content.as_str())
                        .tool_calls(
                            tool_calls
                                .iter()
                                .map(Self::tool_call_to_request)
                                .collect::<Vec<_>>(),
                        )
                        .build()
                        .map_err(build_err)?;
                    Ok(ChatCompletionRequestMessage::from(msg))
                }
                Message::Tool(result) => {
                    let msg = ChatCompletionRequestToolMessageArgs::default()
                        .content(result.content.clone())
                        .tool_call_id(result.call_id.clone())
                        .build()
                        .map_err(build_err)?;
                    Ok(ChatCompletionRequestMessage::from(msg))
                }
            })
            .collect()
    }

    fn build_request(&self, messages: &[Message]) -> Result<CreateChatCompletionRequest, AgentError> {
        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(self.model.clone());
        args.messages(Self::messages_to_request(messages)?);

        if let Some(ref tools) = self.tools {
            let chat_tools: Vec<ChatCompletionTools> = tools
                .iter()
                .map(|t| {
                    ChatCompletionTools::Function(ChatCompletionTool {
                        function: FunctionObject {
                            name: t.name.clone(),
                            description: t.description.clone(),
                            parameters: Some(t.input_schema.clone()),
                            ..Default::default()
                        },
                    })
                })
                .collect();
            args.tools(chat_tools);
        }

        if let Some(t) = self.temperature {
            args.temperature(t);
        }

        if let Some(mode) = self.tool_choice {
            let opt = match mode {
                ToolChoiceMode::Auto => ToolChoiceOptions::Auto,
                ToolChoiceMode::None => ToolChoiceOptions::None,
                ToolChoiceMode::Required => ToolChoiceOptions::Required,
            };
            args.tool_choice(ChatCompletionToolChoiceOption::Mode(opt));
        }

        args.build()
            .map_err(|e| AgentError::ExecutionFailed(format!("request build failed: {}", e)))
    }

    async fn create_once(
        &self,
        request: CreateChatCompletionRequest,
    ) -> Result<CreateChatCompletionResponse, AgentError> {
        let chat = self.client.chat();
        let call = chat.create(request);
        let result = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, call).await.map_err(|_| {
                AgentError::ExecutionFailed(format!("chat completion timed out after {:?}", limit))
            })?,
            None => call.await,
        };
        result.map_err(|e| AgentError::ExecutionFailed(format!("chat completion API error: {}", e)))
    }

    fn response_to_llm(response: CreateChatCompletionResponse) -> Result<LlmResponse, AgentError> {
        let usage = response.usage.map(|u| LlmUsage {
            prompt_tokens: u.prompt_tokens,
            completion_tokens: u.completion_tokens,
            total_tokens: u.total_tokens,
        });
        let choice = response.choices.into_iter().next().ok_or_else(|| {
            AgentError::ExecutionFailed("chat completion returned no choices".to_string())
        })?;

        let msg = choice.message;
        let tool_calls = msg
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .filter_map(|tc| match tc {
                ChatCompletionMessageToolCalls::Function(f) => Some(ToolCall {
                    id: f.id,
                    name: f.function.name,
                    arguments: f.function.arguments,
                }),
                _ => None,
            })
            .collect();

        Ok(LlmResponse {
            content: msg.content.unwrap_or_default(),
            tool_calls,
            usage,
        })
    }
}

#[async_trait]
impl LlmClient for ChatOpenAI {
    async fn invoke(&self, messages: &[Message]) -> Result<LlmResponse, AgentError> {
        let trace_id = uuid::Uuid::new_v4().to_string();
        let request = self.build_request(messages)?;
        debug!(
            trace_id = %trace_id,
            model = %self.model,
            message_count = messages.len(),
            tools_count = self.tools.as_ref().map(|t| t.len()).unwrap_or(0),
            temperature = ?self.temperature,
            tool_choice = ?self.tool_choice,
            "chat completion create"
        );
        if let Ok(js) = serde_json::to_string_pretty(&request) {
            trace!(trace_id = %trace_id, request = %js, "chat completion request body");
        }

        let mut attempt = 0u32;
        let response = loop {
            match self.create_once(request.clone()).await {
                Ok(response) => break response,
                Err(e) if attempt < self.max_retries => {
                    let delay = RETRY_BASE_DELAY * 2u32.pow(attempt);
                    attempt += 1;
                    warn!(trace_id = %trace_id, attempt, error = %e, ?delay, "chat completion failed, retrying");
                    tokio::time::sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        };

        if let Ok(js) = serde_json::to_string_pretty(&response) {
            trace!(trace_id = %trace_id, response = %js, "chat completion response body");
        }
        Self::response_to_llm(response)
    }
}
