//! OpenAI Chat Completions API client implementation.
//!
//! Groq, OpenAI and any other endpoint speaking the same wire format share this
//! client; providers only differ in base URL and model extras.
//! See: <https://platform.openai.com/docs/api-reference/chat>

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::client::{Client, ClientError};
use crate::http::{add_extra_headers, build_http_client, RequestBuilderExt, ResponseExt};
use crate::model::{FinishReason, Message, Part, Response, Usage};
use crate::options::{ModelOptions, TransportOptions};

/// Trait for models compatible with OpenAI's Chat Completions API.
pub trait OpenAiCompatibleModel:
    Send + Sync + Default + Serialize + for<'de> Deserialize<'de> + Clone
{
}

/// Generic client for OpenAI-compatible Chat Completions APIs.
#[derive(Debug, Clone)]
pub struct OpenAiCompatibleClient<M> {
    api_key: String,
    base_url: String,
    model_options: ModelOptions<M>,
    transport_options: TransportOptions,
}

impl<M: OpenAiCompatibleModel> OpenAiCompatibleClient<M> {
    /// Create a new client. `base_url` includes the version segment,
    /// e.g. `https://api.groq.com/openai/v1`.
    pub fn new(
        api_key: String,
        base_url: String,
        model_options: ModelOptions<M>,
        transport_options: TransportOptions,
    ) -> Self {
        Self {
            api_key,
            base_url: base_url.trim_end_matches('/').to_string(),
            model_options,
            transport_options,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Handle error responses.
    fn handle_error_response(status: reqwest::StatusCode, body: &str) -> ClientError {
        if let Ok(error_resp) = serde_json::from_str::<ChatErrorResponse>(body) {
            ClientError::ProviderError(format!(
                "API error ({}): {}",
                error_resp.error.error_type.as_deref().unwrap_or("unknown"),
                error_resp.error.message
            ))
        } else {
            ClientError::ProviderError(format!("HTTP {}: {}", status, body))
        }
    }
}

#[async_trait]
impl<M: OpenAiCompatibleModel> Client for OpenAiCompatibleClient<M> {
    type ModelProvider = M;

    async fn request(
        &self,
        messages: Vec<Message>,
        tools: Vec<rmcp::model::Tool>,
    ) -> Result<Response, ClientError> {
        if self.model_options.model.is_empty() {
            return Err(ClientError::Config("Model must be specified".to_string()));
        }

        let url = format!("{}/chat/completions", self.base_url);
        let request_body = ChatRequest::new(messages, &self.model_options, tools);

        let http_client = build_http_client(&self.transport_options)?;

        let mut req = http_client
            .post(&url)
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .header(CONTENT_TYPE, "application/json");

        req = add_extra_headers(req, &self.transport_options);

        let response = req.json_logged(&request_body).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text_logged().await.unwrap_or_default();
            return Err(Self::handle_error_response(status, &body));
        }

        let chat_response: ChatResponse = response.json_logged().await?;
        Ok(chat_response.into())
    }

    fn model_options(&self) -> &ModelOptions<Self::ModelProvider> {
        &self.model_options
    }

    fn transport_options(&self) -> &TransportOptions {
        &self.transport_options
    }
}

impl<M: OpenAiCompatibleModel> ChatRequest<M> {
    fn new(
        messages_in: Vec<Message>,
        model_options: &ModelOptions<M>,
        tool_defs: Vec<rmcp::model::Tool>,
    ) -> Self {
        let mut messages: Vec<ChatMessage> = Vec::with_capacity(messages_in.len() + 1);

        if let Some(system) = &model_options.system {
            if !matches!(messages_in.first(), Some(Message::System(_))) {
                messages.push(Message::system(system.clone()).into());
            }
        }
        messages.extend(messages_in.into_iter().map(ChatMessage::from));

        let tools = if tool_defs.is_empty() {
            None
        } else {
            Some(
                tool_defs
                    .iter()
                    .map(|def| ChatTool {
                        tool_type: "function".to_string(),
                        function: ChatFunction {
                            name: def.name.to_string(),
                            description: def.description.as_ref().map(|d| d.to_string()),
                            parameters: Value::Object((*def.input_schema).clone()),
                        },
                    })
                    .collect(),
            )
        };

        ChatRequest {
            model: model_options.model.clone(),
            messages,
            temperature: model_options.temperature,
            top_p: model_options.top_p,
            max_tokens: model_options.max_tokens,
            tools,
            provider_options: model_options.provider.clone(),
        }
    }
}

impl From<Message> for ChatMessage {
    fn from(msg: Message) -> Self {
        let role = match msg {
            Message::User(_) => "user",
            Message::Assistant(_) => "assistant",
            Message::System(_) => "system",
        };

        let mut content_parts = Vec::new();
        let mut tool_calls = Vec::new();
        let mut tool_call_id = None;

        for part in msg.parts() {
            match part {
                Part::Text(text) => content_parts.push(text.clone()),
                Part::FunctionCall {
                    id,
                    name,
                    arguments,
                } => {
                    tool_calls.push(ChatToolCall {
                        id: id.clone().unwrap_or_else(|| format!("call_{}", name)),
                        tool_type: "function".to_string(),
                        function: ChatFunctionCall {
                            name: name.clone(),
                            arguments: match arguments {
                                Value::String(s) => s.clone(),
                                _ => arguments.to_string(),
                            },
                        },
                    });
                }
                Part::FunctionResponse { id, name, response } => {
                    content_parts.push(response.to_string());
                    tool_call_id = Some(id.clone().unwrap_or_else(|| format!("call_{}", name)));
                }
            }
        }

        let final_role = if tool_call_id.is_some() { "tool" } else { role };

        ChatMessage {
            role: final_role.to_string(),
            content: if content_parts.is_empty() {
                None
            } else {
                Some(content_parts.join("\n"))
            },
            tool_calls: if tool_calls.is_empty() {
                None
            } else {
                Some(tool_calls)
            },
            tool_call_id,
        }
    }
}

impl From<ChatMessage> for Message {
    fn from(msg: ChatMessage) -> Self {
        if msg.role == "tool" {
            let response = msg
                .content
                .as_deref()
                .and_then(|s| serde_json::from_str(s).ok())
                .unwrap_or(Value::Null);
            return Message::User(vec![Part::FunctionResponse {
                id: msg.tool_call_id,
                // The chat format does not echo the tool name on results.
                name: "unknown".to_string(),
                response,
            }]);
        }

        let mut parts = Vec::new();

        if let Some(content) = msg.content.filter(|c| !c.is_empty()) {
            parts.push(Part::Text(content));
        }

        for tool_call in msg.tool_calls.unwrap_or_default() {
            parts.push(Part::FunctionCall {
                id: Some(tool_call.id),
                name: tool_call.function.name,
                arguments: serde_json::from_str(&tool_call.function.arguments)
                    .unwrap_or(Value::Null),
            });
        }

        match msg.role.as_str() {
            "user" => Message::User(parts),
            "system" => Message::System(parts),
            _ => Message::Assistant(parts),
        }
    }
}

impl From<ChatResponse> for Response {
    fn from(chat_resp: ChatResponse) -> Self {
        let finish = chat_resp
            .choices
            .first()
            .and_then(|c| c.finish_reason.as_deref())
            .map(FinishReason::from_wire)
            .unwrap_or_default();

        let data = chat_resp
            .choices
            .into_iter()
            .map(|choice| choice.message.into())
            .collect();

        Response {
            data,
            usage: chat_resp.usage.map(|u| Usage {
                prompt_tokens: Some(u.prompt_tokens),
                completion_tokens: Some(u.completion_tokens),
            }),
            finish,
        }
    }
}

// --- Chat Completions API Types ---

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize)]
struct ChatRequest<M> {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: Option<f32>,
    top_p: Option<f32>,
    max_tokens: Option<u32>,
    tools: Option<Vec<ChatTool>>,
    #[serde(flatten)]
    provider_options: M,
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: Option<String>,
    tool_calls: Option<Vec<ChatToolCall>>,
    tool_call_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatToolCall {
    id: String,
    #[serde(rename = "type")]
    tool_type: String,
    function: ChatFunctionCall,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct ChatFunctionCall {
    name: String,
    arguments: String,
}

#[derive(Debug, Clone, Serialize)]
struct ChatTool {
    #[serde(rename = "type")]
    tool_type: String,
    function: ChatFunction,
}

#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Serialize)]
struct ChatFunction {
    name: String,
    description: Option<String>,
    parameters: Value,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
    usage: Option<ChatUsage>,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
    finish_reason: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatUsage {
    prompt_tokens: u32,
    completion_tokens: u32,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatErrorResponse {
    error: ChatError,
}

#[derive(Debug, Clone, Deserialize)]
struct ChatError {
    #[serde(rename = "type")]
    error_type: Option<String>,
    message: String,
}
