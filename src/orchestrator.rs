//! Single-shot question answering with at most one tool round-trip.

use rmcp::model::Tool;
use serde_json::json;
use tracing::{debug, info, warn};

use crate::client::{Client, ClientError};
use crate::model::{Message, Part, Usage};
use crate::tools::ToolLauncher;

pub const DEFAULT_SYSTEM: &str = "Usa i tools MCP se serve";
pub const DEFAULT_PROMPT: &str = "Dammi le linee bus per agenzia TPL di Firenze";

/// What happened while answering one question.
#[derive(Debug, Clone, PartialEq)]
pub struct Answer {
    /// Final assistant text; empty when the model returned none.
    pub text: String,
    /// Name of the tool that was executed, if any.
    pub tool_called: Option<String>,
    /// Accumulated token usage across both completions.
    pub usage: Usage,
}

/// Sends one question to the model and, when asked, runs one tool call.
///
/// Flow:
/// 1. `[system, user]` goes out with the declared tools.
/// 2. Without tool calls, the reply text is the answer.
/// 3. Otherwise the tool host is launched, the first call executed, and its
///    result appended as a tool message.
/// 4. A second completion, without tools, produces the answer.
///
/// # Example
/// ```ignore
/// let client = Groq::create(api_key, "llama-3.1-8b-instant".to_string());
/// let orchestrator = Orchestrator::new(client, ChildProcessLauncher::sibling("tpl-server")?)
///     .with_tool(tool);
/// let answer = orchestrator.answer(DEFAULT_SYSTEM, DEFAULT_PROMPT).await?;
/// ```
pub struct Orchestrator<C: Client, L: ToolLauncher> {
    client: C,
    launcher: L,
    tools: Vec<Tool>,
}

impl<C: Client, L: ToolLauncher> Orchestrator<C, L> {
    pub fn new(client: C, launcher: L) -> Self {
        Self {
            client,
            launcher,
            tools: Vec::new(),
        }
    }

    /// Declare a tool schema to offer the model.
    pub fn with_tool(mut self, tool: Tool) -> Self {
        self.tools.push(tool);
        self
    }

    pub fn tools(&self) -> &[Tool] {
        &self.tools
    }

    pub async fn answer(&self, system: &str, prompt: &str) -> Result<Answer, ClientError> {
        let mut messages = vec![Message::system(system), Message::user(prompt)];
        debug!("Sending question with {} declared tools", self.tools.len());

        let first = self
            .client
            .request(messages.clone(), self.tools.clone())
            .await?;
        let mut usage = first.usage.clone().unwrap_or_default();

        let Some(reply) = first.data.into_iter().next() else {
            return Err(ClientError::ProviderError(
                "Completion returned no choices".to_string(),
            ));
        };

        let calls: Vec<(Option<String>, String, serde_json::Value)> = reply
            .function_calls()
            .filter_map(|p| match p {
                Part::FunctionCall {
                    id,
                    name,
                    arguments,
                } => Some((id.clone(), name.clone(), arguments.clone())),
                _ => None,
            })
            .collect();

        let Some((id, name, arguments)) = calls.first().cloned() else {
            debug!("No tool call requested, answering directly");
            return Ok(Answer {
                text: reply.content().unwrap_or_default(),
                tool_called: None,
                usage,
            });
        };

        if calls.len() > 1 {
            warn!(
                "Model requested {} tool calls, only {} will be executed",
                calls.len(),
                name
            );
        }

        info!("Tool call requested: {}", name);
        debug!("Tool arguments: {}", arguments);

        let service = self.launcher.launch().await?;
        let response = match service.call_tool(name.clone(), arguments.clone()).await {
            Ok(result) => {
                info!("Tool {} executed successfully", name);
                debug!("Tool result: {}", result);
                result
            }
            Err(e) => {
                warn!("Tool {} execution failed: {}", name, e);
                json!({ "error": e.to_string() })
            }
        };
        drop(service);

        // Only the executed call is echoed back; unanswered calls would be
        // rejected by the chat API.
        let mut echoed: Vec<Part> = reply
            .parts()
            .iter()
            .filter(|p| !matches!(p, Part::FunctionCall { .. }))
            .cloned()
            .collect();
        echoed.push(Part::FunctionCall {
            id: id.clone(),
            name: name.clone(),
            arguments,
        });
        messages.push(Message::Assistant(echoed));
        messages.push(Message::User(vec![Part::FunctionResponse {
            id,
            name: name.clone(),
            response,
        }]));

        let second = self.client.request(messages, Vec::new()).await?;
        if let Some(u) = second.usage.clone() {
            usage += u;
        }

        let text = second
            .first()
            .and_then(Message::content)
            .unwrap_or_default();

        Ok(Answer {
            text,
            tool_called: Some(name),
            usage,
        })
    }
}
