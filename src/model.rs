//! Provider-agnostic conversation types.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::ops::{Add, AddAssign};

/// Speaker of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One piece of a message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Part {
    /// Plain text.
    Text(String),
    /// A tool invocation requested by the model.
    FunctionCall {
        id: Option<String>,
        name: String,
        arguments: Value,
    },
    /// The result of a tool invocation, sent back to the model.
    FunctionResponse {
        id: Option<String>,
        name: String,
        response: Value,
    },
}

/// A conversation message. Tool results travel as `User` messages carrying a
/// `Part::FunctionResponse`; the wire layer turns them into `tool` messages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Message {
    System(Vec<Part>),
    User(Vec<Part>),
    Assistant(Vec<Part>),
}

impl Message {
    pub fn system(text: impl Into<String>) -> Self {
        Message::System(vec![Part::Text(text.into())])
    }

    pub fn user(text: impl Into<String>) -> Self {
        Message::User(vec![Part::Text(text.into())])
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Message::Assistant(vec![Part::Text(text.into())])
    }

    pub fn role(&self) -> Role {
        match self {
            Message::System(_) => Role::System,
            Message::User(_) => Role::User,
            Message::Assistant(_) => Role::Assistant,
        }
    }

    pub fn parts(&self) -> &[Part] {
        match self {
            Message::System(parts) | Message::User(parts) | Message::Assistant(parts) => parts,
        }
    }

    /// Concatenated text parts, or `None` when the message has no text.
    pub fn content(&self) -> Option<String> {
        let texts: Vec<&str> = self
            .parts()
            .iter()
            .filter_map(|p| match p {
                Part::Text(t) => Some(t.as_str()),
                _ => None,
            })
            .collect();

        if texts.is_empty() {
            None
        } else {
            Some(texts.join("\n"))
        }
    }

    /// Tool invocations carried by this message, in order.
    pub fn function_calls(&self) -> impl Iterator<Item = &Part> {
        self.parts()
            .iter()
            .filter(|p| matches!(p, Part::FunctionCall { .. }))
    }
}

/// Why the model stopped generating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum FinishReason {
    #[default]
    Stop,
    OutputTokens,
    ContentFilter,
    ToolCalls,
}

impl FinishReason {
    /// Map an OpenAI-style `finish_reason` string.
    pub fn from_wire(reason: &str) -> Self {
        match reason {
            "length" => FinishReason::OutputTokens,
            "content_filter" => FinishReason::ContentFilter,
            "tool_calls" => FinishReason::ToolCalls,
            _ => FinishReason::Stop,
        }
    }
}

/// Token accounting for one or more requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: Option<u32>,
    pub completion_tokens: Option<u32>,
}

fn add_opt(a: Option<u32>, b: Option<u32>) -> Option<u32> {
    match (a, b) {
        (None, None) => None,
        (a, b) => Some(a.unwrap_or(0) + b.unwrap_or(0)),
    }
}

impl Add for Usage {
    type Output = Usage;

    fn add(self, rhs: Usage) -> Usage {
        Usage {
            prompt_tokens: add_opt(self.prompt_tokens, rhs.prompt_tokens),
            completion_tokens: add_opt(self.completion_tokens, rhs.completion_tokens),
        }
    }
}

impl AddAssign for Usage {
    fn add_assign(&mut self, rhs: Usage) {
        *self = self.clone() + rhs;
    }
}

/// The result of one completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub data: Vec<Message>,
    pub usage: Option<Usage>,
    pub finish: FinishReason,
}

impl Response {
    /// The first message the provider returned, if any.
    pub fn first(&self) -> Option<&Message> {
        self.data.first()
    }
}
