//! Groq API client implementation.

use crate::api::openai::{OpenAiCompatibleClient, OpenAiCompatibleModel};
use crate::options::{ModelOptions, TransportOptions};
use crate::providers::Provider;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;

pub const GROQ_API_BASE: &str = "https://api.groq.com/openai/v1";

/// Groq-specific request fields.
#[skip_serializing_none]
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct GroqModel {
    /// `"auto"`, `"none"` or `"required"`.
    pub tool_choice: Option<String>,
    /// Ask for at most one tool call per turn.
    pub parallel_tool_calls: Option<bool>,
}

impl OpenAiCompatibleModel for GroqModel {}

pub type GroqClient = OpenAiCompatibleClient<GroqModel>;

pub struct Groq;

impl Provider for Groq {
    type Client = GroqClient;

    fn create(api_key: String, model: String) -> Self::Client {
        Self::create_with_options(
            api_key,
            ModelOptions::new(model),
            TransportOptions::default(),
        )
    }

    fn create_with_options(
        api_key: String,
        model_options: ModelOptions<GroqModel>,
        transport_options: TransportOptions,
    ) -> Self::Client {
        GroqClient::new(
            api_key,
            GROQ_API_BASE.to_string(),
            model_options,
            transport_options,
        )
    }
}
