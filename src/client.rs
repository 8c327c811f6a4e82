//! Core chat client trait and error types.

use async_trait::async_trait;
use rmcp::model::Tool;
use thiserror::Error;

use crate::model::{Message, Response};
use crate::options::{ModelOptions, TransportOptions};
use crate::tools::ToolError;

/// Errors that can occur while talking to the model or the tool host.
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parse error: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Provider error: {0}")]
    ProviderError(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Tool(#[from] ToolError),
}

/// A chat-completion backend.
#[async_trait]
pub trait Client: Send + Sync {
    /// Provider-specific model options type.
    type ModelProvider: Send + Sync;

    /// Send one completion request. An empty `tools` list omits the tool schema.
    async fn request(&self, messages: Vec<Message>, tools: Vec<Tool>) -> Result<Response, ClientError>;

    /// Get reference to the model options.
    fn model_options(&self) -> &ModelOptions<Self::ModelProvider>;

    /// Get reference to the transport options.
    fn transport_options(&self) -> &TransportOptions;
}
