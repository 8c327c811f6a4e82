//! The tool-host seam used by the orchestrator.

use async_trait::async_trait;
pub use rmcp::model::Tool;
use serde_json::Value;

/// Error type for tool host operations.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    #[error("Failed to launch tool host: {0}")]
    Launch(String),

    #[error("Tool protocol error: {0}")]
    Protocol(String),
}

/// Something that can list and execute tools.
#[async_trait]
pub trait ToolService: Send + Sync {
    /// List available tools.
    async fn list_tools(&self) -> Result<Vec<Tool>, ToolError>;

    /// Execute a tool and return its result as JSON.
    async fn call_tool(&self, name: String, args: Value) -> Result<Value, ToolError>;
}

/// Starts a tool host on demand.
///
/// The orchestrator only launches the host once the model actually asks for a
/// tool, so launching is separate from calling.
#[async_trait]
pub trait ToolLauncher: Send + Sync {
    async fn launch(&self) -> Result<Box<dyn ToolService>, ToolError>;
}
