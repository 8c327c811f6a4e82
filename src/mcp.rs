//! MCP client side: talk to a tool host over rmcp.

use std::ops::Deref;
use std::path::PathBuf;

use async_trait::async_trait;
use rmcp::model::{CallToolRequestParam, CallToolResult, RawContent, Tool};
use rmcp::service::{RoleClient, RunningService};
use rmcp::transport::TokioChildProcess;
use rmcp::{ClientHandler, ServiceExt};
use serde_json::{json, Value};
use tokio::process::Command;
use tracing::{debug, info};

use crate::tools::{ToolError, ToolLauncher, ToolService};

#[async_trait]
impl<S: ClientHandler + Send + Sync> ToolService for RunningService<RoleClient, S> {
    async fn list_tools(&self) -> Result<Vec<Tool>, ToolError> {
        let result = self
            .deref()
            .list_tools(None)
            .await
            .map_err(|e| ToolError::Protocol(e.to_string()))?;
        Ok(result.tools)
    }

    async fn call_tool(&self, name: String, args: Value) -> Result<Value, ToolError> {
        let params = CallToolRequestParam {
            name: name.into(),
            arguments: args.as_object().cloned(),
        };

        let result = self
            .deref()
            .call_tool(params)
            .await
            .map_err(|e| ToolError::Protocol(e.to_string()))?;

        Ok(tool_result_to_json(result))
    }
}

/// Flatten a tool result into one JSON value.
///
/// Structured content wins; otherwise the last text block that parses as JSON;
/// otherwise the raw text blocks under `"response"`. A tool reporting an error
/// is wrapped as `{"error": ...}`.
pub fn tool_result_to_json(result: CallToolResult) -> Value {
    let mut parsed_text_content: Option<Value> = None;
    let mut raw_text_content: Vec<String> = Vec::new();

    for content in result.content {
        if let RawContent::Text(text_content) = content.raw {
            match serde_json::from_str::<Value>(&text_content.text) {
                Ok(parsed) => parsed_text_content = Some(parsed),
                Err(_) => raw_text_content.push(text_content.text),
            }
        }
    }

    let value = if let Some(s) = result.structured_content {
        s
    } else if let Some(parsed) = parsed_text_content {
        parsed
    } else if !raw_text_content.is_empty() {
        json!({ "response": raw_text_content })
    } else {
        Value::Null
    };

    if result.is_error == Some(true) {
        json!({ "error": value })
    } else {
        value
    }
}

/// Launches the tool host binary as a child process speaking MCP on stdio.
#[derive(Debug, Clone)]
pub struct ChildProcessLauncher {
    program: PathBuf,
}

impl ChildProcessLauncher {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    /// A binary installed next to the running executable.
    pub fn sibling(binary: &str) -> Result<Self, ToolError> {
        let exe = std::env::current_exe().map_err(|e| ToolError::Launch(e.to_string()))?;
        let mut path = exe.with_file_name(binary);
        if cfg!(windows) {
            path.set_extension("exe");
        }
        Ok(Self::new(path))
    }
}

#[async_trait]
impl ToolLauncher for ChildProcessLauncher {
    async fn launch(&self) -> Result<Box<dyn ToolService>, ToolError> {
        info!("Launching tool host {}", self.program.display());

        let transport = TokioChildProcess::new(Command::new(&self.program))
            .map_err(|e| ToolError::Launch(format!("{}: {}", self.program.display(), e)))?;

        let service = ()
            .serve(transport)
            .await
            .map_err(|e| ToolError::Launch(e.to_string()))?;
        debug!("Tool host {} connected", self.program.display());

        Ok(Box::new(service))
    }
}
