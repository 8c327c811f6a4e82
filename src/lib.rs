//! # tpl-assist
//!
//! Answers public-transport questions by pairing an OpenAI-compatible chat
//! model with live Snap4City lookups served over the Model Context Protocol.
//!
//! ## Architecture
//!
//! Two processes cooperate:
//!
//! 1. **Tool host** ([`server::TplServer`], `tpl-server` binary): an MCP server on
//!    stdio exposing agencies, bus lines and events as tools, the agency list as
//!    a resource, and an `explain_bus_lines` prompt.
//! 2. **Orchestrator** ([`orchestrator::Orchestrator`], `tpl-client` binary):
//!    sends one question to the model and, if the model asks for a tool,
//!    launches the tool host, runs the first call and asks for a final answer.
//!
//! ### Core Types
//!
//! - **`Provider`**: Factory trait for creating chat clients (Groq, OpenAI).
//! - **`Client`**: Trait for making completion requests.
//! - **`ToolService`** / **`ToolLauncher`**: the seam between orchestrator and tool host.
//! - **`TransitClient`**: the read-only transit endpoints.
//! - **`Message`** / **`Part`**: provider-agnostic conversation content.
//!
//! ## Example
//! ```no_run
//! use tpl_assist::mcp::ChildProcessLauncher;
//! use tpl_assist::orchestrator::{Orchestrator, DEFAULT_PROMPT, DEFAULT_SYSTEM};
//! use tpl_assist::providers::{Groq, Provider};
//! use tpl_assist::server::{TplServer, BUS_LINES_TOOL};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = Groq::create("your-api-key".to_string(), "llama-3.1-8b-instant".to_string());
//!     let tool = TplServer::default()
//!         .tool_definition(BUS_LINES_TOOL)
//!         .ok_or("missing tool")?;
//!
//!     let orchestrator = Orchestrator::new(client, ChildProcessLauncher::sibling("tpl-server")?)
//!         .with_tool(tool);
//!
//!     let answer = orchestrator.answer(DEFAULT_SYSTEM, DEFAULT_PROMPT).await?;
//!     println!("{}", answer.text);
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod client;
pub mod config;
pub mod http;
pub mod mcp;
pub mod model;
pub mod options;
pub mod orchestrator;
pub mod providers;
pub mod resolver;
pub mod server;
pub mod tools;
pub mod transit;

pub use client::{Client, ClientError};
pub use model::{Message, Part, Response};
pub use orchestrator::{Answer, Orchestrator};
pub use server::TplServer;
pub use tools::{Tool, ToolError, ToolLauncher, ToolService};
pub use transit::{EventQuery, TransitClient};

// Re-export rmcp for convenience
pub use rmcp;
