//! Asks the model one transit question and prints its answer.

use std::path::PathBuf;

use clap::Parser;
use tpl_assist::config::{self, load_dotenv, DEFAULT_MODEL};
use tpl_assist::mcp::ChildProcessLauncher;
use tpl_assist::options::ModelOptions;
use tpl_assist::orchestrator::{Orchestrator, DEFAULT_PROMPT, DEFAULT_SYSTEM};
use tpl_assist::providers::{Groq, GroqModel, Provider};
use tpl_assist::server::{TplServer, BUS_LINES_TOOL};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "tpl-client", about = "Ask an LLM about public transport, backed by live transit data")]
struct Cli {
    /// Question to ask.
    #[arg(short, long, default_value = DEFAULT_PROMPT)]
    prompt: String,

    /// System message sent before the question.
    #[arg(long, default_value = DEFAULT_SYSTEM)]
    system: String,

    /// Chat model identifier.
    #[arg(short, long, default_value = DEFAULT_MODEL)]
    model: String,

    /// Path to the tool host binary. Defaults to `tpl-server` next to this binary.
    #[arg(long)]
    server: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    load_dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let api_key = config::api_key()?;

    let model_options = ModelOptions::<GroqModel>::new(cli.model.clone());
    let client = Groq::create_with_options(api_key, model_options, config::chat_transport()?);

    let launcher = match cli.server {
        Some(path) => ChildProcessLauncher::new(path),
        None => ChildProcessLauncher::sibling("tpl-server")?,
    };

    let tool = TplServer::default()
        .tool_definition(BUS_LINES_TOOL)
        .ok_or("tool host does not declare get_bus_lines")?;

    let orchestrator = Orchestrator::new(client, launcher).with_tool(tool);
    let answer = orchestrator.answer(&cli.system, &cli.prompt).await?;

    if let Some(tool) = &answer.tool_called {
        tracing::info!("Answered with help from {}", tool);
    }
    println!("{}", answer.text);
    Ok(())
}
