//! MCP tool host for the transit lookups, speaking MCP on stdin/stdout.

use rmcp::transport::stdio;
use rmcp::ServiceExt;
use tpl_assist::config::{load_dotenv, TransitConfig};
use tpl_assist::TplServer;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    load_dotenv();

    // stdout carries the protocol; logs go to stderr.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    let config = TransitConfig::from_env()?;
    tracing::info!("Starting tool host against {}", config.base_url);

    let service = TplServer::new(config.client()).serve(stdio()).await?;
    service.waiting().await?;

    tracing::info!("Tool host stopped");
    Ok(())
}
