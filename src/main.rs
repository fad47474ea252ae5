mod concurrency;
mod config;
mod llm;
mod models;
mod rephrase;
mod slack;
mod tools;

pub const USER_AGENT: &str = concat!("docbot/", env!("CARGO_PKG_VERSION"), " (MCP Server)");

use config::Config;
use rmcp::{ServiceExt, transport::stdio};
use tools::Docbot;
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("docbot=info".parse()?),
        )
        .init();

    info!("starting docbot MCP server");

    let config = Config::from_env().inspect_err(|e| tracing::error!("invalid configuration: {e}"))?;
    info!(
        num_docs = config.num_docs_to_display,
        expansion = ?config.expansion_mode(),
        "configuration loaded"
    );

    let service = Docbot::new(config)?
        .serve(stdio())
        .await
        .inspect_err(|e| tracing::error!("failed to start server: {e}"))?;

    service.waiting().await?;
    info!("server stopped");
    Ok(())
}
