mod api;
mod config;
mod error;
mod server;

use std::sync::Arc;

use rmcp::{ServiceExt, transport::stdio};
use tracing::info;
use tracing_subscriber::EnvFilter;

use content_pipeline::generation::GenerationClient;
use content_pipeline::openai::OpenAiClient;
use content_pipeline::orchestrator::ContentGenerator;
use content_pipeline::topics::TopicSuggester;

use config::Config;
use server::ContentServer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .with_ansi(false)
        .init();

    info!("starting content-server MCP server");

    let config = Config::from_env()?;
    info!(
        base_url = %config.openai.base_url,
        timeout_ms = config.openai.default_timeout.as_millis(),
        max_retries = config.openai.max_retries,
        model = %config.pipeline.model,
        "generation backend configured"
    );
    let client: Arc<dyn GenerationClient> = Arc::new(OpenAiClient::new(config.openai)?);

    let generator = ContentGenerator::new(client.clone(), config.pipeline.clone());
    let topics = TopicSuggester::new(client, config.pipeline);
    let server = ContentServer::new(generator, topics);

    info!("MCP server ready, serving on stdio");
    let service = server.serve(stdio()).await.inspect_err(|e| {
        tracing::error!(error = %e, "MCP server error");
    })?;

    service.waiting().await?;
    info!("MCP server shut down");
    Ok(())
}
