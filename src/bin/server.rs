//! Document Q&A server binary
//!
//! Run with: cargo run --bin documate-server

use std::sync::Arc;

use documate::config::RagConfig;
use documate::ingestion::PdfParser;
use documate::pipeline::RagPipeline;
use documate::providers::OpenAiClient;
use documate::server::RagServer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "documate=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = RagConfig::load(
        std::env::var("DOCUMATE_CONFIG").unwrap_or_else(|_| "documate.toml".to_string()),
    )?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Provider: {}", config.provider.base_url);
    tracing::info!("  - Embedding model: {}", config.provider.embed_model);
    tracing::info!("  - Chat model: {}", config.provider.chat_model);
    tracing::info!(
        "  - Chunking: {} chars, {} overlap",
        config.chunking.chunk_size,
        config.chunking.chunk_overlap
    );
    tracing::info!("  - Retrieval k: {}", config.retrieval.top_k);

    let client = Arc::new(OpenAiClient::new(&config.provider)?);

    if client.health_check().await {
        tracing::info!("Provider endpoint is reachable");
    } else {
        tracing::warn!(
            "Provider endpoint {} not reachable; ingest and ask will fail until it is",
            config.provider.base_url
        );
    }

    let pipeline = Arc::new(RagPipeline::new(
        config.clone(),
        Arc::new(PdfParser::new()),
        client.clone(),
        client,
    ));

    let server = RagServer::new(config, pipeline);

    tracing::info!("Endpoints:");
    tracing::info!("  POST /ingest - Upload a document");
    tracing::info!("  POST /ask    - Ask a question");
    tracing::info!("  GET  /status - Current document info");

    server.start().await?;

    Ok(())
}
