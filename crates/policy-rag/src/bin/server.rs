//! Policy Q&A server binary
//!
//! Run with: cargo run -p policy-rag --bin policy-rag-server -- --backend ollama

use clap::Parser;
use policy_rag::{
    config::{BackendProvider, RagConfig},
    server::RagServer,
};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser, Debug)]
#[command(name = "policy-rag-server", version, about = "Document Q&A server with structured answers")]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Bind address
    #[arg(long)]
    host: Option<String>,

    /// Listen port
    #[arg(short, long)]
    port: Option<u16>,

    /// Generation backend (gemini or ollama)
    #[arg(short, long)]
    backend: Option<BackendProvider>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "policy_rag=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    // Load configuration: file, then environment, then flags
    let mut config = match &args.config {
        Some(path) => RagConfig::from_file(path)?,
        None => RagConfig::default(),
    };
    config.apply_env()?;

    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(backend) = args.backend {
        config.backend = backend;
    }
    config.validate()?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Backend: {:?}", config.backend);
    tracing::info!("  - Model: {}", config.model_name());
    tracing::info!("  - Chunk size: {}", config.chunking.chunk_size);
    tracing::info!("  - Overlap sentences: {}", config.chunking.overlap_sentences);
    tracing::info!("  - Top k: {}", config.retrieval.top_k);

    let server = RagServer::new(config)?;

    if !server.state().check_backend().await {
        tracing::warn!("Starting anyway; questions will fail until the backend is reachable");
    }

    println!("\nServer starting...");
    println!("  API: http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("  API Info: http://{}/api/info", server.address());
    println!("\nEndpoints:");
    println!("  POST /api/query  - Answer questions about a document");
    println!("  POST /hackrx/run - Same, original path");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
