use anyhow::Context as _;
use dotenvy::dotenv;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod analytics;
mod config;
mod server;
mod transcription;
mod upload;

use config::Config;
use server::AppState;
use transcription::{AssemblyAiClient, TokioSleeper};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env().context("Failed to load configuration")?;
    let addr = config.listen_addr()?;

    std::fs::create_dir_all(&config.upload_dir)
        .with_context(|| format!("Failed to create upload directory {:?}", config.upload_dir))?;

    let client = AssemblyAiClient::new(&config.assemblyai).context("Failed to create AssemblyAI client")?;
    info!("Using AssemblyAI at {}", config.assemblyai.base_url);

    let state = AppState {
        provider: Arc::new(client),
        sleeper: Arc::new(TokioSleeper),
        poll: config.poll,
        upload_dir: config.upload_dir.clone(),
    };
    let app = server::build_router(state);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Server running on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
