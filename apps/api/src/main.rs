mod analysis;
mod config;
mod errors;
mod extraction;
mod interview;
mod keywords;
mod llm_client;
mod routes;
mod state;
mod tasks;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::Mutex;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::keywords::{KeywordExtractor, NER_MODEL};
use crate::llm_client::{LlmClient, MODEL};
use crate::routes::build_router;
use crate::state::AppState;
use crate::tasks::TaskRunner;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails fast on a missing credential)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Career Navigator API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize the LLM client and the task executor on top of it
    let llm = LlmClient::new(config.groq_api_key.clone());
    let tasks = TaskRunner::new(Arc::new(llm));
    info!("LLM client initialized (model: {MODEL})");

    // Load the NER model; the engine runs without keywords if this fails
    let keywords = match KeywordExtractor::load().await {
        Ok(extractor) => {
            info!("NER model loaded ({NER_MODEL})");
            Some(Arc::new(extractor))
        }
        Err(e) => {
            warn!("keyword extraction disabled: {e}");
            None
        }
    };

    // Build app state
    let state = AppState {
        tasks,
        keywords,
        interview: Arc::new(Mutex::new(None)),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
