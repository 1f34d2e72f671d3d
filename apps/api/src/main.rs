mod config;
mod errors;
mod extraction;
mod generation;
mod routes;
mod scoring;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::generation::client::CommandGenerator;
use crate::routes::build_router;
use crate::scoring::BertEmbedder;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_CRATE_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Resume Match API v{}", env!("CARGO_PKG_VERSION"));

    // Load the embedding model once; every request shares it read-only
    let model_id = config.embedding_model.clone();
    let embedder = tokio::task::spawn_blocking(move || BertEmbedder::load(&model_id))
        .await?
        .with_context(|| format!("Failed to load embedding model '{}'", config.embedding_model))?;

    let generator = CommandGenerator::from_config(&config);
    info!(
        "Generation runner: '{}' (timeout {:?})",
        generator.command_line(),
        config.generation_timeout
    );

    let state = AppState {
        config: config.clone(),
        embedder: Arc::new(embedder),
        generator: Arc::new(generator),
    };

    if config.enable_debug_routes {
        info!("Debug route POST /test enabled");
    }

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins before exposing beyond localhost

    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("HOST/PORT do not form a valid socket address")?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
