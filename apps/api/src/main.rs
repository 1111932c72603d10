mod chat;
mod config;
mod db;
mod environment;
mod errors;
mod identity;
mod llm_client;
mod normalize;
mod predictions;
mod routes;
mod state;

use anyhow::Result;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::create_pool;
use crate::environment::client::EnvironmentClient;
use crate::llm_client::LlmClient;
use crate::predictions::{NullPredictionLookup, PgPredictionLookup, PredictionLookup};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Krishi API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize generation client
    let llm = LlmClient::new(&config)?;
    if llm.has_api_key() {
        info!("Generation client initialized (model: {})", llm.model());
    } else {
        warn!("GEMINI_API_KEY is not set; chat requests will fail with CONFIG_ERROR");
    }

    // Initialize soil / weather providers
    let environment = EnvironmentClient::new(&config)?;
    info!("Environment client initialized");

    // Prediction store is optional
    let predictions: Arc<dyn PredictionLookup> = match &config.database_url {
        Some(url) => Arc::new(PgPredictionLookup::new(create_pool(url)?)),
        None => {
            warn!("DATABASE_URL is not set; chat will run without stored predictions");
            Arc::new(NullPredictionLookup)
        }
    };

    let state = AppState {
        llm,
        environment,
        predictions,
        config: config.clone(),
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: restrict origins to the dashboard host once it has a fixed domain

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
