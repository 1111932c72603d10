pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::chat::handlers::handle_chat;
use crate::environment::handlers::handle_environment;
use crate::normalize::handlers::handle_normalize;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Chat API
        .route("/api/v1/chat", post(handle_chat))
        // Environment API (soil / weather)
        .route("/api/v1/environment/:kind", get(handle_environment))
        // Normalize API
        .route("/api/v1/normalize/:kind", post(handle_normalize))
        .with_state(state)
}
