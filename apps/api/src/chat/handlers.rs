//! Axum route handlers for the Chat API.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use crate::chat::assistant::answer_question;
use crate::chat::models::{ChatRequest, ChatResponse};
use crate::errors::AppError;
use crate::identity::CallerIdentity;
use crate::state::AppState;

/// POST /api/v1/chat
///
/// Answers a farmer's question using their profile and latest prediction.
/// Malformed bodies are reported as `VALIDATION_ERROR` in the usual failure envelope.
pub async fn handle_chat(
    State(state): State<AppState>,
    caller: CallerIdentity,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, AppError> {
    let Json(request) = payload?;

    let response = answer_question(
        &state.llm,
        state.predictions.as_ref(),
        &caller,
        &request,
        !state.config.is_production(),
    )
    .await?;

    Ok(Json(response))
}
