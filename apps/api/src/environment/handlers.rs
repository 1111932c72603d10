//! Axum route handlers for the Environment API.

use axum::{
    extract::{rejection::QueryRejection, Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::environment::location::{resolve_location, Location};
use crate::environment::EnvironmentKind;
use crate::errors::AppError;
use crate::normalize::classify::FieldReport;
use crate::normalize::normalize;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct LocationQuery {
    pub region: Option<String>,
    pub subregion: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EnvironmentResponse {
    pub success: bool,
    pub kind: &'static str,
    pub location: Location,
    #[serde(flatten)]
    pub report: FieldReport,
}

/// GET /api/v1/environment/:kind?region=&subregion=
///
/// Fetches soil or weather data for the location and returns it normalized,
/// with levels and display strings per canonical field.
pub async fn handle_environment(
    State(state): State<AppState>,
    Path(kind): Path<String>,
    params: Result<Query<LocationQuery>, QueryRejection>,
) -> Result<Json<EnvironmentResponse>, AppError> {
    let Query(params) = params?;
    let kind = EnvironmentKind::from_slug(&kind)
        .ok_or_else(|| AppError::Validation(format!("unknown environment kind '{kind}'")))?;

    let location = resolve_location(params.region.as_deref(), params.subregion.as_deref());

    let payload = state
        .environment
        .fetch(kind, &location)
        .await
        .map_err(|e| AppError::from_provider(e, !state.config.is_production()))?;

    let payload_kind = kind.payload_kind();
    let normalized = normalize(&payload, payload_kind.table());
    info!(
        "Normalized {} payload for {}: {} fields resolved",
        payload_kind.as_str(),
        location.region,
        normalized.known_count()
    );

    Ok(Json(EnvironmentResponse {
        success: true,
        kind: payload_kind.as_str(),
        location,
        report: FieldReport::from_normalized(&normalized),
    }))
}
