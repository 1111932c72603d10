//! Axum route handlers for the Normalize API.

use axum::{
    extract::{rejection::JsonRejection, Path},
    Json,
};
use serde::Serialize;
use serde_json::Value;

use crate::errors::AppError;
use crate::normalize::classify::FieldReport;
use crate::normalize::normalize;
use crate::normalize::tables::PayloadKind;

#[derive(Debug, Serialize)]
pub struct NormalizeResponse {
    pub success: bool,
    pub kind: &'static str,
    #[serde(flatten)]
    pub report: FieldReport,
}

/// POST /api/v1/normalize/:kind
///
/// Reshapes a caller-supplied soil, weather, or prediction record into the
/// canonical field set. Any JSON body is accepted; unresolvable fields are null.
pub async fn handle_normalize(
    Path(kind): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<NormalizeResponse>, AppError> {
    let Json(record) = payload?;
    let kind = PayloadKind::from_slug(&kind)
        .ok_or_else(|| AppError::Validation(format!("unknown payload kind '{kind}'")))?;

    let normalized = normalize(&record, kind.table());

    Ok(Json(NormalizeResponse {
        success: true,
        kind: kind.as_str(),
        report: FieldReport::from_normalized(&normalized),
    }))
}
