//! Prediction lookup: the port through which chat reads the caller's most
//! recent ML prediction.
//!
//! `PgPredictionLookup` is used when a database is configured; otherwise
//! `NullPredictionLookup` stands in and every caller simply has no prediction.
//! Chat never sees lookup failures: `lookup_latest_best_effort` absorbs them.

use async_trait::async_trait;
use serde_json::Value;
use sqlx::PgPool;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Lookup unavailable: {0}")]
    Unavailable(String),
}

/// Read access to stored predictions. Records are returned raw: their shape
/// depends on which backend version wrote them, so callers normalize them.
///
/// Carried in `AppState` as `Arc<dyn PredictionLookup>`.
#[async_trait]
pub trait PredictionLookup: Send + Sync {
    async fn latest_for(&self, user_id: &str) -> Result<Option<Value>, LookupError>;
}

/// Used when no persistence is configured.
pub struct NullPredictionLookup;

#[async_trait]
impl PredictionLookup for NullPredictionLookup {
    async fn latest_for(&self, _user_id: &str) -> Result<Option<Value>, LookupError> {
        Ok(None)
    }
}

/// Reads the newest row of `predictions` for a user, as a JSON object.
pub struct PgPredictionLookup {
    pool: PgPool,
}

impl PgPredictionLookup {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl PredictionLookup for PgPredictionLookup {
    async fn latest_for(&self, user_id: &str) -> Result<Option<Value>, LookupError> {
        let record: Option<Value> = sqlx::query_scalar(
            r#"
            SELECT to_jsonb(p) AS record
            FROM predictions p
            WHERE p.user_id::text = $1
            ORDER BY p.created_at DESC
            LIMIT 1
            "#,
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }
}

/// Latest prediction for `user_id`, or `None` if there is none or the lookup failed.
pub async fn lookup_latest_best_effort(
    lookup: &dyn PredictionLookup,
    user_id: &str,
) -> Option<Value> {
    match lookup.latest_for(user_id).await {
        Ok(Some(record)) if record.is_object() => Some(record),
        Ok(Some(_)) => {
            warn!("Ignoring non-object prediction record for user {user_id}");
            None
        }
        Ok(None) => {
            debug!("No stored prediction for user {user_id}");
            None
        }
        Err(e) => {
            warn!("Prediction lookup failed for user {user_id}, continuing without: {e}");
            None
        }
    }
}
