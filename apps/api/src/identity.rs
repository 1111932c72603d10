//! Caller identity injected by the upstream auth gateway.
//!
//! The gateway authenticates the farmer and forwards two headers:
//! `x-user-id` (required) and `x-user-profile` (optional, JSON-encoded profile).

use axum::{async_trait, extract::FromRequestParts, http::request::Parts};
use tracing::warn;

use crate::chat::models::UserProfile;
use crate::errors::AppError;

pub const USER_ID_HEADER: &str = "x-user-id";
pub const USER_PROFILE_HEADER: &str = "x-user-profile";

#[derive(Debug, Clone)]
pub struct CallerIdentity {
    pub user_id: String,
    pub profile: UserProfile,
}

#[async_trait]
impl<S> FromRequestParts<S> for CallerIdentity
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user_id = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
            .ok_or(AppError::Unauthorized)?
            .to_string();

        let profile = parts
            .headers
            .get(USER_PROFILE_HEADER)
            .map(|v| parse_profile(v.as_bytes(), &user_id))
            .unwrap_or_default();

        Ok(CallerIdentity { user_id, profile })
    }
}

/// A malformed profile degrades to an empty one; the prompt then uses placeholders.
fn parse_profile(raw: &[u8], user_id: &str) -> UserProfile {
    serde_json::from_slice(raw).unwrap_or_else(|e| {
        warn!("Ignoring malformed profile header for user {user_id}: {e}");
        UserProfile::default()
    })
}
