use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::environment::client::ProviderError;
use crate::llm_client::LlmError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// `detail` fields carry the upstream message and are only populated outside
/// production (see `AppError::from_llm` / `AppError::from_provider`).
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Question is missing or empty")]
    MissingQuestion,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Network error: {message}")]
    Network {
        message: String,
        detail: Option<String>,
    },

    #[error("Chat error: {message}")]
    Chat {
        message: String,
        detail: Option<String>,
    },

    #[error("Upstream provider error: {message}")]
    Upstream {
        message: String,
        detail: Option<String>,
    },

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Classifies a generation failure. Credential problems and connectivity
    /// problems get their own codes; everything else is a generic chat failure.
    pub fn from_llm(err: LlmError, expose_details: bool) -> Self {
        let message = err.to_string();
        if matches!(err, LlmError::MissingApiKey) {
            return AppError::Config(message);
        }

        let detail = expose_details.then(|| message.clone());
        if err.is_network() {
            AppError::Network { message, detail }
        } else {
            AppError::Chat { message, detail }
        }
    }

    pub fn from_provider(err: ProviderError, expose_details: bool) -> Self {
        let message = err.to_string();
        let detail = expose_details.then(|| message.clone());
        if err.is_network() {
            AppError::Network { message, detail }
        } else {
            AppError::Upstream { message, detail }
        }
    }

    /// Stable machine-readable code surfaced as `error` in the response body.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::MissingQuestion => "MISSING_QUESTION",
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Unauthorized => "UNAUTHORIZED",
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Network { .. } => "NETWORK_ERROR",
            AppError::Chat { .. } => "CHAT_ERROR",
            AppError::Upstream { .. } => "UPSTREAM_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let code = self.code();
        let (status, message, detail) = match &self {
            AppError::MissingQuestion => (
                StatusCode::BAD_REQUEST,
                "कृपया अपना प्रश्न लिखें। / Please enter your question.".to_string(),
                None,
            ),
            AppError::Validation(msg) => (
                StatusCode::BAD_REQUEST,
                format!("अमान्य अनुरोध। / Invalid request: {msg}"),
                None,
            ),
            AppError::Unauthorized => (
                StatusCode::UNAUTHORIZED,
                "कृपया लॉगिन करें। / Authentication required.".to_string(),
                None,
            ),
            AppError::Config(msg) => {
                tracing::error!("Configuration error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "सेवा अभी कॉन्फ़िगर नहीं है। / The assistant service is not configured."
                        .to_string(),
                    None,
                )
            }
            AppError::Network { message, detail } => {
                tracing::error!("Network error: {message}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "नेटवर्क समस्या, कृपया दोबारा प्रयास करें। / Network problem, please try again."
                        .to_string(),
                    detail.clone(),
                )
            }
            AppError::Chat { message, detail } => {
                tracing::error!("Chat error: {message}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "उत्तर तैयार करने में समस्या हुई। / Something went wrong while answering."
                        .to_string(),
                    detail.clone(),
                )
            }
            AppError::Upstream { message, detail } => {
                tracing::error!("Upstream provider error: {message}");
                (
                    StatusCode::BAD_GATEWAY,
                    "डेटा प्रदाता से जानकारी नहीं मिली। / The data provider did not respond correctly."
                        .to_string(),
                    detail.clone(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "आंतरिक त्रुटि। / An internal server error occurred.".to_string(),
                    None,
                )
            }
        };

        let mut body = json!({
            "success": false,
            "message": message,
            "error": code,
        });
        if let Some(detail) = detail {
            body["details"] = json!(detail);
        }

        (status, Json(body)).into_response()
    }
}
