use anyhow::{Context, Result};

use crate::environment::client::{DEFAULT_SOIL_API_URL, DEFAULT_WEATHER_API_URL};
use crate::llm_client::{DEFAULT_API_URL, DEFAULT_MODEL};

/// Application configuration loaded from environment variables.
///
/// Upstream credentials are optional at startup: a missing generation key is
/// reported per request as a configuration error instead of stopping the service.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: Option<String>,
    pub gemini_api_url: String,
    pub gemini_model: String,
    pub database_url: Option<String>,
    pub weather_api_url: String,
    pub weather_api_key: Option<String>,
    pub soil_api_url: String,
    pub app_env: String,
    pub port: u16,
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            gemini_api_key: optional_env("GEMINI_API_KEY"),
            gemini_api_url: optional_env("GEMINI_API_URL")
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            gemini_model: optional_env("GEMINI_MODEL")
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            database_url: optional_env("DATABASE_URL"),
            weather_api_url: optional_env("WEATHER_API_URL")
                .unwrap_or_else(|| DEFAULT_WEATHER_API_URL.to_string()),
            weather_api_key: optional_env("WEATHER_API_KEY"),
            soil_api_url: optional_env("SOIL_API_URL")
                .unwrap_or_else(|| DEFAULT_SOIL_API_URL.to_string()),
            app_env: optional_env("APP_ENV").unwrap_or_else(|| "development".to_string()),
            port: std::env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }

    /// Production hides upstream error details from response bodies.
    pub fn is_production(&self) -> bool {
        self.app_env.eq_ignore_ascii_case("production")
    }

    /// Configuration pointing every upstream at `base_url`, for tests.
    #[cfg(test)]
    pub fn for_tests(base_url: &str) -> Self {
        Config {
            gemini_api_key: Some("test-key".to_string()),
            gemini_api_url: base_url.to_string(),
            gemini_model: DEFAULT_MODEL.to_string(),
            database_url: None,
            weather_api_url: format!("{base_url}/weather"),
            weather_api_key: Some("weather-key".to_string()),
            soil_api_url: format!("{base_url}/soil"),
            app_env: "development".to_string(),
            port: 0,
            rust_log: "debug".to_string(),
        }
    }
}

/// Reads `key`, treating unset and blank values the same.
fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
