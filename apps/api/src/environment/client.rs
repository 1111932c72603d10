//! HTTP client for the soil and weather providers. Payloads come back raw;
//! reshaping is the field normalizer's job.

use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;
use crate::environment::location::Location;
use crate::environment::EnvironmentKind;

pub const DEFAULT_WEATHER_API_URL: &str = "https://api.openweathermap.org/data/2.5/weather";
pub const DEFAULT_SOIL_API_URL: &str = "http://localhost:8000/api/soil";
const PROVIDER_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("{provider} provider timed out")]
    Timeout { provider: &'static str },

    #[error("{provider} provider unreachable: {source}")]
    Transport {
        provider: &'static str,
        source: reqwest::Error,
    },

    #[error("{provider} provider returned status {status}")]
    Status { provider: &'static str, status: u16 },

    #[error("{provider} provider sent an unreadable body: {source}")]
    Parse {
        provider: &'static str,
        source: reqwest::Error,
    },
}

impl ProviderError {
    fn classify(provider: &'static str, e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ProviderError::Timeout { provider }
        } else if e.is_decode() {
            ProviderError::Parse {
                provider,
                source: e,
            }
        } else {
            ProviderError::Transport {
                provider,
                source: e,
            }
        }
    }

    pub fn is_network(&self) -> bool {
        matches!(
            self,
            ProviderError::Timeout { .. } | ProviderError::Transport { .. }
        )
    }
}

#[derive(Clone)]
pub struct EnvironmentClient {
    client: Client,
    weather_url: String,
    weather_key: Option<String>,
    soil_url: String,
}

impl EnvironmentClient {
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        Ok(Self {
            client: Client::builder().timeout(PROVIDER_TIMEOUT).build()?,
            weather_url: config.weather_api_url.clone(),
            weather_key: config.weather_api_key.clone(),
            soil_url: config.soil_api_url.clone(),
        })
    }

    /// Fetches the raw provider payload for `location`.
    pub async fn fetch(
        &self,
        kind: EnvironmentKind,
        location: &Location,
    ) -> Result<Value, ProviderError> {
        let (provider, request) = match kind {
            EnvironmentKind::Weather => {
                let mut query = vec![
                    ("q", weather_query(location)),
                    ("units", "metric".to_string()),
                ];
                if let Some(key) = &self.weather_key {
                    query.push(("appid", key.clone()));
                }
                ("weather", self.client.get(&self.weather_url).query(&query))
            }
            EnvironmentKind::Soil => {
                let mut query = vec![("region", location.region.clone())];
                if let Some(subregion) = &location.subregion {
                    query.push(("subregion", subregion.clone()));
                }
                ("soil", self.client.get(&self.soil_url).query(&query))
            }
        };

        debug!(
            "Fetching {provider} data for {} / {}",
            location.region,
            location.subregion.as_deref().unwrap_or("-")
        );

        let response = request
            .send()
            .await
            .map_err(|e| ProviderError::classify(provider, e))?;

        let status = response.status();
        if !status.is_success() {
            warn!("{provider} provider returned {status}");
            return Err(ProviderError::Status {
                provider,
                status: status.as_u16(),
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| ProviderError::classify(provider, e))
    }
}

/// `"Anand,Gujarat,IN"`, or `"Gujarat,IN"` without a subregion.
fn weather_query(location: &Location) -> String {
    match &location.subregion {
        Some(subregion) => format!("{},{},IN", subregion, location.region),
        None => format!("{},IN", location.region),
    }
}
