/// Generation Client: the single point of entry for all hosted text-generation
/// calls in Krishi.
///
/// ARCHITECTURAL RULE: No other module may call the generative-language API
/// directly. All model interactions MUST go through this module.
///
/// One request per call, bounded by a fixed timeout. No automatic retry: the
/// farmer's client re-issues the question if it wants another attempt.
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::Config;

pub const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_MODEL: &str = "gemini-1.5-flash";
pub const DEFAULT_TEMPERATURE: f32 = 0.4;
const MAX_TEMPERATURE: f32 = 1.0;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(25);
const MAX_OUTPUT_TOKENS: u32 = 1024;
const TOP_P: f32 = 0.95;
const TOP_K: u32 = 40;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("Generation API key is not configured")]
    MissingApiKey,

    #[error("Generation request timed out after {}s", REQUEST_TIMEOUT.as_secs())]
    Timeout,

    #[error("Transport error: {0}")]
    Transport(reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Response parse error: {0}")]
    Parse(reqwest::Error),
}

impl LlmError {
    /// Timeouts and connectivity failures; the caller may simply try again.
    pub fn is_network(&self) -> bool {
        matches!(self, LlmError::Timeout | LlmError::Transport(_))
    }
}

impl From<reqwest::Error> for LlmError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            LlmError::Timeout
        } else if e.is_decode() {
            LlmError::Parse(e)
        } else {
            LlmError::Transport(e)
        }
    }
}

/// Parses a caller-supplied temperature (number or numeric string), clamped to
/// `[0, 1]`. Absent or unparsable input falls back to `DEFAULT_TEMPERATURE`.
pub fn parse_temperature(raw: Option<&serde_json::Value>) -> f32 {
    let parsed = match raw {
        Some(serde_json::Value::Number(n)) => n.as_f64().map(|f| f as f32),
        Some(serde_json::Value::String(s)) => s.trim().parse::<f32>().ok(),
        _ => None,
    };

    parsed
        .filter(|t| t.is_finite())
        .map(|t| t.clamp(0.0, MAX_TEMPERATURE))
        .unwrap_or(DEFAULT_TEMPERATURE)
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub max_output_tokens: u32,
    pub top_p: f32,
    pub top_k: u32,
}

impl GenerationConfig {
    pub fn with_temperature(temperature: f32) -> Self {
        Self {
            temperature,
            max_output_tokens: MAX_OUTPUT_TOKENS,
            top_p: TOP_P,
            top_k: TOP_K,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    generation_config: &'a GenerationConfig,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    role: &'a str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub usage_metadata: Option<UsageMetadata>,
}

#[derive(Debug, Deserialize)]
pub struct Candidate {
    pub content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
pub struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<Part>,
}

#[derive(Debug, Deserialize)]
pub struct Part {
    pub text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    #[serde(default)]
    pub prompt_token_count: u32,
    #[serde(default)]
    pub candidates_token_count: u32,
}

impl GenerateResponse {
    /// Concatenated text of every part of the first candidate that carries text,
    /// trimmed. `None` when nothing usable came back.
    pub fn text(&self) -> Option<String> {
        self.candidates
            .iter()
            .filter_map(|c| c.content.as_ref())
            .map(|content| {
                content
                    .parts
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .collect::<String>()
            })
            .map(|text| text.trim().to_string())
            .find(|text| !text.is_empty())
    }
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: String,
}

/// The single generation client used by all services in Krishi.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_url: String,
    model: String,
    api_key: Option<String>,
}

impl LlmClient {
    pub fn new(config: &Config) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(LlmError::Transport)?;

        Ok(Self {
            client,
            api_url: config.gemini_api_url.trim_end_matches('/').to_string(),
            model: config.gemini_model.clone(),
            api_key: config.gemini_api_key.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Submits `prompt` to the generateContent endpoint.
    /// Fails with `MissingApiKey` before touching the network when no key is set.
    pub async fn generate(
        &self,
        prompt: &str,
        generation_config: &GenerationConfig,
    ) -> Result<GenerateResponse, LlmError> {
        let api_key = self.api_key.as_deref().ok_or(LlmError::MissingApiKey)?;

        let request_body = GenerateRequest {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config,
        };

        let url = format!("{}/{}:generateContent", self.api_url, self.model);

        let response = self
            .client
            .post(&url)
            .query(&[("key", api_key)])
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorEnvelope>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            warn!("Generation API returned {}: {}", status, message);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let generated: GenerateResponse = response.json().await?;

        if let Some(usage) = &generated.usage_metadata {
            debug!(
                "Generation call succeeded: prompt_tokens={}, output_tokens={}",
                usage.prompt_token_count, usage.candidates_token_count
            );
        }

        Ok(generated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response(body: serde_json::Value) -> GenerateResponse {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_text_joins_parts_and_trims() {
        let r = response(json!({
            "candidates": [{ "content": { "parts": [{ "text": "  Irrigate " }, { "text": "at dawn. " }] } }]
        }));
        assert_eq!(r.text().as_deref(), Some("Irrigate at dawn."));
    }

    #[test]
    fn test_text_none_for_empty_candidates() {
        assert_eq!(response(json!({ "candidates": [] })).text(), None);
        assert_eq!(response(json!({})).text(), None);
        assert_eq!(
            response(json!({ "candidates": [{ "content": { "parts": [{ "text": "   " }] } }] }))
                .text(),
            None
        );
        assert_eq!(
            response(json!({ "candidates": [{ "finishReason": "SAFETY" }] })).text(),
            None
        );
    }

    #[test]
    fn test_parse_temperature() {
        assert_eq!(parse_temperature(None), DEFAULT_TEMPERATURE);
        assert_eq!(parse_temperature(Some(&json!("abc"))), DEFAULT_TEMPERATURE);
        assert_eq!(parse_temperature(Some(&json!(null))), DEFAULT_TEMPERATURE);
        assert_eq!(parse_temperature(Some(&json!(0.7))), 0.7);
        assert_eq!(parse_temperature(Some(&json!("0.2"))), 0.2);
        assert_eq!(parse_temperature(Some(&json!(3))), 1.0);
        assert_eq!(parse_temperature(Some(&json!(-1))), 0.0);
    }

    #[test]
    fn test_generation_config_wire_names() {
        let body = serde_json::to_value(GenerationConfig::with_temperature(0.4)).unwrap();
        assert_eq!(body["maxOutputTokens"], json!(MAX_OUTPUT_TOKENS));
        assert_eq!(body["topK"], json!(TOP_K));
        assert!(body.get("topP").is_some());
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_network() {
        let mut config = Config::for_tests("http://127.0.0.1:9");
        config.gemini_api_key = None;
        let client = LlmClient::new(&config).unwrap();
        let err = client
            .generate("hello", &GenerationConfig::with_temperature(0.4))
            .await
            .unwrap_err();
        assert!(matches!(err, LlmError::MissingApiKey));
        assert!(!err.is_network());
    }

    #[tokio::test]
    async fn test_api_error_message_is_extracted() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/gemini-1.5-flash:generateContent")
            .match_query(mockito::Matcher::Any)
            .with_status(400)
            .with_body(r#"{"error": {"message": "API key not valid"}}"#)
            .expect(1)
            .create_async()
            .await;

        let client = LlmClient::new(&Config::for_tests(&server.url())).unwrap();
        let err = client
            .generate("hello", &GenerationConfig::with_temperature(0.4))
            .await
            .unwrap_err();

        match err {
            LlmError::Api { status, message } => {
                assert_eq!(status, 400);
                assert_eq!(message, "API key not valid");
            }
            other => panic!("unexpected error: {other:?}"),
        }
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_network_error() {
        let client = LlmClient::new(&Config::for_tests("http://127.0.0.1:9")).unwrap();
        let err = client
            .generate("hello", &GenerationConfig::with_temperature(0.4))
            .await
            .unwrap_err();
        assert!(err.is_network(), "expected network error, got {err:?}");
    }
}
