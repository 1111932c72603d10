use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::normalize::classify::format_value;
use crate::normalize::tables::PREDICTION_FIELDS;
use crate::normalize::{normalize, FieldValue};

/// Answer language. Hindi is the primary locale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Language {
    #[default]
    #[serde(rename = "hi")]
    Hindi,
    #[serde(rename = "en")]
    English,
}

impl Language {
    /// Anything that is not recognisably English selects Hindi.
    pub fn from_code(code: Option<&str>) -> Self {
        match code.map(|c| c.trim().to_ascii_lowercase()).as_deref() {
            Some("en") | Some("en-in") | Some("en-us") | Some("english") => Language::English,
            _ => Language::Hindi,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Language::Hindi => "hi",
            Language::English => "en",
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FarmDetails {
    pub region: Option<String>,
    pub location: Option<String>,
    pub crops: Option<Vec<String>>,
    pub soil_type: Option<String>,
    pub irrigation_method: Option<String>,
}

/// Farmer profile as injected by the auth layer. Every field may be missing.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub name: Option<String>,
    pub farm_details: Option<FarmDetails>,
}

impl UserProfile {
    pub fn name(&self) -> Option<&str> {
        non_blank(self.name.as_deref())
    }

    /// Region, falling back to the free-text location.
    pub fn region(&self) -> Option<&str> {
        let farm = self.farm_details.as_ref()?;
        non_blank(farm.region.as_deref()).or_else(|| non_blank(farm.location.as_deref()))
    }

    /// Non-blank crops in profile order.
    pub fn crops(&self) -> Vec<&str> {
        self.farm_details
            .as_ref()
            .and_then(|f| f.crops.as_ref())
            .map(|crops| {
                crops
                    .iter()
                    .map(|c| c.trim())
                    .filter(|c| !c.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn soil_type(&self) -> Option<&str> {
        non_blank(self.farm_details.as_ref()?.soil_type.as_deref())
    }

    pub fn irrigation_method(&self) -> Option<&str> {
        non_blank(self.farm_details.as_ref()?.irrigation_method.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// The display fields of a stored prediction, resolved across every record
/// shape the ML backend has produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionSummary {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub result: Option<String>,
    /// Percent, 0–100.
    pub confidence: Option<f64>,
    pub crop: Option<String>,
    pub created_at: Option<String>,
}

impl PredictionSummary {
    /// `None` when the record carries neither a type nor a result.
    pub fn from_record(record: &Value) -> Option<Self> {
        let normalized = normalize(record, PREDICTION_FIELDS);

        let summary = PredictionSummary {
            kind: normalized.get("type").as_text(),
            result: normalized.get("result").as_text(),
            confidence: confidence_percent(normalized.get("confidence")),
            crop: normalized.get("crop").as_text(),
            created_at: normalized.get("createdAt").as_text(),
        };

        (summary.kind.is_some() || summary.result.is_some()).then_some(summary)
    }

    pub fn confidence_display(&self) -> Option<String> {
        self.confidence
            .map(|c| format_value(&FieldValue::Known(serde_json::json!(c)), 1, "%"))
    }
}

/// Older backends report probabilities in `[0, 1]`; newer ones report percent.
/// The two are indistinguishable inside `[0, 1]`, so a percent value of exactly
/// `1` (or below) is read as a probability and scaled, e.g. `1` becomes 100%.
fn confidence_percent(value: &FieldValue) -> Option<f64> {
    let raw = value.as_f64()?;
    let percent = if (0.0..=1.0).contains(&raw) {
        raw * 100.0
    } else {
        raw
    };
    Some(percent.clamp(0.0, 100.0))
}

// ────────────────────────────────────────────────────────────────────────────
// Wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct ChatRequest {
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub language: Option<String>,
    /// Number or numeric string; anything else falls back to the default.
    #[serde(default)]
    pub temperature: Option<Value>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMetadata {
    pub language: Language,
    pub used_prediction: Option<PredictionSummary>,
    pub model: String,
    pub temperature: f32,
    pub request_id: Uuid,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub success: bool,
    pub answer: String,
    pub metadata: ChatMetadata,
}
