//! Presentation helpers on top of a normalized record: level classification
//! (good / moderate / poor / unknown) and fixed-precision display strings.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

use super::{FieldValue, Normalized};

/// Display string for the "unknown" sentinel.
pub const UNKNOWN_DISPLAY: &str = "--";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Good,
    Moderate,
    Poor,
    Unknown,
}

/// Numeric banding for a canonical field.
#[derive(Debug, Clone, Copy)]
enum Band {
    /// Good inside `good`, moderate inside `moderate`, poor elsewhere.
    Range {
        good: (f64, f64),
        moderate: (f64, f64),
    },
    /// Good at or above `good`, moderate at or above `moderate`, poor below.
    AtLeast { good: f64, moderate: f64 },
}

impl Band {
    fn classify(&self, n: f64) -> Level {
        match *self {
            Band::Range { good, moderate } => {
                if (good.0..=good.1).contains(&n) {
                    Level::Good
                } else if (moderate.0..=moderate.1).contains(&n) {
                    Level::Moderate
                } else {
                    Level::Poor
                }
            }
            Band::AtLeast { good, moderate } => {
                if n >= good {
                    Level::Good
                } else if n >= moderate {
                    Level::Moderate
                } else {
                    Level::Poor
                }
            }
        }
    }
}

fn band_for(field: &str) -> Option<Band> {
    // Nutrient bands are kg/ha, following soil health card low/medium/high cut-offs.
    let band = match field {
        "ph" => Band::Range {
            good: (6.0, 7.0),
            moderate: (5.5, 7.5),
        },
        "moisture" => Band::Range {
            good: (40.0, 70.0),
            moderate: (25.0, 80.0),
        },
        "nitrogen" => Band::AtLeast {
            good: 560.0,
            moderate: 280.0,
        },
        "phosphorus" => Band::AtLeast {
            good: 25.0,
            moderate: 10.0,
        },
        "potassium" => Band::AtLeast {
            good: 280.0,
            moderate: 110.0,
        },
        "organicMatter" => Band::AtLeast {
            good: 3.0,
            moderate: 1.5,
        },
        "temperature" => Band::Range {
            good: (15.0, 30.0),
            moderate: (10.0, 35.0),
        },
        "humidity" => Band::Range {
            good: (40.0, 70.0),
            moderate: (30.0, 85.0),
        },
        _ => return None,
    };
    Some(band)
}

/// Maps a level word reported by a provider onto a `Level`.
pub fn classify_word(word: &str) -> Level {
    match word.trim().to_lowercase().as_str() {
        "high" | "good" | "optimal" | "excellent" => Level::Good,
        "medium" | "moderate" | "average" => Level::Moderate,
        "low" | "poor" | "deficient" => Level::Poor,
        _ => Level::Unknown,
    }
}

/// Classifies a resolved value for `field`. Numbers go through the field's band,
/// words through the shared vocabulary. Anything else is unknown.
pub fn classify_level(field: &str, value: &FieldValue) -> Level {
    if value.is_unknown() {
        return Level::Unknown;
    }

    if let Some(n) = value.as_f64() {
        return band_for(field)
            .map(|band| band.classify(n))
            .unwrap_or(Level::Unknown);
    }

    value.as_str().map(classify_word).unwrap_or(Level::Unknown)
}

/// Renders a resolved value with `decimals` places and a unit suffix.
/// The unknown sentinel renders as `--`.
pub fn format_value(value: &FieldValue, decimals: usize, unit: &str) -> String {
    if let Some(n) = value.as_f64() {
        return format!("{n:.decimals$}{unit}");
    }

    match value {
        FieldValue::Known(Value::String(s)) if !s.trim().is_empty() && !is_non_finite(s) => {
            s.trim().to_string()
        }
        FieldValue::Known(Value::Bool(b)) => b.to_string(),
        _ => UNKNOWN_DISPLAY.to_string(),
    }
}

/// `"NaN"`, `"inf"` and friends: strings that parse as a float but not a finite one.
fn is_non_finite(s: &str) -> bool {
    s.trim()
        .trim_end_matches('%')
        .trim()
        .parse::<f64>()
        .map_or(false, |n| !n.is_finite())
}

/// Display precision and unit for a canonical field.
pub fn display_format(field: &str) -> (usize, &'static str) {
    match field {
        "ph" => (1, ""),
        "moisture" | "humidity" => (0, "%"),
        "nitrogen" | "phosphorus" | "potassium" => (0, " kg/ha"),
        "organicMatter" => (1, "%"),
        "temperature" => (1, "°C"),
        "wind" => (1, " m/s"),
        "rainfall" => (1, " mm"),
        "confidence" => (0, "%"),
        _ => (0, ""),
    }
}

/// A normalized record with per-field levels and display strings, as served
/// to the dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct FieldReport {
    pub fields: BTreeMap<&'static str, FieldValue>,
    pub levels: BTreeMap<&'static str, Level>,
    pub display: BTreeMap<&'static str, String>,
    pub raw: Value,
}

impl FieldReport {
    pub fn from_normalized(normalized: &Normalized<'_>) -> Self {
        let levels = normalized
            .fields
            .iter()
            .map(|(name, value)| (*name, classify_level(name, value)))
            .collect();

        let display = normalized
            .fields
            .iter()
            .map(|(name, value)| {
                let (decimals, unit) = display_format(name);
                (*name, format_value(value, decimals, unit))
            })
            .collect();

        FieldReport {
            fields: normalized.fields.clone(),
            levels,
            display,
            raw: normalized.raw.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn known(v: Value) -> FieldValue {
        FieldValue::Known(v)
    }

    #[test]
    fn test_ph_bands() {
        assert_eq!(classify_level("ph", &known(json!(6.5))), Level::Good);
        assert_eq!(classify_level("ph", &known(json!(6.0))), Level::Good);
        assert_eq!(classify_level("ph", &known(json!(7.3))), Level::Moderate);
        assert_eq!(classify_level("ph", &known(json!(4.8))), Level::Poor);
        assert_eq!(classify_level("ph", &known(json!("6.8"))), Level::Good);
    }

    #[test]
    fn test_nutrient_thresholds() {
        assert_eq!(classify_level("nitrogen", &known(json!(600))), Level::Good);
        assert_eq!(classify_level("nitrogen", &known(json!(300))), Level::Moderate);
        assert_eq!(classify_level("potassium", &known(json!(50))), Level::Poor);
    }

    #[test]
    fn test_level_words() {
        assert_eq!(classify_level("nitrogen", &known(json!("High"))), Level::Good);
        assert_eq!(classify_level("nitrogen", &known(json!("average"))), Level::Moderate);
        assert_eq!(classify_level("nitrogen", &known(json!("deficient"))), Level::Poor);
        assert_eq!(classify_level("nitrogen", &known(json!("sandy"))), Level::Unknown);
    }

    #[test]
    fn test_unknown_inputs() {
        assert_eq!(classify_level("ph", &FieldValue::Unknown), Level::Unknown);
        assert_eq!(classify_level("wind", &known(json!(4.0))), Level::Unknown);
        assert_eq!(classify_level("ph", &known(json!({ "v": 1 }))), Level::Unknown);
    }

    #[test]
    fn test_non_finite_strings_classify_and_render_as_unknown() {
        for raw in ["NaN", "inf", "Infinity"] {
            let value = known(json!(raw));
            assert_eq!(classify_level("ph", &value), Level::Unknown, "{raw}");
            assert_eq!(format_value(&value, 1, ""), UNKNOWN_DISPLAY, "{raw}");
        }
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(&known(json!(6.456)), 1, ""), "6.5");
        assert_eq!(format_value(&known(json!(42)), 0, "%"), "42%");
        assert_eq!(format_value(&known(json!("loamy")), 0, ""), "loamy");
        assert_eq!(format_value(&FieldValue::Unknown, 1, "°C"), "--");
        assert_eq!(format_value(&known(json!([])), 1, ""), "--");
    }

    #[test]
    fn test_report_for_soil_record() {
        let record = json!({ "properties": { "pH": 6.5 }, "N": "low" });
        let normalized = crate::normalize::normalize(&record, crate::normalize::tables::SOIL_FIELDS);
        let report = FieldReport::from_normalized(&normalized);

        assert_eq!(report.levels["ph"], Level::Good);
        assert_eq!(report.levels["nitrogen"], Level::Poor);
        assert_eq!(report.levels["moisture"], Level::Unknown);
        assert_eq!(report.display["ph"], "6.5");
        assert_eq!(report.display["moisture"], UNKNOWN_DISPLAY);
        assert_eq!(report.raw, record);
    }
}
