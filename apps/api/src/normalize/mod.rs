//! Field Normalizer: maps heterogeneously shaped upstream records onto a fixed
//! canonical field set.
//!
//! Every canonical field owns an ordered list of candidate paths (see `tables`).
//! `normalize` walks the table once per record; the first candidate that resolves
//! to a non-null value wins. Nothing here can fail: a candidate that hits a missing
//! key, a null, or a value of the wrong shape mid-path is simply skipped.

pub mod classify;
pub mod handlers;
pub mod tables;

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};
use serde_json::Value;

// ────────────────────────────────────────────────────────────────────────────
// Table model
// ────────────────────────────────────────────────────────────────────────────

/// One place a canonical field may live. A single-segment path is a top-level key;
/// longer paths descend through nested objects. Numeric segments index into arrays.
#[derive(Debug, Clone, Copy)]
pub struct CandidatePath(pub &'static [&'static str]);

/// A canonical field and its candidate paths, highest priority first.
#[derive(Debug)]
pub struct FieldSpec {
    pub name: &'static str,
    pub candidates: &'static [CandidatePath],
}

pub type FieldTable = &'static [FieldSpec];

// ────────────────────────────────────────────────────────────────────────────
// Output
// ────────────────────────────────────────────────────────────────────────────

/// A resolved canonical field: the raw upstream value, or the "unknown" sentinel.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Known(Value),
    Unknown,
}

impl FieldValue {
    pub fn is_unknown(&self) -> bool {
        matches!(self, FieldValue::Unknown)
    }

    /// Numeric view of the value. Accepts JSON numbers and numeric strings
    /// such as `"6.5"` or `"42%"`. `NaN` and infinities read as non-numeric.
    pub fn as_f64(&self) -> Option<f64> {
        let n = match self {
            FieldValue::Known(Value::Number(n)) => n.as_f64(),
            FieldValue::Known(Value::String(s)) => {
                s.trim().trim_end_matches('%').trim().parse::<f64>().ok()
            }
            _ => None,
        };
        n.filter(|n| n.is_finite())
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Known(Value::String(s)) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Plain-text rendering for prompts and labels. Numbers keep their JSON form.
    pub fn as_text(&self) -> Option<String> {
        match self {
            FieldValue::Unknown => None,
            FieldValue::Known(Value::String(s)) => {
                let s = s.trim();
                (!s.is_empty()).then(|| s.to_string())
            }
            FieldValue::Known(Value::Number(n)) => Some(n.to_string()),
            FieldValue::Known(Value::Bool(b)) => Some(b.to_string()),
            FieldValue::Known(_) => None,
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Known(v) => v.serialize(serializer),
            FieldValue::Unknown => serializer.serialize_none(),
        }
    }
}

/// Result of one normalization pass. `raw` points at the untouched input so
/// callers can fall back to it for debugging or display.
#[derive(Debug, Clone, Serialize)]
pub struct Normalized<'a> {
    pub fields: BTreeMap<&'static str, FieldValue>,
    pub raw: &'a Value,
}

impl<'a> Normalized<'a> {
    /// Looks up a canonical field. Names outside the table read as unknown.
    pub fn get(&self, name: &str) -> &FieldValue {
        self.fields.get(name).unwrap_or(&FieldValue::Unknown)
    }

    pub fn known_count(&self) -> usize {
        self.fields.values().filter(|v| !v.is_unknown()).count()
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Normalization
// ────────────────────────────────────────────────────────────────────────────

/// Resolves every field of `table` against `record`.
pub fn normalize<'a>(record: &'a Value, table: FieldTable) -> Normalized<'a> {
    let fields = table
        .iter()
        .map(|spec| (spec.name, resolve_field(record, spec)))
        .collect();

    Normalized {
        fields,
        raw: record,
    }
}

/// First candidate path of `spec` that yields a non-null value, or `Unknown`.
pub fn resolve_field(record: &Value, spec: &FieldSpec) -> FieldValue {
    spec.candidates
        .iter()
        .find_map(|path| resolve_path(record, path.0))
        .map(|v| FieldValue::Known(v.clone()))
        .unwrap_or(FieldValue::Unknown)
}

/// Descends `path` through `record`. Any missing step, null, or
/// wrong-shaped intermediate value is a non-match.
pub fn resolve_path<'v>(record: &'v Value, path: &[&str]) -> Option<&'v Value> {
    if path.is_empty() {
        return None;
    }

    path.iter()
        .try_fold(record, |node, key| match node {
            Value::Object(map) => map.get(*key),
            Value::Array(items) => key.parse::<usize>().ok().and_then(|i| items.get(i)),
            _ => None,
        })
        .filter(|v| !v.is_null())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const PH_ONLY: &[FieldSpec] = &[FieldSpec {
        name: "ph",
        candidates: &[
            CandidatePath(&["properties", "pH"]),
            CandidatePath(&["ph"]),
            CandidatePath(&["analysis", "pH"]),
        ],
    }];

    const PH_REVERSED: &[FieldSpec] = &[FieldSpec {
        name: "ph",
        candidates: &[
            CandidatePath(&["analysis", "pH"]),
            CandidatePath(&["ph"]),
            CandidatePath(&["properties", "pH"]),
        ],
    }];

    #[test]
    fn test_priority_order_decides_winner() {
        let record = json!({
            "properties": { "pH": 6.2 },
            "ph": 7.1,
            "analysis": { "pH": 5.4 }
        });

        for _ in 0..3 {
            assert_eq!(
                normalize(&record, PH_ONLY).get("ph"),
                &FieldValue::Known(json!(6.2))
            );
            assert_eq!(
                normalize(&record, PH_REVERSED).get("ph"),
                &FieldValue::Known(json!(5.4))
            );
        }
    }

    #[test]
    fn test_missing_everywhere_is_unknown() {
        let record = json!({ "moisture": 40 });
        let normalized = normalize(&record, PH_ONLY);
        assert!(normalized.get("ph").is_unknown());
        assert_eq!(normalized.known_count(), 0);
    }

    #[test]
    fn test_null_is_skipped_in_favour_of_next_candidate() {
        let record = json!({ "properties": { "pH": null }, "ph": 6.8 });
        assert_eq!(
            normalize(&record, PH_ONLY).get("ph"),
            &FieldValue::Known(json!(6.8))
        );
    }

    #[test]
    fn test_wrong_shape_mid_path_is_a_non_match() {
        let record = json!({ "properties": "not-an-object", "analysis": { "pH": 5.9 } });
        assert_eq!(
            normalize(&record, PH_ONLY).get("ph"),
            &FieldValue::Known(json!(5.9))
        );
    }

    #[test]
    fn test_non_object_record_normalizes_to_unknown() {
        for record in [json!(null), json!("text"), json!(42), json!([1, 2])] {
            assert!(normalize(&record, PH_ONLY).get("ph").is_unknown());
        }
    }

    #[test]
    fn test_array_segments_index_into_lists() {
        let record = json!({ "weather": [{ "description": "haze" }] });
        assert_eq!(
            resolve_path(&record, &["weather", "0", "description"]),
            Some(&json!("haze"))
        );
        assert_eq!(resolve_path(&record, &["weather", "3", "description"]), None);
        assert_eq!(resolve_path(&record, &["weather", "x"]), None);
    }

    #[test]
    fn test_raw_is_retained_untouched() {
        let record = json!({ "ph": 6.5, "extra": { "nested": true } });
        let normalized = normalize(&record, PH_ONLY);
        assert_eq!(normalized.raw, &record);
    }

    #[test]
    fn test_unknown_serializes_as_null() {
        let record = json!({});
        let body = serde_json::to_value(normalize(&record, PH_ONLY)).unwrap();
        assert_eq!(body["fields"]["ph"], Value::Null);
    }

    #[test]
    fn test_numeric_strings_read_as_numbers() {
        assert_eq!(FieldValue::Known(json!("42%")).as_f64(), Some(42.0));
        assert_eq!(FieldValue::Known(json!(" 6.5 ")).as_f64(), Some(6.5));
        assert_eq!(FieldValue::Known(json!("high")).as_f64(), None);
        assert_eq!(FieldValue::Unknown.as_f64(), None);
    }

    #[test]
    fn test_non_finite_strings_are_not_numbers() {
        for raw in ["NaN", "nan", "inf", "-infinity"] {
            assert_eq!(FieldValue::Known(json!(raw)).as_f64(), None, "{raw}");
        }
    }
}
