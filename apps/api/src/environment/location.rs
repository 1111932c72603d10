//! Location resolution for provider lookups.
//!
//! The district → state table below is a placeholder heuristic carried over from
//! the dashboard; it covers the districts seen in early pilots and is not a
//! complete gazetteer. Unresolvable locations fall back to the default region.

use serde::Serialize;

pub const DEFAULT_REGION: &str = "Gujarat";
pub const DEFAULT_SUBREGION: &str = "Ahmedabad";

const DISTRICT_STATES: &[(&str, &str)] = &[
    ("ahmedabad", "Gujarat"),
    ("anand", "Gujarat"),
    ("rajkot", "Gujarat"),
    ("surat", "Gujarat"),
    ("vadodara", "Gujarat"),
    ("amritsar", "Punjab"),
    ("ludhiana", "Punjab"),
    ("hisar", "Haryana"),
    ("karnal", "Haryana"),
    ("jaipur", "Rajasthan"),
    ("kota", "Rajasthan"),
    ("bhopal", "Madhya Pradesh"),
    ("indore", "Madhya Pradesh"),
    ("nagpur", "Maharashtra"),
    ("nashik", "Maharashtra"),
    ("pune", "Maharashtra"),
    ("lucknow", "Uttar Pradesh"),
    ("meerut", "Uttar Pradesh"),
    ("patna", "Bihar"),
    ("guntur", "Andhra Pradesh"),
    ("belagavi", "Karnataka"),
    ("mysuru", "Karnataka"),
    ("coimbatore", "Tamil Nadu"),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LocationSource {
    Caller,
    Inferred,
    Default,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Location {
    pub region: String,
    pub subregion: Option<String>,
    pub source: LocationSource,
}

/// State for a known district, case-insensitively.
pub fn infer_state(district: &str) -> Option<&'static str> {
    let district = district.trim().to_lowercase();
    DISTRICT_STATES
        .iter()
        .find(|(d, _)| *d == district)
        .map(|(_, state)| *state)
}

pub fn resolve_location(region: Option<&str>, subregion: Option<&str>) -> Location {
    let region = region.map(str::trim).filter(|r| !r.is_empty());
    let subregion = subregion.map(str::trim).filter(|s| !s.is_empty());

    match (region, subregion) {
        (Some(region), subregion) => Location {
            region: region.to_string(),
            subregion: subregion.map(str::to_string),
            source: LocationSource::Caller,
        },
        (None, Some(subregion)) => match infer_state(subregion) {
            Some(state) => Location {
                region: state.to_string(),
                subregion: Some(subregion.to_string()),
                source: LocationSource::Inferred,
            },
            None => default_location(),
        },
        (None, None) => default_location(),
    }
}

fn default_location() -> Location {
    Location {
        region: DEFAULT_REGION.to_string(),
        subregion: Some(DEFAULT_SUBREGION.to_string()),
        source: LocationSource::Default,
    }
}
