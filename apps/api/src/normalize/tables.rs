//! Candidate-path tables for every upstream record shape the dashboard consumes.
//!
//! Order matters: earlier candidates win. Provider-native nesting comes first,
//! then flat keys from the current ML backend, then legacy spellings.

use super::{CandidatePath, FieldSpec, FieldTable};

const fn p(path: &'static [&'static str]) -> CandidatePath {
    CandidatePath(path)
}

/// Which table to apply to a payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    Soil,
    Weather,
    Prediction,
}

impl PayloadKind {
    pub fn from_slug(slug: &str) -> Option<Self> {
        match slug.trim().to_ascii_lowercase().as_str() {
            "soil" => Some(PayloadKind::Soil),
            "weather" => Some(PayloadKind::Weather),
            "prediction" => Some(PayloadKind::Prediction),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PayloadKind::Soil => "soil",
            PayloadKind::Weather => "weather",
            PayloadKind::Prediction => "prediction",
        }
    }

    pub fn table(&self) -> FieldTable {
        match self {
            PayloadKind::Soil => SOIL_FIELDS,
            PayloadKind::Weather => WEATHER_FIELDS,
            PayloadKind::Prediction => PREDICTION_FIELDS,
        }
    }
}

pub const SOIL_FIELDS: FieldTable = &[
    FieldSpec {
        name: "ph",
        candidates: &[
            p(&["properties", "pH"]),
            p(&["properties", "ph"]),
            p(&["ph"]),
            p(&["pH"]),
            p(&["analysis", "pH"]),
            p(&["analysis", "ph"]),
            p(&["data", "ph"]),
            p(&["data", "pH"]),
        ],
    },
    FieldSpec {
        name: "moisture",
        candidates: &[
            p(&["properties", "moisture"]),
            p(&["moisture"]),
            p(&["soilMoisture"]),
            p(&["soil_moisture"]),
            p(&["analysis", "moisture"]),
            p(&["data", "moisture"]),
            p(&["data", "soil_moisture"]),
        ],
    },
    FieldSpec {
        name: "nitrogen",
        candidates: &[
            p(&["properties", "nitrogen"]),
            p(&["nitrogen"]),
            p(&["N"]),
            p(&["n"]),
            p(&["nutrients", "nitrogen"]),
            p(&["analysis", "nitrogen"]),
            p(&["data", "nitrogen"]),
        ],
    },
    FieldSpec {
        name: "phosphorus",
        candidates: &[
            p(&["properties", "phosphorus"]),
            p(&["phosphorus"]),
            p(&["P"]),
            p(&["p"]),
            p(&["nutrients", "phosphorus"]),
            p(&["analysis", "phosphorus"]),
            p(&["data", "phosphorus"]),
        ],
    },
    FieldSpec {
        name: "potassium",
        candidates: &[
            p(&["properties", "potassium"]),
            p(&["potassium"]),
            p(&["K"]),
            p(&["k"]),
            p(&["nutrients", "potassium"]),
            p(&["analysis", "potassium"]),
            p(&["data", "potassium"]),
        ],
    },
    FieldSpec {
        name: "organicMatter",
        candidates: &[
            p(&["properties", "organicMatter"]),
            p(&["properties", "organic_matter"]),
            p(&["organicMatter"]),
            p(&["organic_matter"]),
            p(&["organicCarbon"]),
            p(&["OC"]),
            p(&["analysis", "organicMatter"]),
            p(&["data", "organic_matter"]),
        ],
    },
    FieldSpec {
        name: "soilType",
        candidates: &[
            p(&["properties", "soilType"]),
            p(&["soilType"]),
            p(&["soil_type"]),
            p(&["type"]),
            p(&["analysis", "soilType"]),
            p(&["data", "soil_type"]),
        ],
    },
];

pub const WEATHER_FIELDS: FieldTable = &[
    FieldSpec {
        name: "temperature",
        candidates: &[
            p(&["main", "temp"]),
            p(&["current", "temperature"]),
            p(&["current", "temp_c"]),
            p(&["temperature"]),
            p(&["temp"]),
            p(&["data", "temperature"]),
        ],
    },
    FieldSpec {
        name: "humidity",
        candidates: &[
            p(&["main", "humidity"]),
            p(&["current", "humidity"]),
            p(&["humidity"]),
            p(&["data", "humidity"]),
        ],
    },
    FieldSpec {
        name: "wind",
        candidates: &[
            p(&["wind", "speed"]),
            p(&["current", "wind_kph"]),
            p(&["current", "windSpeed"]),
            p(&["windSpeed"]),
            p(&["wind_speed"]),
            p(&["wind"]),
            p(&["data", "wind"]),
        ],
    },
    FieldSpec {
        name: "rainfall",
        candidates: &[
            p(&["rain", "1h"]),
            p(&["current", "precip_mm"]),
            p(&["rainfall"]),
            p(&["precipitation"]),
            p(&["data", "rainfall"]),
        ],
    },
    FieldSpec {
        name: "description",
        candidates: &[
            p(&["weather", "0", "description"]),
            p(&["current", "condition", "text"]),
            p(&["description"]),
            p(&["condition"]),
            p(&["data", "description"]),
        ],
    },
];

pub const PREDICTION_FIELDS: FieldTable = &[
    FieldSpec {
        name: "type",
        candidates: &[p(&["type"]), p(&["predictionType"]), p(&["label"]), p(&["model"])],
    },
    FieldSpec {
        name: "result",
        candidates: &[
            p(&["result"]),
            p(&["prediction"]),
            p(&["output", "label"]),
            p(&["data", "prediction"]),
        ],
    },
    FieldSpec {
        name: "confidence",
        candidates: &[
            p(&["confidence"]),
            p(&["probability"]),
            p(&["output", "confidence"]),
            p(&["data", "confidence"]),
        ],
    },
    FieldSpec {
        name: "crop",
        candidates: &[p(&["crop"]), p(&["cropType"]), p(&["input", "crop"])],
    },
    FieldSpec {
        name: "createdAt",
        candidates: &[p(&["createdAt"]), p(&["created_at"]), p(&["timestamp"])],
    },
];
