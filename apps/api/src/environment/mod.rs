// Soil and weather data for the dashboard: resolve the caller's location,
// fetch the provider payload, and reshape it through the field normalizer.

pub mod client;
pub mod handlers;
pub mod location;

use crate::normalize::tables::PayloadKind;

/// Environmental payloads the providers serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnvironmentKind {
    Soil,
    Weather,
}

impl EnvironmentKind {
    pub fn from_slug(slug: &str) -> Option<Self> {
        match PayloadKind::from_slug(slug)? {
            PayloadKind::Soil => Some(EnvironmentKind::Soil),
            PayloadKind::Weather => Some(EnvironmentKind::Weather),
            PayloadKind::Prediction => None,
        }
    }

    pub fn payload_kind(&self) -> PayloadKind {
        match self {
            EnvironmentKind::Soil => PayloadKind::Soil,
            EnvironmentKind::Weather => PayloadKind::Weather,
        }
    }
}
