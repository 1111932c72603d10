use std::sync::Arc;

use crate::config::Config;
use crate::environment::client::EnvironmentClient;
use crate::llm_client::LlmClient;
use crate::predictions::PredictionLookup;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub llm: LlmClient,
    pub environment: EnvironmentClient,
    /// Pluggable prediction store. `NullPredictionLookup` when no database is configured.
    pub predictions: Arc<dyn PredictionLookup>,
    pub config: Config,
}
