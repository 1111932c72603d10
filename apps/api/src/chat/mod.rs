// Farmer chat: builds a bilingual advisory prompt from the caller's profile and
// latest prediction, then relays the hosted model's answer.
// All generation calls go through llm_client; no direct API calls here.

pub mod assistant;
pub mod handlers;
pub mod models;
pub mod prompt_builder;
pub mod prompts;
