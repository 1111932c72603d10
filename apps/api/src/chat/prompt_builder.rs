//! Deterministic prompt assembly for the farmer chat assistant.
//!
//! Layout, in order: persona, profile block, prediction block (or the fixed
//! "no recent prediction" sentence), language instruction, the trimmed question,
//! and the four-part answer format. Assembly is total: missing profile or
//! prediction fields render as the language's "unknown" placeholder.

use std::fmt::Write;

use crate::chat::models::{Language, PredictionSummary, UserProfile};
use crate::chat::prompts::{text_for, PromptText};
use crate::errors::AppError;

/// Trims `raw` and rejects empty or whitespace-only questions.
pub fn validated_question(raw: Option<&str>) -> Result<&str, AppError> {
    raw.map(str::trim)
        .filter(|q| !q.is_empty())
        .ok_or(AppError::MissingQuestion)
}

pub fn build_prompt(
    profile: &UserProfile,
    prediction: Option<&PredictionSummary>,
    question: &str,
    language: Language,
) -> String {
    let text = text_for(language);
    let mut prompt = String::with_capacity(1024);

    prompt.push_str(text.persona);
    prompt.push_str("\n\n");

    push_profile(&mut prompt, text, profile);
    prompt.push('\n');

    match prediction {
        Some(p) => push_prediction(&mut prompt, text, p),
        None => {
            prompt.push_str(text.prediction_heading);
            prompt.push('\n');
            prompt.push_str(text.no_prediction);
            prompt.push('\n');
        }
    }
    prompt.push('\n');

    prompt.push_str(text.language_instruction);
    prompt.push_str("\n\n");

    prompt.push_str(text.question_heading);
    prompt.push('\n');
    prompt.push_str(question.trim());
    prompt.push_str("\n\n");

    prompt.push_str(text.format_heading);
    for step in text.format_steps {
        prompt.push('\n');
        prompt.push_str(step);
    }

    prompt
}

fn push_profile(prompt: &mut String, text: &PromptText, profile: &UserProfile) {
    let crops = profile.crops();
    let crops = if crops.is_empty() {
        text.unknown.to_string()
    } else {
        crops.join(", ")
    };

    prompt.push_str(text.profile_heading);
    push_line(prompt, text.name_label, profile.name().unwrap_or(text.unknown));
    push_line(prompt, text.region_label, profile.region().unwrap_or(text.unknown));
    push_line(prompt, text.crops_label, &crops);
    push_line(prompt, text.soil_label, profile.soil_type().unwrap_or(text.unknown));
    push_line(
        prompt,
        text.irrigation_label,
        profile.irrigation_method().unwrap_or(text.unknown),
    );
    prompt.push('\n');
}

fn push_prediction(prompt: &mut String, text: &PromptText, prediction: &PredictionSummary) {
    let confidence = prediction.confidence_display();

    prompt.push_str(text.prediction_heading);
    push_line(
        prompt,
        text.prediction_type_label,
        prediction.kind.as_deref().unwrap_or(text.unknown),
    );
    push_line(
        prompt,
        text.prediction_result_label,
        prediction.result.as_deref().unwrap_or(text.unknown),
    );
    push_line(
        prompt,
        text.prediction_confidence_label,
        confidence.as_deref().unwrap_or(text.unknown),
    );
    push_line(
        prompt,
        text.prediction_crop_label,
        prediction.crop.as_deref().unwrap_or(text.unknown),
    );
    push_line(
        prompt,
        text.prediction_date_label,
        prediction.created_at.as_deref().unwrap_or(text.unknown),
    );
    prompt.push('\n');
}

fn push_line(prompt: &mut String, label: &str, value: &str) {
    // Writing into a String cannot fail.
    let _ = write!(prompt, "\n- {label}: {value}");
}
