//! Chat flow: validate → best-effort prediction lookup → prompt → generate → relay.

use chrono::Utc;
use tracing::info;
use uuid::Uuid;

use crate::chat::models::{ChatMetadata, ChatRequest, ChatResponse, Language, PredictionSummary};
use crate::chat::prompt_builder::{build_prompt, validated_question};
use crate::chat::prompts::FALLBACK_ANSWER;
use crate::errors::AppError;
use crate::identity::CallerIdentity;
use crate::llm_client::{parse_temperature, GenerationConfig, LlmClient, LlmError};
use crate::predictions::{lookup_latest_best_effort, PredictionLookup};

/// Answers one farmer question. Never returns an empty answer on success.
pub async fn answer_question(
    llm: &LlmClient,
    predictions: &dyn PredictionLookup,
    caller: &CallerIdentity,
    request: &ChatRequest,
    expose_details: bool,
) -> Result<ChatResponse, AppError> {
    let question = validated_question(request.question.as_deref())?;
    let language = Language::from_code(request.language.as_deref());
    let temperature = parse_temperature(request.temperature.as_ref());

    if !llm.has_api_key() {
        return Err(AppError::from_llm(LlmError::MissingApiKey, expose_details));
    }

    let used_prediction = lookup_latest_best_effort(predictions, &caller.user_id)
        .await
        .as_ref()
        .and_then(PredictionSummary::from_record);

    let prompt = build_prompt(
        &caller.profile,
        used_prediction.as_ref(),
        question,
        language,
    );

    let request_id = Uuid::new_v4();
    info!(
        %request_id,
        user_id = %caller.user_id,
        language = language.code(),
        temperature,
        has_prediction = used_prediction.is_some(),
        "Submitting chat prompt ({} chars)",
        prompt.chars().count()
    );

    let generated = llm
        .generate(&prompt, &GenerationConfig::with_temperature(temperature))
        .await
        .map_err(|e| AppError::from_llm(e, expose_details))?;

    let answer = match generated.text() {
        Some(text) => text,
        None => {
            info!(%request_id, "Model returned no usable text, sending fallback answer");
            FALLBACK_ANSWER.to_string()
        }
    };

    Ok(ChatResponse {
        success: true,
        answer,
        metadata: ChatMetadata {
            language,
            used_prediction,
            model: llm.model().to_string(),
            temperature,
            request_id,
            timestamp: Utc::now(),
        },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::models::UserProfile;
    use crate::config::Config;
    use crate::predictions::testing::{FailingLookup, FixedLookup};
    use crate::predictions::NullPredictionLookup;
    use mockito::Matcher;
    use serde_json::json;

    const GENERATE_PATH: &str = "/gemini-1.5-flash:generateContent";

    fn raj() -> CallerIdentity {
        CallerIdentity {
            user_id: "user-42".to_string(),
            profile: serde_json::from_value(json!({
                "name": "Raj",
                "farmDetails": { "region": "Gujarat", "crops": ["wheat"] }
            }))
            .unwrap(),
        }
    }

    fn request(question: &str, language: Option<&str>) -> ChatRequest {
        ChatRequest {
            question: Some(question.to_string()),
            language: language.map(str::to_string),
            temperature: None,
        }
    }

    fn answer_body(text: &str) -> String {
        json!({ "candidates": [{ "content": { "parts": [{ "text": text }] } }] }).to_string()
    }

    #[tokio::test]
    async fn test_blank_question_never_reaches_the_network() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", Matcher::Any)
            .expect(0)
            .create_async()
            .await;
        let llm = LlmClient::new(&Config::for_tests(&server.url())).unwrap();

        let err = answer_question(&llm, &NullPredictionLookup, &raj(), &request("   ", None), true)
            .await
            .unwrap_err();

        assert_eq!(err.code(), "MISSING_QUESTION");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_end_to_end_prompt_contents_and_default_temperature() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", GENERATE_PATH)
            .match_query(Matcher::UrlEncoded("key".into(), "test-key".into()))
            .match_body(Matcher::AllOf(vec![
                Matcher::PartialJson(json!({ "generationConfig": { "temperature": 0.4 } })),
                Matcher::Regex("When should I irrigate wheat\\?".to_string()),
                Matcher::Regex("Gujarat".to_string()),
                Matcher::Regex("Crops: wheat".to_string()),
                Matcher::Regex("No recent prediction is available for this farmer.".to_string()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(answer_body("Irrigate at crown root initiation."))
            .expect(1)
            .create_async()
            .await;
        let llm = LlmClient::new(&Config::for_tests(&server.url())).unwrap();

        let response = answer_question(
            &llm,
            &NullPredictionLookup,
            &raj(),
            &request("When should I irrigate wheat?", Some("en")),
            true,
        )
        .await
        .unwrap();

        mock.assert_async().await;
        assert!(response.success);
        assert_eq!(response.answer, "Irrigate at crown root initiation.");
        assert_eq!(response.metadata.language, Language::English);
        assert_eq!(response.metadata.temperature, 0.4);
        assert!(response.metadata.used_prediction.is_none());
    }

    #[tokio::test]
    async fn test_failing_lookup_behaves_like_no_prediction() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", GENERATE_PATH)
            .match_query(Matcher::Any)
            .match_body(Matcher::Regex("No recent prediction".to_string()))
            .with_status(200)
            .with_body(answer_body("ok"))
            .create_async()
            .await;
        let llm = LlmClient::new(&Config::for_tests(&server.url())).unwrap();

        let response = answer_question(
            &llm,
            &FailingLookup,
            &raj(),
            &request("Is it going to rain?", Some("en")),
            true,
        )
        .await
        .unwrap();

        assert!(response.metadata.used_prediction.is_none());
        let body = serde_json::to_value(&response).unwrap();
        assert_eq!(body["metadata"]["usedPrediction"], serde_json::Value::Null);
    }

    #[tokio::test]
    async fn test_stored_prediction_is_used() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", GENERATE_PATH)
            .match_query(Matcher::Any)
            .match_body(Matcher::Regex("leaf rust".to_string()))
            .with_status(200)
            .with_body(answer_body("Spray propiconazole."))
            .create_async()
            .await;
        let llm = LlmClient::new(&Config::for_tests(&server.url())).unwrap();
        let lookup = FixedLookup(json!({ "type": "disease", "prediction": "leaf rust", "probability": 0.9 }));

        let response = answer_question(
            &llm,
            &lookup,
            &raj(),
            &request("What should I spray?", Some("en")),
            true,
        )
        .await
        .unwrap();

        let used = response.metadata.used_prediction.unwrap();
        assert_eq!(used.result.as_deref(), Some("leaf rust"));
        assert_eq!(used.confidence, Some(90.0));
    }

    #[tokio::test]
    async fn test_empty_candidates_yield_fallback_answer() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", GENERATE_PATH)
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(r#"{"candidates": []}"#)
            .create_async()
            .await;
        let llm = LlmClient::new(&Config::for_tests(&server.url())).unwrap();

        let response = answer_question(
            &llm,
            &NullPredictionLookup,
            &raj(),
            &request("Best sowing date?", None),
            true,
        )
        .await
        .unwrap();

        assert!(response.success);
        assert_eq!(response.answer, FALLBACK_ANSWER);
        assert_eq!(response.metadata.language, Language::Hindi);
    }

    #[tokio::test]
    async fn test_missing_api_key_is_config_error() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", Matcher::Any)
            .expect(0)
            .create_async()
            .await;
        let mut config = Config::for_tests(&server.url());
        config.gemini_api_key = None;
        let llm = LlmClient::new(&config).unwrap();

        let err = answer_question(&llm, &NullPredictionLookup, &raj(), &request("q", None), true)
            .await
            .unwrap_err();

        assert_eq!(err.code(), "CONFIG_ERROR");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_upstream_failure_is_chat_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", GENERATE_PATH)
            .match_query(Matcher::Any)
            .with_status(500)
            .with_body("internal")
            .create_async()
            .await;
        let llm = LlmClient::new(&Config::for_tests(&server.url())).unwrap();

        let err = answer_question(
            &llm,
            &NullPredictionLookup,
            &CallerIdentity {
                user_id: "u".to_string(),
                profile: UserProfile::default(),
            },
            &request("q", None),
            false,
        )
        .await
        .unwrap_err();

        match err {
            AppError::Chat { detail, .. } => assert!(detail.is_none()),
            other => panic!("unexpected: {other:?}"),
        }
    }
}
