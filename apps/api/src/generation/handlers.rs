//! Axum route handlers for the counterfactual API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use crate::errors::AppError;
use crate::generation::generator::generate_counterfactuals;
use crate::generation::GenerateError;
use crate::llm_client::Completion;
use crate::models::session::RequestMetadata;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct TextInput {
    pub text: String,
    #[serde(default)]
    pub metadata: Option<RequestMetadata>,
}

#[derive(Debug, Serialize)]
pub struct CounterfactualResponse {
    pub counterfactuals: Vec<String>,
    pub original_text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Value>,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /counterfactual
///
/// Generates five counterfactuals for the given text: five newline-separated
/// phase strings, or — when full session metadata is attached — the selected
/// question enriched with weekly-plan context. Generation failures degrade to
/// deterministic mock output; only an empty text body is a client error.
pub async fn handle_counterfactual(
    State(state): State<AppState>,
    Json(input): Json<TextInput>,
) -> Result<Json<CounterfactualResponse>, AppError> {
    if let Some(metadata) = &input.metadata {
        log_session_context(metadata);
    }

    let completion = state.llm.as_ref().map(|c| c as &dyn Completion);
    let counterfactuals =
        generate_counterfactuals(completion, &input.text, input.metadata.as_ref())
            .await
            .map_err(|e| match e {
                GenerateError::NoUsableInput => AppError::Validation(
                    "text must contain at least one non-empty phase line".to_string(),
                ),
                other => AppError::Llm(other.to_string()),
            })?;

    let metadata = input.metadata.as_ref().map(|m| {
        json!({
            "processed_at": m.timestamp,
            "session_id": m.session_id,
            "user_id": m.user_id,
            "questions_processed": m.questions.as_ref().map_or(0, |q| q.len()),
        })
    });

    Ok(Json(CounterfactualResponse {
        counterfactuals,
        original_text: input.text,
        metadata,
    }))
}

/// POST /debug-input
///
/// Echoes the received payload shape for client-side diagnostics.
pub async fn handle_debug_input(Json(input): Json<TextInput>) -> Json<Value> {
    let char_count = input.text.chars().count();
    let preview: String = if char_count > 200 {
        let head: String = input.text.chars().take(200).collect();
        format!("{head}...")
    } else {
        input.text.clone()
    };

    Json(json!({
        "received_text_length": char_count,
        "text_preview": preview,
        "has_metadata": input.metadata.is_some(),
        "metadata": input.metadata,
    }))
}

fn log_session_context(metadata: &RequestMetadata) {
    debug!(
        session_id = metadata.session_id.as_deref().unwrap_or("-"),
        user_id = metadata.user_id.as_deref().unwrap_or("-"),
        timestamp = metadata.timestamp.as_deref().unwrap_or("-"),
        selected_question_index = ?metadata.selected_question_index,
        "processing request with session metadata"
    );

    if let Some(questions) = &metadata.questions {
        for q in questions {
            debug!(
                step = q.step_number,
                recording_id = q.recording_id.as_deref().unwrap_or("-"),
                "question: {}",
                q.question
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_input_accepts_bare_text() {
        let input: TextInput = serde_json::from_str(r#"{"text": "one\ntwo"}"#).unwrap();
        assert_eq!(input.text, "one\ntwo");
        assert!(input.metadata.is_none());
    }

    #[test]
    fn test_response_omits_absent_metadata() {
        let response = CounterfactualResponse {
            counterfactuals: vec!["a".to_string()],
            original_text: "t".to_string(),
            metadata: None,
        };
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("metadata").is_none());
    }
}
