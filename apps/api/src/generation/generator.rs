//! Online generation — orchestrates one request through the pipeline.
//!
//! Flow: context enrichment (when full session context is present) or the
//! plain five-phase builder → completion call → parse → exactly five strings.
//! Every completion/parse failure degrades to the deterministic mock; only
//! `NoUsableInput` propagates, and the handler maps it to a client error.

use tracing::{debug, warn};

use crate::generation::enricher::{build_contextual_prompt, contextual_inputs, SessionPromptContext};
use crate::generation::mock::{mock_counterfactuals, MockSource};
use crate::generation::parser::{parse_records, parse_string_array};
use crate::generation::prompt_builder::{build_phase_prompt, split_phase_text};
use crate::generation::GenerateError;
use crate::llm_client::Completion;

/// The online contract: every successful response carries exactly this many
/// counterfactuals.
pub const EXPECTED_COUNT: usize = 5;

/// Padding value when the model returns fewer than five usable records.
const PAD_FALLBACK: &str = "Additional counterfactual needed";

/// Generates exactly five counterfactual strings for one request.
///
/// `completion` is `None` when no credentials are configured — the mock
/// generator answers directly in that case.
pub async fn generate_counterfactuals(
    completion: Option<&dyn Completion>,
    text: &str,
    metadata: Option<&crate::models::session::RequestMetadata>,
) -> Result<Vec<String>, GenerateError> {
    if let Some(ctx) = metadata.and_then(|m| contextual_inputs(m)) {
        debug!("using context-enriched prompt for counterfactual generation");
        return Ok(contextual_counterfactuals(completion, &ctx).await);
    }

    plain_counterfactuals(completion, text).await
}

/// Context-enriched path. Always yields five strings: completion failures and
/// unusable output fall back to the session mock.
async fn contextual_counterfactuals(
    completion: Option<&dyn Completion>,
    ctx: &SessionPromptContext<'_>,
) -> Vec<String> {
    if let Some(completion) = completion {
        let prompt = build_contextual_prompt(ctx);
        match complete_string_array(completion, &prompt).await {
            Ok(counterfactuals) => return counterfactuals,
            Err(e) => {
                warn!("contextual generation failed, falling back to mock: {e}");
            }
        }
    }

    mock_counterfactuals(MockSource::Session {
        question: ctx.selected,
        plan: ctx.plan,
    })
}

/// Plain five-phase path. `NoUsableInput` propagates; completion and parse
/// failures fall back to the phase mock.
async fn plain_counterfactuals(
    completion: Option<&dyn Completion>,
    text: &str,
) -> Result<Vec<String>, GenerateError> {
    let slots = split_phase_text(text);
    let prompt = build_phase_prompt(&slots)?;

    let Some(completion) = completion else {
        return Ok(mock_counterfactuals(MockSource::Phases(&slots)));
    };

    match complete_phase_records(completion, &prompt).await {
        Ok(counterfactuals) => Ok(counterfactuals),
        Err(e) => {
            warn!("phase generation failed, falling back to mock: {e}");
            Ok(mock_counterfactuals(MockSource::Phases(&slots)))
        }
    }
}

async fn complete_string_array(
    completion: &dyn Completion,
    prompt: &str,
) -> Result<Vec<String>, GenerateError> {
    let raw = completion.complete(prompt).await?;
    let strings = parse_string_array(&raw)?;
    if strings.len() < EXPECTED_COUNT {
        return Err(GenerateError::UnparsableOutput(format!(
            "expected {} counterfactuals, got {}",
            EXPECTED_COUNT,
            strings.len()
        )));
    }
    Ok(strings.into_iter().take(EXPECTED_COUNT).collect())
}

async fn complete_phase_records(
    completion: &dyn Completion,
    prompt: &str,
) -> Result<Vec<String>, GenerateError> {
    let raw = completion.complete(prompt).await?;
    let parsed = parse_records(&raw)?;
    if parsed.dropped > 0 {
        warn!("{} counterfactual elements dropped during parsing", parsed.dropped);
    }

    let mut counterfactuals: Vec<String> = parsed
        .records
        .into_iter()
        .map(|r| r.counterfactual)
        .collect();
    while counterfactuals.len() < EXPECTED_COUNT {
        counterfactuals.push(PAD_FALLBACK.to_string());
    }
    counterfactuals.truncate(EXPECTED_COUNT);
    Ok(counterfactuals)
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use crate::llm_client::CompletionError;
    use crate::models::session::{QuestionData, RequestMetadata, WeeklyPlanData};

    /// Scripted completion fake: answers with a fixed body or a fixed failure.
    struct Scripted {
        body: Option<String>,
    }

    impl Scripted {
        fn ok(body: &str) -> Self {
            Scripted {
                body: Some(body.to_string()),
            }
        }

        fn failing() -> Self {
            Scripted { body: None }
        }
    }

    #[async_trait]
    impl Completion for Scripted {
        async fn complete(&self, _prompt: &str) -> Result<String, CompletionError> {
            match &self.body {
                Some(body) => Ok(body.clone()),
                None => Err(CompletionError::Service {
                    status: 529,
                    message: "overloaded".to_string(),
                }),
            }
        }
    }

    const FIVE_LINES: &str = "I chose to stay home instead of going to the party\n\
        I stayed in my room when feeling overwhelmed\n\
        I focused on my breathing to calm down\n\
        I told myself this feeling was temporary\n\
        I took deep breaths to manage my anxiety";

    fn full_metadata() -> RequestMetadata {
        RequestMetadata {
            session_id: Some("s-1".to_string()),
            user_id: Some("u_1".to_string()),
            questions: Some(vec![QuestionData {
                step_number: 1,
                question: "What happened?".to_string(),
                transcription: "I snapped at my sister".to_string(),
                recording_id: None,
            }]),
            weekly_plan: Some(WeeklyPlanData {
                ideal_week: "Patient conversations".to_string(),
                obstacles: "Short temper when tired".to_string(),
                prevent_actions: "Pause before replying".to_string(),
                action_details: "Count to five first".to_string(),
                if_then_plans: "If I feel heat rising, then step away".to_string(),
                week_start_date: "2024-06-01".to_string(),
                week_end_date: "2024-06-07".to_string(),
            }),
            selected_question_index: Some(0),
            timestamp: None,
        }
    }

    #[tokio::test]
    async fn test_no_credentials_yields_five_mock_strings_from_input_lines() {
        let cfs = generate_counterfactuals(None, FIVE_LINES, None).await.unwrap();
        assert_eq!(cfs.len(), 5);
        assert!(cfs.iter().all(|c| !c.is_empty()));
        assert!(cfs[0].contains("I chose to stay home instead of going to the party"));
        assert!(cfs[3].contains("I told myself this feeling was temporary"));
    }

    #[tokio::test]
    async fn test_empty_text_is_no_usable_input() {
        let err = generate_counterfactuals(None, "\n\n  \n", None)
            .await
            .unwrap_err();
        assert!(matches!(err, GenerateError::NoUsableInput));
    }

    #[tokio::test]
    async fn test_plain_path_extracts_and_pads_counterfactuals() {
        let body = r#"[
            {"journal_id": 1, "which_phase": "situationSelection", "original_phase": "o1", "counterfactual": "cf one"},
            {"journal_id": 1, "which_phase": "situationModification", "original_phase": "o2", "counterfactual": "cf two"}
        ]"#;
        let scripted = Scripted::ok(body);
        let cfs = generate_counterfactuals(Some(&scripted), FIVE_LINES, None)
            .await
            .unwrap();
        assert_eq!(cfs.len(), 5);
        assert_eq!(cfs[0], "cf one");
        assert_eq!(cfs[1], "cf two");
        assert_eq!(cfs[2], "Additional counterfactual needed");
    }

    #[tokio::test]
    async fn test_plain_path_unparsable_output_falls_back_to_mock() {
        let scripted = Scripted::ok("not json at all");
        let cfs = generate_counterfactuals(Some(&scripted), FIVE_LINES, None)
            .await
            .unwrap();
        assert_eq!(cfs.len(), 5);
        assert!(cfs[0].contains("I chose to stay home instead of going to the party"));
    }

    #[tokio::test]
    async fn test_contextual_path_returns_first_five_strings() {
        let scripted = Scripted::ok(r#"["a", "b", "c", "d", "e", "f"]"#);
        let metadata = full_metadata();
        let cfs = generate_counterfactuals(Some(&scripted), FIVE_LINES, Some(&metadata))
            .await
            .unwrap();
        assert_eq!(cfs, vec!["a", "b", "c", "d", "e"]);
    }

    #[tokio::test]
    async fn test_contextual_failure_falls_back_to_session_mock() {
        let scripted = Scripted::failing();
        let metadata = full_metadata();
        let cfs = generate_counterfactuals(Some(&scripted), FIVE_LINES, Some(&metadata))
            .await
            .unwrap();
        assert_eq!(cfs.len(), 5);
        assert!(cfs[0].contains("I snapped at my sister"));
        assert!(cfs[3].contains("If I feel heat rising"));
    }

    #[tokio::test]
    async fn test_contextual_short_array_falls_back_to_session_mock() {
        let scripted = Scripted::ok(r#"["only", "four", "of", "them"]"#);
        let metadata = full_metadata();
        let cfs = generate_counterfactuals(Some(&scripted), FIVE_LINES, Some(&metadata))
            .await
            .unwrap();
        assert_eq!(cfs.len(), 5);
        assert!(cfs[1].contains("Count to five first"));
    }

    #[tokio::test]
    async fn test_incomplete_metadata_uses_plain_path() {
        let mut metadata = full_metadata();
        metadata.weekly_plan = None;
        let cfs = generate_counterfactuals(None, FIVE_LINES, Some(&metadata))
            .await
            .unwrap();
        // Plain mock interpolates the request lines, not the session context
        assert!(cfs[0].contains("I chose to stay home instead of going to the party"));
    }
}
