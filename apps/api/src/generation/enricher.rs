//! Context Enricher — builds the richer session-aware prompt for the online
//! service when full session context is available.

use crate::generation::prompts::CONTEXTUAL_PROMPT_TEMPLATE;
use crate::llm_client::prompts::JSON_ARRAY_ONLY;
use crate::models::session::{QuestionData, RequestMetadata, WeeklyPlanData};

/// The slice of session context the contextual prompt needs. Only
/// constructible when questions, plan, and a valid selected index are all
/// present.
pub struct SessionPromptContext<'a> {
    pub questions: &'a [QuestionData],
    pub selected: &'a QuestionData,
    pub plan: &'a WeeklyPlanData,
}

/// Extracts a complete prompt context from request metadata.
///
/// Returns `None` when the metadata is absent or incomplete (no questions,
/// no weekly plan, or an out-of-range selected index); the caller then falls
/// back to the plain five-phase builder.
pub fn contextual_inputs(metadata: &RequestMetadata) -> Option<SessionPromptContext<'_>> {
    let questions = metadata.questions.as_deref().filter(|q| !q.is_empty())?;
    let plan = metadata.weekly_plan.as_ref()?;
    let selected = questions.get(metadata.selected_question_index?)?;

    Some(SessionPromptContext {
        questions,
        selected,
        plan,
    })
}

/// Builds the context-enriched prompt: every question/response pair as
/// background, the selected question highlighted as the generation target,
/// and the five weekly-plan fields verbatim.
pub fn build_contextual_prompt(ctx: &SessionPromptContext<'_>) -> String {
    let question_block = ctx
        .questions
        .iter()
        .enumerate()
        .map(|(i, q)| {
            format!("{}. {}\n   Response: {}", i + 1, q.question, q.transcription)
        })
        .collect::<Vec<_>>()
        .join("\n");

    CONTEXTUAL_PROMPT_TEMPLATE
        .replace("{ideal_week}", &ctx.plan.ideal_week)
        .replace("{obstacles}", &ctx.plan.obstacles)
        .replace("{prevent_actions}", &ctx.plan.prevent_actions)
        .replace("{action_details}", &ctx.plan.action_details)
        .replace("{if_then_plans}", &ctx.plan.if_then_plans)
        .replace("{question_block}", &question_block)
        .replace("{selected_question}", &ctx.selected.question)
        .replace("{selected_response}", &ctx.selected.transcription)
        .replace("{output_contract}", JSON_ARRAY_ONLY)
}
