//! Wire types for the optional session context attached to online requests.
//!
//! These mirror what the browser client sends. They are only ever used to
//! build a richer prompt; nothing here is persisted.

use serde::{Deserialize, Serialize};

/// One question/answer pair from the recording session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionData {
    pub step_number: i32,
    pub question: String,
    pub transcription: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub recording_id: Option<String>,
}

/// The user's weekly planning fields, passed through verbatim into prompts.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyPlanData {
    pub ideal_week: String,
    pub obstacles: String,
    pub prevent_actions: String,
    pub action_details: String,
    pub if_then_plans: String,
    pub week_start_date: String,
    pub week_end_date: String,
}

/// Session-level context. Every field is optional on the wire; the enricher
/// only engages when questions, plan, and a valid selected index are all
/// present.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequestMetadata {
    #[serde(default)]
    pub session_id: Option<String>,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub questions: Option<Vec<QuestionData>>,
    #[serde(default)]
    pub weekly_plan: Option<WeeklyPlanData>,
    #[serde(default)]
    pub selected_question_index: Option<usize>,
    #[serde(default)]
    pub timestamp: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metadata_deserializes_from_camel_case() {
        let json = r#"{
            "sessionId": "s-1",
            "userId": "u_1",
            "selectedQuestionIndex": 2,
            "timestamp": "2024-06-01T10:00:00Z",
            "questions": [
                {"stepNumber": 1, "question": "How did you feel?", "transcription": "Anxious.", "recordingId": "r-9"}
            ],
            "weeklyPlan": {
                "idealWeek": "Calm mornings",
                "obstacles": "Late nights",
                "preventActions": "Set an alarm",
                "actionDetails": "Sleep by 11pm",
                "ifThenPlans": "If tired, then nap",
                "weekStartDate": "2024-06-01",
                "weekEndDate": "2024-06-07"
            }
        }"#;
        let meta: RequestMetadata = serde_json::from_str(json).unwrap();
        assert_eq!(meta.session_id.as_deref(), Some("s-1"));
        assert_eq!(meta.selected_question_index, Some(2));
        assert_eq!(meta.questions.as_ref().unwrap()[0].step_number, 1);
        assert_eq!(meta.weekly_plan.as_ref().unwrap().obstacles, "Late nights");
    }

    #[test]
    fn test_metadata_all_fields_optional() {
        let meta: RequestMetadata = serde_json::from_str("{}").unwrap();
        assert!(meta.session_id.is_none());
        assert!(meta.questions.is_none());
        assert!(meta.weekly_plan.is_none());
    }
}
