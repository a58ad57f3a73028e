//! Deterministic mock generator — the single fallback used whenever the
//! completion service is unavailable or its output is unusable.
//!
//! Template substitution only: same inputs always produce the same five
//! strings, one per phase in fixed phase order.

use crate::models::session::{QuestionData, WeeklyPlanData};

/// Context available for mock generation.
pub enum MockSource<'a> {
    /// Plain mode: the five phase slots from the request text.
    Phases(&'a [Option<String>; 5]),
    /// Enriched mode: the selected question and the weekly plan.
    Session {
        question: &'a QuestionData,
        plan: &'a WeeklyPlanData,
    },
}

/// Returns exactly five non-empty counterfactual strings.
pub fn mock_counterfactuals(source: MockSource<'_>) -> Vec<String> {
    match source {
        MockSource::Phases(texts) => {
            let slot = |i: usize, fallback: &str| -> String {
                match texts[i].as_deref() {
                    Some(s) if !s.trim().is_empty() => s.trim().to_string(),
                    _ => fallback.to_string(),
                }
            };
            vec![
                format!(
                    "Instead of {}, I could have chosen a different approach.",
                    slot(0, "the situation")
                ),
                format!(
                    "I might have modified the environment by {}.",
                    slot(1, "changing my perspective")
                ),
                format!(
                    "Rather than focusing on {}, I could focus on positive aspects.",
                    slot(2, "negative thoughts")
                ),
                format!(
                    "I could reframe {} as a learning opportunity.",
                    slot(3, "the situation")
                ),
                format!(
                    "Instead of {}, I could practice mindful response.",
                    slot(4, "reacting emotionally")
                ),
            ]
        }
        MockSource::Session { question, plan } => vec![
            format!(
                "Instead of {}, I could have chosen a different approach aligned with my goal: {}",
                excerpt(&question.transcription, 50),
                excerpt(&plan.ideal_week, 50)
            ),
            format!(
                "I could have modified the situation by implementing my planned action: {}",
                excerpt(&plan.action_details, 50)
            ),
            format!(
                "Rather than focusing on the obstacles ({}), I could have focused on positive aspects of my week plan.",
                excerpt(&plan.obstacles, 30)
            ),
            format!(
                "I could reframe this situation using my if-then plan: {}",
                excerpt(&plan.if_then_plans, 50)
            ),
            format!(
                "Instead of my initial response, I could practice the prevention actions I planned: {}",
                excerpt(&plan.prevent_actions, 50)
            ),
        ],
    }
}

/// Char-boundary-safe excerpt of at most `max_chars` characters, with a
/// trailing ellipsis marking the truncation.
fn excerpt(text: &str, max_chars: usize) -> String {
    let mut out: String = text.chars().take(max_chars).collect();
    out.push_str("...");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn plan() -> WeeklyPlanData {
        WeeklyPlanData {
            ideal_week: "Calm mornings and steady focus through the afternoon".to_string(),
            obstacles: "Late nights and doomscrolling".to_string(),
            prevent_actions: "Charge the phone outside the bedroom".to_string(),
            action_details: "Lights out by 11pm every weekday".to_string(),
            if_then_plans: "If I feel restless, then I take a short walk".to_string(),
            week_start_date: "2024-06-01".to_string(),
            week_end_date: "2024-06-07".to_string(),
        }
    }

    fn question() -> QuestionData {
        QuestionData {
            step_number: 3,
            question: "What did you focus on?".to_string(),
            transcription: "I kept replaying the argument in my head all evening".to_string(),
            recording_id: None,
        }
    }

    #[test]
    fn test_phase_mock_returns_five_nonempty_strings() {
        let texts = [
            Some("stayed home".to_string()),
            None,
            Some("my breathing".to_string()),
            None,
            None,
        ];
        let cfs = mock_counterfactuals(MockSource::Phases(&texts));
        assert_eq!(cfs.len(), 5);
        assert!(cfs.iter().all(|c| !c.is_empty()));
        assert!(cfs[0].contains("stayed home"));
        assert!(cfs[2].contains("my breathing"));
    }

    #[test]
    fn test_phase_mock_uses_defaults_for_empty_slots() {
        let texts: [Option<String>; 5] = Default::default();
        let cfs = mock_counterfactuals(MockSource::Phases(&texts));
        assert!(cfs[0].contains("the situation"));
        assert!(cfs[1].contains("changing my perspective"));
        assert!(cfs[4].contains("reacting emotionally"));
    }

    #[test]
    fn test_session_mock_interpolates_plan_excerpts() {
        let plan = plan();
        let question = question();
        let cfs = mock_counterfactuals(MockSource::Session {
            question: &question,
            plan: &plan,
        });
        assert_eq!(cfs.len(), 5);
        assert!(cfs[1].contains("Lights out by 11pm"));
        assert!(cfs[2].contains("Late nights and doomscrolling"));
        assert!(cfs[3].contains("If I feel restless"));
    }

    #[test]
    fn test_session_mock_is_deterministic() {
        let plan = plan();
        let question = question();
        let a = mock_counterfactuals(MockSource::Session {
            question: &question,
            plan: &plan,
        });
        let b = mock_counterfactuals(MockSource::Session {
            question: &question,
            plan: &plan,
        });
        assert_eq!(a, b);
    }

    #[test]
    fn test_excerpt_truncates_on_char_boundaries() {
        // Multi-byte input must not panic or split a character
        let s = "ééééé";
        assert_eq!(excerpt(s, 3), "ééé...");
        assert_eq!(excerpt("ab", 50), "ab...");
    }
}
