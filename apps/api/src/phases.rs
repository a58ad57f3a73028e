//! The five Gross-model emotion regulation phases.
//!
//! Phase order is significant: index 0–4 drives both prompt construction and
//! the mapping of generated counterfactuals back onto dataset stage columns.

use std::fmt;

use serde::{Deserialize, Serialize};

/// One of the five fixed emotion regulation strategies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    #[serde(rename = "situationSelection")]
    SituationSelection,
    #[serde(rename = "situationModification")]
    SituationModification,
    #[serde(rename = "attentionalDeployment")]
    AttentionalDeployment,
    #[serde(rename = "cognitiveChange")]
    CognitiveChange,
    #[serde(rename = "responseModulation")]
    ResponseModulation,
}

impl Phase {
    /// All five phases in fixed order (index 0–4).
    pub const ALL: [Phase; 5] = [
        Phase::SituationSelection,
        Phase::SituationModification,
        Phase::AttentionalDeployment,
        Phase::CognitiveChange,
        Phase::ResponseModulation,
    ];

    /// Stage index used for dataset output columns.
    pub fn index(self) -> usize {
        match self {
            Phase::SituationSelection => 0,
            Phase::SituationModification => 1,
            Phase::AttentionalDeployment => 2,
            Phase::CognitiveChange => 3,
            Phase::ResponseModulation => 4,
        }
    }

    /// The wire tag used in prompts, LLM output, and dataset columns.
    pub fn as_str(self) -> &'static str {
        match self {
            Phase::SituationSelection => "situationSelection",
            Phase::SituationModification => "situationModification",
            Phase::AttentionalDeployment => "attentionalDeployment",
            Phase::CognitiveChange => "cognitiveChange",
            Phase::ResponseModulation => "responseModulation",
        }
    }

    /// Parses a wire tag. Returns `None` for anything outside the fixed set.
    pub fn parse(tag: &str) -> Option<Phase> {
        Phase::ALL.into_iter().find(|p| p.as_str() == tag)
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phase_order_matches_stage_index() {
        for (i, phase) in Phase::ALL.iter().enumerate() {
            assert_eq!(phase.index(), i);
        }
    }

    #[test]
    fn test_parse_round_trips_all_tags() {
        for phase in Phase::ALL {
            assert_eq!(Phase::parse(phase.as_str()), Some(phase));
        }
    }

    #[test]
    fn test_parse_rejects_unknown_tag() {
        assert_eq!(Phase::parse("unknownPhase"), None);
        assert_eq!(Phase::parse("SituationSelection"), None); // case-sensitive
        assert_eq!(Phase::parse(""), None);
    }

    #[test]
    fn test_serde_uses_wire_tags() {
        let json = serde_json::to_string(&Phase::CognitiveChange).unwrap();
        assert_eq!(json, r#""cognitiveChange""#);
        let back: Phase = serde_json::from_str(r#""responseModulation""#).unwrap();
        assert_eq!(back, Phase::ResponseModulation);
    }
}
