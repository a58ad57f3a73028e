//! Prompt Builder — turns up to five phase texts into one completion prompt.

use crate::generation::prompts::PHASE_PROMPT_TEMPLATE;
use crate::generation::GenerateError;
use crate::llm_client::prompts::JSON_ARRAY_ONLY;
use crate::phases::Phase;

/// Formats the non-empty phase texts as `"<phaseName>: <text>"` lines in
/// fixed phase order. Empty or whitespace-only texts are skipped.
pub fn phase_lines(texts: &[Option<String>; 5]) -> Vec<String> {
    Phase::ALL
        .iter()
        .zip(texts.iter())
        .filter_map(|(phase, text)| {
            let text = text.as_deref()?.trim();
            if text.is_empty() {
                None
            } else {
                Some(format!("{}: {}", phase.as_str(), text))
            }
        })
        .collect()
}

/// Builds the full five-phase prompt for one journal entry.
///
/// Fails fast with `NoUsableInput` when every phase text is empty so the
/// caller never spends a completion call on an empty entry.
pub fn build_phase_prompt(texts: &[Option<String>; 5]) -> Result<String, GenerateError> {
    let lines = phase_lines(texts);
    if lines.is_empty() {
        return Err(GenerateError::NoUsableInput);
    }

    Ok(format!(
        "{}\n\nInput for the five phases:\n{}",
        PHASE_PROMPT_TEMPLATE.replace("{output_contract}", JSON_ARRAY_ONLY),
        lines.join("\n")
    ))
}

/// Splits the online request's `text` body into the five phase slots.
///
/// The body is newline-separated, one phase per line in fixed phase order;
/// blank lines become empty slots and lines past the fifth are ignored.
pub fn split_phase_text(text: &str) -> [Option<String>; 5] {
    let mut slots: [Option<String>; 5] = Default::default();
    for (slot, line) in slots.iter_mut().zip(text.lines()) {
        let line = line.trim();
        if !line.is_empty() {
            *slot = Some(line.to_string());
        }
    }
    slots
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(items: [&str; 5]) -> [Option<String>; 5] {
        items.map(|s| {
            if s.is_empty() {
                None
            } else {
                Some(s.to_string())
            }
        })
    }

    #[test]
    fn test_one_line_per_nonempty_phase_in_fixed_order() {
        let input = texts([
            "stayed home",
            "",
            "watched my breath",
            "",
            "took deep breaths",
        ]);
        let lines = phase_lines(&input);
        assert_eq!(
            lines,
            vec![
                "situationSelection: stayed home",
                "attentionalDeployment: watched my breath",
                "responseModulation: took deep breaths",
            ]
        );
    }

    #[test]
    fn test_whitespace_only_text_is_skipped() {
        let mut input = texts(["a", "", "", "", ""]);
        input[1] = Some("   ".to_string());
        assert_eq!(phase_lines(&input).len(), 1);
    }

    #[test]
    fn test_prompt_contains_input_block_and_contract() {
        let input = texts(["went for a walk", "", "", "", ""]);
        let prompt = build_phase_prompt(&input).unwrap();
        assert!(prompt.contains("Input for the five phases:\nsituationSelection: went for a walk"));
        assert!(prompt.contains("Output only the JSON array."));
        assert!(!prompt.contains("{output_contract}"));
    }

    #[test]
    fn test_all_empty_is_no_usable_input() {
        let input = texts(["", "", "", "", ""]);
        assert!(matches!(
            build_phase_prompt(&input),
            Err(GenerateError::NoUsableInput)
        ));
    }

    #[test]
    fn test_split_phase_text_pads_and_truncates() {
        let slots = split_phase_text("a\n\nc\nd\ne\nignored sixth line");
        assert_eq!(slots[0].as_deref(), Some("a"));
        assert_eq!(slots[1], None);
        assert_eq!(slots[2].as_deref(), Some("c"));
        assert_eq!(slots[4].as_deref(), Some("e"));
    }

    #[test]
    fn test_split_phase_text_trims_lines() {
        let slots = split_phase_text("  padded  \nplain");
        assert_eq!(slots[0].as_deref(), Some("padded"));
        assert_eq!(slots[1].as_deref(), Some("plain"));
    }
}
