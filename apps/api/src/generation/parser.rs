//! Response Parser — converts raw completion text into typed records.
//!
//! Two-stage parse: strict JSON first, then one narrowly-scoped
//! normalization pass (Python-style literals to JSON literals, outside
//! string contexts) followed by a second strict parse. Anything still
//! malformed is an `UnparsableOutput` error, never a best-effort guess.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::generation::GenerateError;

/// Output of generation for one `(journal_id, phase)` pair.
///
/// `journal_id` is whatever the model echoed back; the batch pipeline stamps
/// the authoritative id over it before reconciliation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CounterfactualRecord {
    pub journal_id: String,
    pub which_phase: String,
    pub original_phase: String,
    pub counterfactual: String,
}

/// Parse result: validated records plus the count of elements dropped for
/// missing or empty required fields.
#[derive(Debug)]
pub struct ParsedRecords {
    pub records: Vec<CounterfactualRecord>,
    pub dropped: usize,
}

/// Parses a JSON array of counterfactual objects from raw completion text.
///
/// Elements missing `which_phase`/`counterfactual`, or with an empty
/// `original_phase`, are dropped and counted — partial success is preferred
/// over all-or-nothing failure.
pub fn parse_records(raw: &str) -> Result<ParsedRecords, GenerateError> {
    let elements: Vec<Value> = parse_array(raw)?;

    let mut records = Vec::with_capacity(elements.len());
    let mut dropped = 0;
    for element in &elements {
        match record_from_value(element) {
            Some(record) => records.push(record),
            None => {
                warn!("dropping counterfactual element with missing fields: {element}");
                dropped += 1;
            }
        }
    }

    Ok(ParsedRecords { records, dropped })
}

/// Parses a flat JSON array of strings (context-enriched mode).
pub fn parse_string_array(raw: &str) -> Result<Vec<String>, GenerateError> {
    let elements: Vec<Value> = parse_array(raw)?;
    elements
        .into_iter()
        .map(|v| match v {
            Value::String(s) => Some(s),
            _ => None,
        })
        .collect::<Option<Vec<String>>>()
        .ok_or_else(|| GenerateError::UnparsableOutput("non-string array element".to_string()))
}

/// Strict parse, then literal-normalization fallback, then strict again.
fn parse_array(raw: &str) -> Result<Vec<Value>, GenerateError> {
    let text = strip_json_fences(raw);

    match serde_json::from_str(text) {
        Ok(values) => Ok(values),
        Err(strict_err) => {
            let normalized = normalize_literals(text);
            serde_json::from_str(&normalized)
                .map_err(|_| GenerateError::UnparsableOutput(strict_err.to_string()))
        }
    }
}

fn record_from_value(value: &Value) -> Option<CounterfactualRecord> {
    let which_phase = nonempty_str(value.get("which_phase")?)?;
    let original_phase = nonempty_str(value.get("original_phase")?)?;
    let counterfactual = nonempty_str(value.get("counterfactual")?)?;

    // The model sometimes emits journal_id as a number; the batch pipeline
    // overwrites it either way.
    let journal_id = match value.get("journal_id") {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => String::new(),
    };

    Some(CounterfactualRecord {
        journal_id,
        which_phase,
        original_phase,
        counterfactual,
    })
}

fn nonempty_str(value: &Value) -> Option<String> {
    let s = value.as_str()?.trim();
    if s.is_empty() {
        None
    } else {
        Some(s.to_string())
    }
}

/// Strips ```json ... ``` or ``` ... ``` code fences from completion output.
fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

/// Rewrites the Python-style literals `True`/`False`/`None` to their JSON
/// equivalents, skipping anything inside double-quoted strings. Some
/// completions mix JSON with source-language literal conventions; this is the
/// full extent of the tolerated deviation.
fn normalize_literals(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    let mut in_string = false;
    let mut escaped = false;

    while let Some(c) = chars.next() {
        if in_string {
            out.push(c);
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
            continue;
        }

        if c == '"' {
            in_string = true;
            out.push(c);
            continue;
        }

        if c.is_ascii_alphabetic() || c == '_' {
            let mut word = String::new();
            word.push(c);
            while let Some(&next) = chars.peek() {
                if next.is_ascii_alphanumeric() || next == '_' {
                    word.push(next);
                    chars.next();
                } else {
                    break;
                }
            }
            match word.as_str() {
                "True" => out.push_str("true"),
                "False" => out.push_str("false"),
                "None" => out.push_str("null"),
                _ => out.push_str(&word),
            }
            continue;
        }

        out.push(c);
    }

    out
}
