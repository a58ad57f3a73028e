// Counterfactual generation pipeline.
// Implements: prompt building, response parsing, context enrichment, and the
// deterministic mock fallback. All LLM calls go through llm_client.

use thiserror::Error;

use crate::llm_client::CompletionError;

pub mod enricher;
pub mod generator;
pub mod handlers;
pub mod mock;
pub mod parser;
pub mod prompt_builder;
pub mod prompts;

/// Failures of one generation attempt, from prompt building through parsing.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// Every phase text was empty — nothing to prompt with.
    #[error("no usable input: all five phase texts are empty")]
    NoUsableInput,

    #[error(transparent)]
    Completion(#[from] CompletionError),

    /// The completion text survived neither the strict parse nor the
    /// literal-normalization fallback.
    #[error("unparsable completion output: {0}")]
    UnparsableOutput(String),
}
