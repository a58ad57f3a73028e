// Cross-cutting prompt fragments shared by the generation templates.
// Each module that needs LLM calls defines its own prompts.rs alongside it.

/// Output-format contract appended to every generation prompt.
/// Both templates request a bare JSON array, so parsing stays uniform.
pub const JSON_ARRAY_ONLY: &str = "\
Output only the JSON array.
Do not include explanation, markdown, or extra commentary.
All fields must be filled: no empty strings or missing keys.
Use double quotes for all strings and keys.";
