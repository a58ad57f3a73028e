// All LLM prompt constants for the generation module.
// Reuses the cross-cutting output contract from llm_client::prompts.

/// Five-phase counterfactual template. The prompt builder appends the
/// "Input for the five phases:" block; `{output_contract}` is replaced with
/// `llm_client::prompts::JSON_ARRAY_ONLY`.
pub const PHASE_PROMPT_TEMPLATE: &str = r#"Given the definitions of each phase:
0. Situation Selection: Choosing to approach or avoid situations to regulate emotions.
1. Situation Modification: Changing the environment to reduce emotional impact.
2. Attentional Deployment: Redirecting focus to influence emotions.
3. Cognitive Change: Reframing the interpretation of a situation.
4. Response Modulation: Changing how emotions are expressed (e.g., hiding, relaxing).

Your task: for each phase present in the input, generate 5 counterfactuals by
modifying only that one phase while keeping the other four phases unchanged.
Only generate adaptive counterfactuals.

Your output must follow this structure (a JSON array of objects, 5 objects per
phase present in the input, in phase order):

[
  {
    "journal_id": 1,
    "which_phase": "situationSelection",
    "original_phase": "Staying at home is stressful and increases my anxiety.",
    "counterfactual": "I chose to attend a support group instead of staying home alone."
  }
]

Requirements:
- "which_phase" must be one of: situationSelection, situationModification,
  attentionalDeployment, cognitiveChange, responseModulation.
- "original_phase" must not be empty and must echo the input sentence for that phase.
{output_contract}"#;

/// Context-enriched template for the online service. Placeholders:
/// {ideal_week}, {obstacles}, {prevent_actions}, {action_details},
/// {if_then_plans}, {question_block}, {selected_question},
/// {selected_response}, {output_contract}.
pub const CONTEXTUAL_PROMPT_TEMPLATE: &str = r#"You are an expert in cognitive behavioral therapy and emotion regulation.

CONTEXT:
User's weekly goals:
- Ideal week: {ideal_week}
- Obstacles they face: {obstacles}
- Prevention actions: {prevent_actions}
- Action details: {action_details}
- If-then plans: {if_then_plans}

CURRENT EMOTION REGULATION SESSION:
All responses from this session:
{question_block}

FOCUSED QUESTION (generate counterfactuals for this one):
Question: {selected_question}
User's response: {selected_response}

TASK:
Generate exactly 5 alternative responses (counterfactuals) for the focused question that:
1. Are realistic and actionable alternatives the user could have taken
2. Align with their weekly goals and if-then plans
3. Address the obstacles they identified
4. Follow the 5 emotion regulation strategies:
   - Situation Selection (choosing different situations)
   - Situation Modification (changing the environment)
   - Attentional Deployment (focusing attention differently)
   - Cognitive Change (reframing thoughts)
   - Response Modulation (managing emotional responses)

Return exactly 5 counterfactuals as a JSON array of strings:
["counterfactual 1", "counterfactual 2", "counterfactual 3", "counterfactual 4", "counterfactual 5"]
{output_contract}"#;
