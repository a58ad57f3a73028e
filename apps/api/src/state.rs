use crate::config::Config;
use crate::llm_client::LlmClient;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// `None` when no ANTHROPIC_API_KEY is configured — handlers then serve
    /// deterministic mock counterfactuals instead of calling the service.
    pub llm: Option<LlmClient>,
    pub config: Config,
}
