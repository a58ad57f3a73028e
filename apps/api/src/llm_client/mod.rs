/// LLM Client — the single point of entry for all completion-service calls.
///
/// ARCHITECTURAL RULE: No other module may call the Anthropic API directly.
/// All LLM interactions MUST go through this module.
///
/// One attempt per call — the caller decides whether to degrade. The batch
/// pipeline converts failures into placeholder error rows; the HTTP service
/// falls back to deterministic mock output.
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod prompts;

const ANTHROPIC_API_URL: &str = "https://api.anthropic.com/v1/messages";
const ANTHROPIC_VERSION: &str = "2023-06-01";
/// The model used for all LLM calls.
/// This is intentionally hardcoded to prevent accidental drift.
pub const MODEL: &str = "claude-3-opus-20240229";
const MAX_TOKENS: u32 = 4096;
const TEMPERATURE: f32 = 0.5;
/// The upstream defines no timeout; 60s keeps a stuck call from blocking the
/// batch loop indefinitely.
const REQUEST_TIMEOUT_SECS: u64 = 60;

#[derive(Debug, Error)]
pub enum CompletionError {
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("service error (status {status}): {message}")]
    Service { status: u16, message: String },

    #[error("malformed response envelope: {0}")]
    MalformedEnvelope(String),
}

#[derive(Debug, Serialize)]
struct AnthropicRequest<'a> {
    model: &'a str,
    max_tokens: u32,
    temperature: f32,
    messages: Vec<AnthropicMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct AnthropicMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct CompletionEnvelope {
    content: Vec<ContentBlock>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    block_type: String,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Usage {
    input_tokens: u32,
    output_tokens: u32,
}

#[derive(Debug, Deserialize)]
struct AnthropicError {
    error: AnthropicErrorBody,
}

#[derive(Debug, Deserialize)]
struct AnthropicErrorBody {
    message: String,
}

/// The seam between generation code and the concrete completion service.
/// The batch runner and the enricher accept `&dyn Completion` so tests can
/// script responses without a network.
#[async_trait]
pub trait Completion: Send + Sync {
    /// Sends one single-turn prompt and returns the raw text of the response.
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError>;
}

/// The single LLM client used by both binaries.
/// Wraps the Anthropic Messages API with a fixed model, temperature, and
/// output budget; exactly one attempt per call.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    api_key: String,
}

impl LlmClient {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(REQUEST_TIMEOUT_SECS))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
        }
    }
}

#[async_trait]
impl Completion for LlmClient {
    async fn complete(&self, prompt: &str) -> Result<String, CompletionError> {
        let request_body = AnthropicRequest {
            model: MODEL,
            max_tokens: MAX_TOKENS,
            temperature: TEMPERATURE,
            messages: vec![AnthropicMessage {
                role: "user",
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(ANTHROPIC_API_URL)
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", ANTHROPIC_VERSION)
            .header("content-type", "application/json")
            .json(&request_body)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            // Try to surface the service's own error message
            let message = serde_json::from_str::<AnthropicError>(&body)
                .map(|e| e.error.message)
                .unwrap_or(body);
            return Err(CompletionError::Service {
                status: status.as_u16(),
                message,
            });
        }

        let envelope: CompletionEnvelope = serde_json::from_str(&body)
            .map_err(|e| CompletionError::MalformedEnvelope(e.to_string()))?;

        if let Some(usage) = &envelope.usage {
            debug!(
                "completion call succeeded: input_tokens={}, output_tokens={}",
                usage.input_tokens, usage.output_tokens
            );
        }

        envelope
            .content
            .iter()
            .find(|b| b.block_type == "text")
            .and_then(|b| b.text.clone())
            .ok_or_else(|| {
                CompletionError::MalformedEnvelope("no text block in content".to_string())
            })
    }
}
