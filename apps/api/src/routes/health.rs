use axum::{extract::State, Json};
use serde_json::{json, Value};

use crate::state::AppState;

/// GET /
/// Basic liveness.
pub async fn root_handler() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "message": "Counterfactual API is running"
    }))
}

/// GET /health
/// Detailed health check: reports whether completion-service credentials are
/// configured (without them the service answers with mock output).
pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "api_version": env!("CARGO_PKG_VERSION"),
        "anthropic_api_key_configured": state.llm.is_some()
    }))
}
