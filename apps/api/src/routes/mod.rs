pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::generation::handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::health_handler))
        .route("/counterfactual", post(handlers::handle_counterfactual))
        .route("/debug-input", post(handlers::handle_debug_input))
        .with_state(state)
}
