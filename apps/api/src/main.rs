use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use counterfactual_api::config::Config;
use counterfactual_api::llm_client::{LlmClient, MODEL};
use counterfactual_api::routes::build_router;
use counterfactual_api::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "{}={}",
                env!("CARGO_PKG_NAME").replace('-', "_"),
                &config.rust_log
            ))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!(
        "Starting counterfactual API v{}",
        env!("CARGO_PKG_VERSION")
    );

    // Initialize LLM client; without credentials the service degrades to
    // deterministic mock responses rather than failing.
    let llm = match config.anthropic_api_key.clone() {
        Some(api_key) => {
            info!("LLM client initialized (model: {MODEL})");
            Some(LlmClient::new(api_key))
        }
        None => {
            warn!("no ANTHROPIC_API_KEY configured — serving deterministic mock responses");
            None
        }
    };

    let state = AppState {
        llm,
        config: config.clone(),
    };

    // Browser clients call this from any origin in the reference deployment.
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
