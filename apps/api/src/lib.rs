//! Counterfactual generation service.
//!
//! Two entry points share this library: the `api` binary (axum HTTP service
//! for single-entry generation) and the `batch` binary (offline pipeline that
//! reads a journal dataset, generates counterfactuals per entry, and
//! reconciles them back onto the originating rows).

pub mod batch;
pub mod config;
pub mod errors;
pub mod generation;
pub mod llm_client;
pub mod models;
pub mod phases;
pub mod routes;
pub mod state;
