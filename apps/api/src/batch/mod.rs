// Offline pipeline: dataset read → per-entry generation → reconciliation →
// CSV write. Strictly sequential; one completion call per journal entry.

use serde::Serialize;

pub mod dataset;
pub mod reconciler;
pub mod runner;

/// One row of the intermediate results table: a parsed counterfactual stamped
/// with its originating journal id, or a generation-failure placeholder
/// carrying `error` and no text.
#[derive(Debug, Clone, Serialize)]
pub struct BatchRecord {
    pub journal_id: String,
    pub which_phase: Option<String>,
    pub original_phase: Option<String>,
    pub counterfactual: Option<String>,
    pub error: Option<String>,
}
