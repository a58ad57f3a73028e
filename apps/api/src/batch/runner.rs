//! Batch runner — the sequential offline pipeline.
//!
//! One completion call per journal entry, strictly in order; every per-entry
//! failure becomes a placeholder error record and the run continues.

use indicatif::ProgressBar;
use tracing::{debug, error, warn};

use crate::batch::dataset::{InputRecord, OutputRow};
use crate::batch::reconciler::{reconcile, ReconcileReport};
use crate::batch::BatchRecord;
use crate::generation::parser::{parse_records, ParsedRecords};
use crate::generation::prompt_builder::build_phase_prompt;
use crate::generation::GenerateError;
use crate::llm_client::Completion;

#[derive(Debug, Clone)]
pub struct BatchOptions {
    /// Process every Nth journal entry (token-saving knob; 1 = all).
    pub stride: usize,
}

impl Default for BatchOptions {
    fn default() -> Self {
        BatchOptions { stride: 1 }
    }
}

/// Counters for one batch run, including the reconciliation report.
#[derive(Debug)]
pub struct BatchSummary {
    pub entries_processed: usize,
    pub entries_skipped_empty: usize,
    pub records_generated: usize,
    pub generation_failures: usize,
    pub elements_dropped: usize,
    pub report: ReconcileReport,
}

/// Runs generation over the dataset and reconciles the results.
///
/// Returns the updated output rows (one per input record, stage lists
/// populated) and the run summary.
pub async fn run_batch(
    completion: &dyn Completion,
    input: &[InputRecord],
    options: &BatchOptions,
) -> (Vec<OutputRow>, BatchSummary) {
    let stride = options.stride.max(1);
    let mut rows: Vec<OutputRow> = input.iter().map(OutputRow::from_input).collect();

    let mut results: Vec<BatchRecord> = Vec::new();
    let mut entries_processed = 0;
    let mut entries_skipped_empty = 0;
    let mut generation_failures = 0;
    let mut elements_dropped = 0;

    let progress = ProgressBar::new(input.len().div_ceil(stride) as u64);

    for index in (0..rows.len()).step_by(stride) {
        let journal_id = rows[index].composite_id();

        let Ok(prompt) = build_phase_prompt(rows[index].texts()) else {
            debug!("skipping journal_id={journal_id}: no usable phase text");
            entries_skipped_empty += 1;
            progress.inc(1);
            continue;
        };

        entries_processed += 1;

        match generate_entry(completion, &prompt).await {
            Ok(parsed) => {
                if parsed.dropped > 0 {
                    warn!(
                        "journal_id={journal_id}: {} elements dropped during parsing",
                        parsed.dropped
                    );
                    elements_dropped += parsed.dropped;
                }
                for record in parsed.records {
                    // Stamp the authoritative id over whatever the model echoed
                    results.push(BatchRecord {
                        journal_id: journal_id.clone(),
                        which_phase: Some(record.which_phase),
                        original_phase: Some(record.original_phase),
                        counterfactual: Some(record.counterfactual),
                        error: None,
                    });
                }
            }
            Err(e) => {
                error!("generation failed for journal_id={journal_id}: {e}");
                generation_failures += 1;
                results.push(BatchRecord {
                    journal_id,
                    which_phase: None,
                    original_phase: None,
                    counterfactual: None,
                    error: Some(e.to_string()),
                });
            }
        }

        progress.inc(1);
    }

    progress.finish_and_clear();

    let records_generated = results.iter().filter(|r| r.error.is_none()).count();
    let report = reconcile(&mut rows, &results);

    (
        rows,
        BatchSummary {
            entries_processed,
            entries_skipped_empty,
            records_generated,
            generation_failures,
            elements_dropped,
            report,
        },
    )
}

async fn generate_entry(
    completion: &dyn Completion,
    prompt: &str,
) -> Result<ParsedRecords, GenerateError> {
    let raw = completion.complete(prompt).await?;
    parse_records(&raw)
}
