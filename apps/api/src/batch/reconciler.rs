//! Batch Reconciler — attributes generated counterfactuals back to their
//! originating dataset rows.
//!
//! Composite-key convention (fixed, non-configurable): the first two
//! underscore-delimited segments of `journal_id` are the `userId`, the
//! remainder is the `journalId`. A `userId` with any other shape cannot be
//! recovered from the composite key; such ids are reported as mismatches
//! rather than mis-split.

use tracing::warn;

use crate::batch::dataset::OutputRow;
use crate::batch::BatchRecord;
use crate::phases::Phase;

/// Number of underscore-delimited segments a `userId` occupies in the
/// composite key.
pub const USER_ID_SEGMENTS: usize = 2;

/// Why one record was skipped. The first three variants are the
/// reconciliation-mismatch family: no unique dataset row could be identified.
#[derive(Debug, Clone, PartialEq)]
pub enum SkipReason {
    /// `journal_id` has too few segments to contain a two-segment `userId`
    /// plus a journal part.
    MalformedId { journal_id: String },
    NoMatch { journal_id: String },
    MultipleMatches { journal_id: String, count: usize },
    UnknownPhase { journal_id: String, phase: String },
    MissingOutputField { journal_id: String, stage: usize },
    /// Generation-failure placeholder rows carry no phase or text.
    Incomplete { journal_id: String },
}

impl SkipReason {
    fn is_mismatch(&self) -> bool {
        matches!(
            self,
            SkipReason::MalformedId { .. }
                | SkipReason::NoMatch { .. }
                | SkipReason::MultipleMatches { .. }
        )
    }
}

/// Observable outcome of a reconciliation pass.
#[derive(Debug, Default)]
pub struct ReconcileReport {
    pub appended: usize,
    pub skipped: Vec<SkipReason>,
}

impl ReconcileReport {
    pub fn skip_count(&self) -> usize {
        self.skipped.len()
    }

    pub fn mismatches(&self) -> usize {
        self.skipped.iter().filter(|s| s.is_mismatch()).count()
    }

    pub fn unknown_phases(&self) -> usize {
        self.skipped
            .iter()
            .filter(|s| matches!(s, SkipReason::UnknownPhase { .. }))
            .count()
    }
}

/// Splits a composite `journal_id` into `(userId, journalId)`.
///
/// Returns `None` when there are not enough segments for the fixed
/// convention; the caller reports a mismatch.
pub fn split_journal_id(journal_id: &str) -> Option<(String, String)> {
    let parts: Vec<&str> = journal_id.split('_').collect();
    if parts.len() <= USER_ID_SEGMENTS {
        return None;
    }
    Some((
        parts[..USER_ID_SEGMENTS].join("_"),
        parts[USER_ID_SEGMENTS..].join("_"),
    ))
}

/// Appends each record's counterfactual onto the stage list of its unique
/// matching row. Every failure is counted and reported; one bad record never
/// aborts reconciliation of the rest.
pub fn reconcile(rows: &mut [OutputRow], records: &[BatchRecord]) -> ReconcileReport {
    let mut report = ReconcileReport::default();

    for record in records {
        match reconcile_one(rows, record) {
            Ok(()) => report.appended += 1,
            Err(reason) => {
                warn!("skipping record: {reason:?}");
                report.skipped.push(reason);
            }
        }
    }

    report
}

fn reconcile_one(rows: &mut [OutputRow], record: &BatchRecord) -> Result<(), SkipReason> {
    let journal_id = record.journal_id.clone();

    let (Some(phase_tag), Some(counterfactual)) =
        (record.which_phase.as_deref(), record.counterfactual.as_deref())
    else {
        return Err(SkipReason::Incomplete { journal_id });
    };

    let Some((user_id, journal_part)) = split_journal_id(&record.journal_id) else {
        return Err(SkipReason::MalformedId { journal_id });
    };

    let matches: Vec<usize> = rows
        .iter()
        .enumerate()
        .filter(|(_, row)| row.user_id == user_id && row.journal_id == journal_part)
        .map(|(i, _)| i)
        .collect();

    let index = match matches.as_slice() {
        [] => return Err(SkipReason::NoMatch { journal_id }),
        [index] => *index,
        _ => {
            return Err(SkipReason::MultipleMatches {
                journal_id,
                count: matches.len(),
            })
        }
    };

    let Some(phase) = Phase::parse(phase_tag) else {
        return Err(SkipReason::UnknownPhase {
            journal_id,
            phase: phase_tag.to_string(),
        });
    };

    let Some(stage) = rows[index].stage_mut(phase.index()) else {
        return Err(SkipReason::MissingOutputField {
            journal_id,
            stage: phase.index(),
        });
    };

    stage.push(counterfactual.to_string());
    Ok(())
}
