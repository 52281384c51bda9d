//! Ranker — turns the per-document outcomes of a batch into the final
//! `BatchResult`.

use crate::screening::report::{AnalysisOutcome, BatchResult};

/// Partitions outcomes and orders the successes by match percentage,
/// descending. The sort is stable, so ties keep discovery order; failures
/// keep discovery order untouched. Deterministic, total, idempotent.
pub fn rank(outcomes: Vec<AnalysisOutcome>) -> BatchResult {
    let mut ranked = Vec::new();
    let mut failed = Vec::new();

    for outcome in outcomes {
        match outcome {
            AnalysisOutcome::Success(report) => ranked.push(report),
            AnalysisOutcome::Failure(failure) => failed.push(failure),
        }
    }

    // jd_match is validated finite at parse time, so total_cmp agrees with
    // the intuitive numeric order here.
    ranked.sort_by(|a, b| b.jd_match.total_cmp(&a.jd_match));

    BatchResult { ranked, failed }
}
