//! Batch Orchestrator — runs every discovered document through
//! extract → prompt → inference → parse and collects one outcome per
//! document.
//!
//! Documents share nothing but the read-only `JobContext`, so they fan out
//! as independent tasks gated by a semaphore. Join handles are awaited in
//! discovery order, which keeps the outcome list ordered without any shared
//! mutable collection. A document failing at any stage yields a tagged
//! failure outcome for that document only; siblings are unaffected. The
//! batch is rejected up front (before any inference spend) only for
//! discovery-level faults.

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::anyhow;
use tokio::sync::Semaphore;
use tracing::{info, warn};

use crate::errors::AppError;
use crate::llm_client::prompts::{JSON_ONLY_SYSTEM, PLAIN_TEXT_SYSTEM};
use crate::llm_client::CompletionClient;
use crate::screening::discover::{discover, Discovery};
use crate::screening::document::{CandidateDocument, Upload};
use crate::screening::extract::extract_text;
use crate::screening::parser::parse_match_report;
use crate::screening::prompts::{build_match_prompt, SecondaryAnalysis};
use crate::screening::rank::rank;
use crate::screening::report::{
    AnalysisOutcome, BatchResult, JobContext, MatchReport, ScreeningFailure, Stage,
};

/// Per-request knobs. `analyses` holds the secondary analyses to run for
/// each successfully matched document (resolved by name in the handler).
#[derive(Debug, Default)]
pub struct ScreeningOptions {
    pub analyses: Vec<&'static SecondaryAnalysis>,
}

pub struct ScreeningPipeline {
    llm: Arc<dyn CompletionClient>,
    max_documents: usize,
    max_concurrency: usize,
}

impl ScreeningPipeline {
    pub fn new(llm: Arc<dyn CompletionClient>, max_documents: usize, max_concurrency: usize) -> Self {
        Self {
            llm,
            max_documents,
            max_concurrency: max_concurrency.max(1),
        }
    }

    /// Screens an upload set against a job. Returns the ranked batch, or an
    /// `AppError` if the batch could not be formed at all.
    pub async fn run(
        &self,
        uploads: Vec<Upload>,
        job: JobContext,
        options: ScreeningOptions,
    ) -> Result<BatchResult, AppError> {
        let Discovery {
            documents,
            rejected,
        } = discover(&uploads, self.max_documents)?;

        info!(
            "screening batch: {} documents, {} rejected uploads, {} secondary analyses",
            documents.len(),
            rejected.len(),
            options.analyses.len()
        );

        let job = Arc::new(job);
        let analyses = Arc::new(options.analyses);
        let semaphore = Arc::new(Semaphore::new(self.max_concurrency));

        let mut handles = Vec::with_capacity(documents.len());
        for document in documents {
            let permit = semaphore
                .clone()
                .acquire_owned()
                .await
                .map_err(|e| AppError::Internal(anyhow!("semaphore closed: {e}")))?;
            let llm = self.llm.clone();
            let job = job.clone();
            let analyses = analyses.clone();

            handles.push(tokio::spawn(async move {
                let _permit = permit;
                screen_document(llm, &job, &analyses, document).await
            }));
        }

        // Awaiting in spawn order keeps outcomes in discovery order.
        let mut outcomes = Vec::with_capacity(handles.len());
        for handle in handles {
            let outcome = handle
                .await
                .map_err(|e| AppError::Internal(anyhow!("screening task failed: {e}")))?;
            outcomes.push(outcome);
        }

        let mut result = rank(outcomes);
        result.failed.extend(rejected);

        info!(
            "screening batch done: {} ranked, {} failed",
            result.ranked.len(),
            result.failed.len()
        );

        Ok(result)
    }
}

/// Runs one document through the full per-document pipeline. Every exit is
/// an `AnalysisOutcome` — this function cannot fail the batch.
async fn screen_document(
    llm: Arc<dyn CompletionClient>,
    job: &JobContext,
    analyses: &[&'static SecondaryAnalysis],
    document: CandidateDocument,
) -> AnalysisOutcome {
    let file_name = document.name.clone();
    let fail = |stage: Stage, message: String| {
        warn!("'{file_name}' failed at {stage:?}: {message}");
        AnalysisOutcome::Failure(ScreeningFailure {
            file_name: file_name.clone(),
            stage,
            message,
        })
    };

    // PDF parsing is CPU-bound — run it off the async executor.
    let kind = document.kind;
    let bytes = document.bytes.clone();
    let extracted = match tokio::task::spawn_blocking(move || extract_text(&bytes, kind)).await {
        Ok(Ok(text)) => text,
        Ok(Err(e)) => return fail(Stage::Extraction, e.to_string()),
        Err(e) => return fail(Stage::Extraction, format!("extraction task failed: {e}")),
    };

    // A resume with no text gets no inference spend.
    if extracted.trim().is_empty() {
        return fail(Stage::Extraction, "no extractable text".to_string());
    }

    let prompt = build_match_prompt(&extracted, job);
    let raw = match llm.complete(&prompt, JSON_ONLY_SYSTEM).await {
        Ok(raw) => raw,
        Err(e) => return fail(Stage::Inference, e.to_string()),
    };

    let parsed = match parse_match_report(&raw) {
        Ok(parsed) => parsed,
        Err(e) => return fail(Stage::Parse, e.to_string()),
    };

    // Secondary analyses are informational: a failure degrades to a log
    // line and a missing entry, never to a failed document.
    let mut extras = BTreeMap::new();
    for analysis in analyses {
        match llm
            .complete(&analysis.render(&extracted, job), PLAIN_TEXT_SYSTEM)
            .await
        {
            Ok(answer) => {
                extras.insert(analysis.name.to_string(), answer);
            }
            Err(e) => {
                warn!("secondary analysis '{}' failed for '{}': {e}", analysis.name, document.name);
            }
        }
    }

    AnalysisOutcome::Success(MatchReport {
        file_name: document.name,
        jd_match: parsed.jd_match,
        missing_keywords: parsed.missing_keywords,
        profile_summary: parsed.profile_summary,
        extras,
    })
}
