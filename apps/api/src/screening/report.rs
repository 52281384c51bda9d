//! Outcome data model for one screening batch.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// The job a batch of resumes is screened against. Immutable per run;
/// read only by the prompt builder.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JobContext {
    pub description: String,
    pub primary_skills: Vec<String>,
    pub secondary_skills: Vec<String>,
}

/// A successfully screened resume.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchReport {
    pub file_name: String,
    /// Match percentage against the job description. Always finite and
    /// within [0, 100]; out-of-range model output is a parse failure,
    /// never clamped.
    pub jd_match: f64,
    pub missing_keywords: Vec<String>,
    pub profile_summary: String,
    /// Optional secondary analyses, keyed by analysis name.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub extras: BTreeMap<String, String>,
}

/// The pipeline stage at which a document failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Stage {
    Extraction,
    Inference,
    Parse,
}

/// A document that could not be screened, tagged with the stage that
/// rejected it. Every failed document is reported by name; a resume
/// silently vanishing from the results is a defect.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScreeningFailure {
    pub file_name: String,
    pub stage: Stage,
    pub message: String,
}

/// Exactly one outcome exists per candidate document accepted into a batch.
#[derive(Debug, Clone)]
pub enum AnalysisOutcome {
    Success(MatchReport),
    Failure(ScreeningFailure),
}

/// Final result of a batch run, handed to the presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResult {
    /// Successes in descending `jd_match` order; ties keep discovery order.
    pub ranked: Vec<MatchReport>,
    /// Failures in discovery order.
    pub failed: Vec<ScreeningFailure>,
}
