use axum::{extract::Multipart, extract::State, Json};
use bytes::Bytes;

use crate::errors::AppError;
use crate::screening::document::Upload;
use crate::screening::orchestrator::ScreeningOptions;
use crate::screening::prompts::secondary_analysis;
use crate::screening::report::{BatchResult, JobContext};
use crate::state::AppState;

/// POST /api/v1/screenings
///
/// Multipart form: `job_description` (required), `primary_skills` /
/// `secondary_skills` / `analyses` (optional comma-separated lists), and
/// repeated `resume_files` file parts (.pdf, .txt, or .zip).
pub async fn handle_screen(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<BatchResult>, AppError> {
    let mut job_description: Option<String> = None;
    let mut primary_skills = Vec::new();
    let mut secondary_skills = Vec::new();
    let mut analysis_names = Vec::new();
    let mut uploads = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("malformed multipart request: {e}")))?
    {
        let field_name = field.name().map(str::to_owned);
        match field_name.as_deref() {
            Some("job_description") => {
                job_description = Some(read_text(field).await?);
            }
            Some("primary_skills") => {
                primary_skills = split_list(&read_text(field).await?);
            }
            Some("secondary_skills") => {
                secondary_skills = split_list(&read_text(field).await?);
            }
            Some("analyses") => {
                analysis_names = split_list(&read_text(field).await?);
            }
            Some("resume_files") => {
                let name = field
                    .file_name()
                    .map(str::to_owned)
                    .unwrap_or_else(|| "unnamed".to_string());
                let bytes: Bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("failed to read '{name}': {e}")))?;
                uploads.push(Upload { name, bytes });
            }
            _ => {} // unknown fields are ignored
        }
    }

    let job_description = job_description
        .filter(|d| !d.trim().is_empty())
        .ok_or_else(|| AppError::Validation("job_description is required".to_string()))?;

    // Reject unknown analysis names up front rather than silently skipping
    // them. A missing analysis the caller asked for is data loss.
    let mut analyses = Vec::with_capacity(analysis_names.len());
    for name in &analysis_names {
        let analysis = secondary_analysis(name)
            .ok_or_else(|| AppError::Validation(format!("unknown analysis '{name}'")))?;
        analyses.push(analysis);
    }

    let job = JobContext {
        description: job_description,
        primary_skills,
        secondary_skills,
    };

    let result = state
        .pipeline
        .run(uploads, job, ScreeningOptions { analyses })
        .await?;

    Ok(Json(result))
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::Validation(format!("malformed multipart field: {e}")))
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
