//! Axum route handlers for the resume analysis API.

use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;

use crate::analysis::{analyze_resume, ats_feedback_for, summary_for, AnalysisResult};
use crate::errors::AppError;
use crate::extraction::{extract_text, ResumeDocument};
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct AtsResponse {
    pub ats_feedback: String,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub summary: String,
}

/// POST /api/v1/resumes/analyze
///
/// Accepts one multipart `file` field and returns the full analysis bundle.
/// Extraction failure is reported inside the body (`success: false`), not
/// as an HTTP fault.
pub async fn handle_analyze(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AnalysisResult>, AppError> {
    let document = read_document(multipart).await?;
    let result = analyze_resume(&document, &state.tasks, state.keywords.as_deref()).await;
    Ok(Json(result))
}

/// POST /api/v1/resumes/ats
///
/// Standalone ATS compatibility check for one uploaded resume.
pub async fn handle_ats(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<AtsResponse>, AppError> {
    let document = read_document(multipart).await?;
    let resume_text = extract_text(&document).map_err(|e| AppError::Validation(e.to_string()))?;
    let ats_feedback = ats_feedback_for(&state.tasks, &resume_text).await;
    Ok(Json(AtsResponse { ats_feedback }))
}

/// POST /api/v1/resumes/summary
///
/// Standalone professional summary for one uploaded resume.
pub async fn handle_summary(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<Json<SummaryResponse>, AppError> {
    let document = read_document(multipart).await?;
    let resume_text = extract_text(&document).map_err(|e| AppError::Validation(e.to_string()))?;
    let summary = summary_for(&state.tasks, &resume_text).await;
    Ok(Json(SummaryResponse { summary }))
}

/// Pulls the single `file` field out of a multipart upload.
async fn read_document(mut multipart: Multipart) -> Result<ResumeDocument, AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("invalid multipart payload: {e}")))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let content_type = field.content_type().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::Validation(format!("failed to read upload: {e}")))?;
        if bytes.is_empty() {
            return Err(AppError::Validation("uploaded file is empty".to_string()));
        }
        return Ok(ResumeDocument {
            bytes,
            content_type,
        });
    }
    Err(AppError::Validation(
        "missing multipart field 'file'".to_string(),
    ))
}
