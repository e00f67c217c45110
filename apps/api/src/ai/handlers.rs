//! Axum route handlers for the AI pipeline.
//!
//! The two rewrite flows (optimize, import) are guarded against the in-flight
//! race: the request stamps the project revision it was built against, and if
//! edits advanced it while the model call was running the overwrite becomes a
//! 409 instead of clobbering those edits. Every completed audit appends to
//! the project's score history.

use axum::{extract::State, Json};
use base64::Engine;
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

use crate::ai::actions::{self, ExtractSource, ScanSource};
use crate::ai::{KeywordAnalysis, ReviewResult};
use crate::errors::AppError;
use crate::llm_client::Attachment;
use crate::models::project::{ResumeProject, ScoreRecord};
use crate::models::resume::ResumeData;
use crate::project::handlers::load_project;
use crate::project::versioning::{push_version, record_score, touch};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeRequest {
    pub project_id: Uuid,
    pub jd_text: String,
    /// Revision the client's working copy forked from. Defaults to the
    /// stored revision at the time the model call starts.
    #[serde(default)]
    pub base_revision: Option<u64>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OptimizeResponse {
    pub project: ResumeProject,
    /// Chained keyword analysis of the rewrite against the same JD. Absent
    /// when the follow-up call failed — the optimize itself still stands.
    pub analysis: Option<KeywordAnalysis>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryRequest {
    pub resume: ResumeData,
    #[serde(default)]
    pub jd_text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub summary: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefineRequest {
    pub text: String,
    /// One line of "what this item is", e.g. "Senior Engineer at Acme".
    #[serde(default)]
    pub context: String,
    #[serde(default)]
    pub jd_text: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct RefineResponse {
    pub text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    pub resume: ResumeData,
    pub jd_text: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewRequest {
    pub project_id: Uuid,
    /// Working copy override; the stored document is audited when absent.
    #[serde(default)]
    pub resume: Option<ResumeData>,
    #[serde(default)]
    pub jd_text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviewResponse {
    pub review: ReviewResult,
    /// Full history including the record this audit just appended, for
    /// delta-vs-previous display.
    pub score_history: Vec<ScoreRecord>,
}

/// Exactly one source must be present: pasted text or an inline document.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ScanRequest {
    pub text: Option<String>,
    pub pdf_base64: Option<String>,
    pub mime_type: Option<String>,
}

/// Exactly one source must be present: pasted text, an inline document, or
/// a public profile URL.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ImportRequest {
    pub project_id: Uuid,
    pub text: Option<String>,
    pub pdf_base64: Option<String>,
    pub mime_type: Option<String>,
    pub url: Option<String>,
    pub base_revision: Option<u64>,
}

impl ScanRequest {
    fn into_source(self) -> Result<ScanSource, AppError> {
        match (self.text, self.pdf_base64) {
            (Some(text), None) if !text.trim().is_empty() => Ok(ScanSource::RawText(text)),
            (None, Some(encoded)) => Ok(ScanSource::Pdf(decode_attachment(
                &encoded,
                self.mime_type.as_deref(),
            )?)),
            _ => Err(AppError::Validation(
                "provide exactly one of text or pdfBase64".to_string(),
            )),
        }
    }
}

impl ImportRequest {
    fn into_source(self) -> Result<ExtractSource, AppError> {
        match (self.text, self.pdf_base64, self.url) {
            (Some(text), None, None) if !text.trim().is_empty() => {
                Ok(ExtractSource::RawText(text))
            }
            (None, Some(encoded), None) => Ok(ExtractSource::Pdf(decode_attachment(
                &encoded,
                self.mime_type.as_deref(),
            )?)),
            (None, None, Some(url)) if !url.trim().is_empty() => {
                Ok(ExtractSource::ProfileUrl(url))
            }
            _ => Err(AppError::Validation(
                "provide exactly one of text, pdfBase64, or url".to_string(),
            )),
        }
    }
}

fn decode_attachment(encoded: &str, mime_type: Option<&str>) -> Result<Attachment, AppError> {
    let data = base64::engine::general_purpose::STANDARD
        .decode(encoded.trim())
        .map_err(|_| AppError::Validation("pdfBase64 is not valid base64".to_string()))?;
    Ok(Attachment {
        mime_type: mime_type.unwrap_or("application/pdf").to_string(),
        data,
    })
}

/// The overwrite conflict guard. `base_revision` was stamped when the model
/// call started; a stored revision that moved on since means the user edited
/// mid-flight and a blind overwrite would discard those edits.
fn ensure_not_stale(project: &ResumeProject, base_revision: u64) -> Result<(), AppError> {
    if project.revision != base_revision {
        return Err(AppError::Conflict(
            "the resume was edited while the AI request was in flight".to_string(),
        ));
    }
    Ok(())
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/ai/optimize
///
/// Full-rewrite flow: rewrite against the JD, overwrite the document under
/// the conflict guard, push a version snapshot, save, then chain a keyword
/// analysis of the result.
pub async fn handle_optimize(
    State(state): State<AppState>,
    Json(request): Json<OptimizeRequest>,
) -> Result<Json<OptimizeResponse>, AppError> {
    if request.jd_text.trim().is_empty() {
        return Err(AppError::Validation("jdText cannot be empty".to_string()));
    }

    let project = load_project(state.store.as_ref(), request.project_id).await?;
    let base_revision = request.base_revision.unwrap_or(project.revision);

    let optimized = actions::optimize_resume(&state.llm, &project.data, &request.jd_text).await?;

    // Re-read: the model call is slow and edits may have landed since.
    let mut project = load_project(state.store.as_ref(), request.project_id).await?;
    ensure_not_stale(&project, base_revision)?;

    project.data = optimized;
    push_version(&mut project, Some("AI Optimize".to_string()));
    touch(&mut project);
    state.store.upsert_project(&project).await?;

    let analysis = match actions::analyze_keywords(&state.llm, &project.data, &request.jd_text)
        .await
    {
        Ok(analysis) => Some(analysis),
        Err(e) => {
            // The rewrite is already saved; the follow-up score is a bonus.
            warn!("chained keyword analysis failed after optimize: {e}");
            None
        }
    };

    Ok(Json(OptimizeResponse { project, analysis }))
}

/// POST /api/v1/ai/summary
pub async fn handle_summary(
    State(state): State<AppState>,
    Json(request): Json<SummaryRequest>,
) -> Result<Json<SummaryResponse>, AppError> {
    let summary =
        actions::generate_summary(&state.llm, &request.resume, request.jd_text.as_deref())
            .await?;
    Ok(Json(SummaryResponse { summary }))
}

/// POST /api/v1/ai/refine
pub async fn handle_refine(
    State(state): State<AppState>,
    Json(request): Json<RefineRequest>,
) -> Result<Json<RefineResponse>, AppError> {
    if request.text.trim().is_empty() {
        return Err(AppError::Validation("text cannot be empty".to_string()));
    }

    let text = actions::refine_description(
        &state.llm,
        &request.text,
        &request.context,
        request.jd_text.as_deref(),
    )
    .await?;
    Ok(Json(RefineResponse { text }))
}

/// POST /api/v1/ai/analyze
pub async fn handle_analyze(
    State(state): State<AppState>,
    Json(request): Json<AnalyzeRequest>,
) -> Result<Json<KeywordAnalysis>, AppError> {
    if request.jd_text.trim().is_empty() {
        return Err(AppError::Validation("jdText cannot be empty".to_string()));
    }

    let analysis =
        actions::analyze_keywords(&state.llm, &request.resume, &request.jd_text).await?;
    Ok(Json(analysis))
}

/// POST /api/v1/ai/review
///
/// Audits the project (or a supplied working copy) and appends the score to
/// the project's history.
pub async fn handle_review(
    State(state): State<AppState>,
    Json(request): Json<ReviewRequest>,
) -> Result<Json<ReviewResponse>, AppError> {
    let mut project = load_project(state.store.as_ref(), request.project_id).await?;
    let data = request.resume.as_ref().unwrap_or(&project.data);

    let review = actions::review_resume(&state.llm, data, request.jd_text.as_deref()).await?;

    record_score(&mut project, review.score);
    touch(&mut project);
    state.store.upsert_project(&project).await?;

    Ok(Json(ReviewResponse {
        score_history: project.score_history,
        review,
    }))
}

/// POST /api/v1/ai/scan
///
/// Standalone document audit — not tied to any project, nothing persisted.
pub async fn handle_scan(
    State(state): State<AppState>,
    Json(request): Json<ScanRequest>,
) -> Result<Json<ReviewResult>, AppError> {
    let source = request.into_source()?;
    let review = actions::scan_document(&state.llm, &source).await?;
    Ok(Json(review))
}

/// POST /api/v1/ai/import
///
/// Extracts a structured resume from the source and overwrites the project
/// document under the conflict guard, with a version snapshot.
pub async fn handle_import(
    State(state): State<AppState>,
    Json(request): Json<ImportRequest>,
) -> Result<Json<ResumeProject>, AppError> {
    let project_id = request.project_id;
    let requested_revision = request.base_revision;
    let source = request.into_source()?;

    let project = load_project(state.store.as_ref(), project_id).await?;
    let base_revision = requested_revision.unwrap_or(project.revision);

    let extracted = actions::extract_from_source(&state.llm, &source).await?;

    let mut project = load_project(state.store.as_ref(), project_id).await?;
    ensure_not_stale(&project, base_revision)?;

    project.data = extracted;
    push_version(&mut project, Some("AI Import".to_string()));
    touch(&mut project);
    state.store.upsert_project(&project).await?;

    Ok(Json(project))
}
