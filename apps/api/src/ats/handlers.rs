//! Axum route handlers for the ATS API.

use axum::extract::{multipart::MultipartRejection, Multipart, State};
use serde::Deserialize;
use tracing::{debug, info};

use crate::ats::checker::check_ats;
use crate::ats::keyword_gap::keyword_gap;
use crate::ats::models::{AtsCheckResult, KeywordGapResult, OptimizeResult};
use crate::ats::optimizer::optimize_resume;
use crate::auth::AuthedUser;
use crate::errors::AppError;
use crate::extraction::{file_type_of, ExtractedDocument};
use crate::response::{ApiJson, ApiResponse};
use crate::state::AppState;
use crate::validation::{min_chars, non_blank};

const MIN_TEXT_CHARS: usize = 50;
const UPLOAD_FIELD: &str = "file";

// ────────────────────────────────────────────────────────────────────────────
// Request types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AtsCheckRequest {
    pub resume_text: String,
    pub job_description: String,
    pub target_role: Option<String>,
    pub industry: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OptimizeRequest {
    pub resume_text: String,
    pub job_description: Option<String>,
    pub target_role: Option<String>,
    pub preferred_emirate: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct KeywordGapRequest {
    pub resume_text: String,
    pub job_description: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/ats/check
pub async fn handle_check(
    AuthedUser(user): AuthedUser,
    ApiJson(request): ApiJson<AtsCheckRequest>,
) -> Result<ApiResponse<AtsCheckResult>, AppError> {
    min_chars("resume_text", &request.resume_text, MIN_TEXT_CHARS)?;
    min_chars("job_description", &request.job_description, MIN_TEXT_CHARS)?;

    debug!(
        target_role = ?request.target_role,
        industry = ?request.industry,
        "ATS check requested"
    );
    let result = check_ats(&request.resume_text, &request.job_description);
    info!(
        user_id = user.user_id,
        score = result.overall_score,
        "ATS check complete"
    );
    Ok(ApiResponse::ok(result))
}

/// POST /api/v1/resume/optimize
pub async fn handle_optimize(
    AuthedUser(user): AuthedUser,
    ApiJson(request): ApiJson<OptimizeRequest>,
) -> Result<ApiResponse<OptimizeResult>, AppError> {
    min_chars("resume_text", &request.resume_text, MIN_TEXT_CHARS)?;

    let result = optimize_resume(
        &request.resume_text,
        non_blank(request.job_description.as_deref()),
        non_blank(request.target_role.as_deref()),
        non_blank(request.preferred_emirate.as_deref()),
    );
    info!(
        user_id = user.user_id,
        bullets = result.rewritten_bullets.len(),
        "Resume optimized"
    );
    Ok(ApiResponse::ok(result))
}

/// POST /api/v1/resume/keyword-gap
pub async fn handle_keyword_gap(
    AuthedUser(user): AuthedUser,
    ApiJson(request): ApiJson<KeywordGapRequest>,
) -> Result<ApiResponse<KeywordGapResult>, AppError> {
    min_chars("resume_text", &request.resume_text, MIN_TEXT_CHARS)?;
    min_chars("job_description", &request.job_description, MIN_TEXT_CHARS)?;

    let result = keyword_gap(&request.resume_text, &request.job_description);
    info!(
        user_id = user.user_id,
        coverage = result.coverage_percentage,
        "Keyword gap computed"
    );
    Ok(ApiResponse::ok(result))
}

/// POST /api/v1/resume/extract-text
///
/// Multipart upload with a single `file` field (PDF or DOCX). The file type is
/// checked before the body of the field is read.
pub async fn handle_extract_text(
    State(state): State<AppState>,
    AuthedUser(user): AuthedUser,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<ApiResponse<ExtractedDocument>, AppError> {
    let mut multipart = multipart?;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let file_name = field.file_name().unwrap_or_default().to_string();
        let file_type = file_type_of(&file_name)?;
        let bytes = field.bytes().await?;

        let document = state.extractor.extract(&file_name, bytes).await?;
        info!(
            user_id = user.user_id,
            file_type = %file_type,
            characters = document.character_count,
            "Extracted resume text"
        );
        return Ok(ApiResponse::ok(document));
    }

    Err(AppError::Validation(format!(
        "Multipart field '{UPLOAD_FIELD}' is required"
    )))
}
