//! Axum route handlers for the Analysis API.

use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::generation::parser::parse_generation;
use crate::generation::prompts::truncate_chars;
use crate::scoring::{match_score_percent, score_blocking};
use crate::state::AppState;

/// Characters of each input echoed back by the debug route.
const DEBUG_PREVIEW_CHARS: usize = 100;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct AnalyzeRequest {
    pub resume_text: String,
    pub job_description: String,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub match_score: f64,
    pub tailored_resume: String,
    pub cover_letter: String,
}

#[derive(Debug, Serialize)]
pub struct DebugEchoResponse {
    pub resume_preview: String,
    pub job_description_preview: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /analyze
///
/// Scores résumé vs job description and generates tailored résumé + cover letter.
/// Scoring and generation run concurrently; either failing fails the request.
pub async fn handle_analyze(
    State(state): State<AppState>,
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let Json(request) = payload?;

    let scoring = async {
        score_blocking(
            state.embedder.clone(),
            request.resume_text.clone(),
            request.job_description.clone(),
        )
        .await
        .map_err(AppError::from)
    };
    let generation = async {
        state
            .generator
            .generate(&request.resume_text, &request.job_description)
            .await
            .map_err(AppError::from)
    };

    let (similarity, raw_output) = tokio::try_join!(scoring, generation)?;

    let match_score = match_score_percent(similarity);
    let parsed = parse_generation(&raw_output);
    info!(
        "Analysis complete: match_score={match_score}, resume={} chars, cover_letter={} chars",
        parsed.tailored_resume.chars().count(),
        parsed.cover_letter.chars().count()
    );

    Ok(Json(AnalyzeResponse {
        match_score,
        tailored_resume: parsed.tailored_resume,
        cover_letter: parsed.cover_letter,
    }))
}

/// POST /test
///
/// Debug echo of truncated inputs. Mounted only when `ENABLE_DEBUG_ROUTES` is set.
pub async fn handle_debug_echo(
    payload: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<DebugEchoResponse>, AppError> {
    let Json(request) = payload?;

    Ok(Json(DebugEchoResponse {
        resume_preview: truncate_chars(&request.resume_text, DEBUG_PREVIEW_CHARS).to_string(),
        job_description_preview: truncate_chars(&request.job_description, DEBUG_PREVIEW_CHARS)
            .to_string(),
    }))
}
