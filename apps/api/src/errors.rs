use axum::{
    extract::{multipart::MultipartRejection, rejection::JsonRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::extraction::ExtractionError;
use crate::generation::client::GenerationError;
use crate::scoring::ScoringError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
/// Every variant renders as `{"detail": "..."}`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("No text could be extracted from the PDF.")]
    NoExtractableText,

    #[error("Error processing PDF: {0}")]
    Extraction(String),

    #[error("Error computing match score: {0}")]
    Scoring(#[from] ScoringError),

    #[error("Error generating content: {0}")]
    Generation(#[from] GenerationError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<ExtractionError> for AppError {
    fn from(err: ExtractionError) -> Self {
        match err {
            ExtractionError::EmptyContent => AppError::NoExtractableText,
            other => AppError::Extraction(other.to_string()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(format!("Invalid request body: {}", rejection.body_text()))
    }
}

impl From<MultipartRejection> for AppError {
    fn from(rejection: MultipartRejection) -> Self {
        AppError::Validation(format!("Invalid upload: {}", rejection.body_text()))
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Validation(_) | AppError::NoExtractableText => StatusCode::BAD_REQUEST,
            AppError::Extraction(_)
            | AppError::Scoring(_)
            | AppError::Generation(_)
            | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            AppError::Extraction(msg) => tracing::error!("PDF extraction failed: {msg}"),
            AppError::Scoring(e) => tracing::error!("Scoring error: {e}"),
            AppError::Generation(e) => tracing::error!("Generation error: {e}"),
            AppError::Internal(e) => tracing::error!("Internal error: {e:?}"),
            AppError::Validation(msg) => tracing::debug!("Rejected request: {msg}"),
            AppError::NoExtractableText => tracing::debug!("Upload contained no extractable text"),
        }

        (status, Json(json!({ "detail": self.to_string() }))).into_response()
    }
}
