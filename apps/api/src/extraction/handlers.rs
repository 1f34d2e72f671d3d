//! Axum route handler for PDF upload.

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart,
    },
    Json,
};
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::extraction::extract_text;

const PDF_CONTENT_TYPE: &str = "application/pdf";
const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub extracted_text: String,
}

/// POST /upload
///
/// Accepts a multipart form with a `file` part declared as `application/pdf`
/// and returns the extracted text.
pub async fn handle_upload(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, AppError> {
    let mut multipart = multipart?;

    while let Some(field) = multipart.next_field().await.map_err(invalid_upload)? {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }

        if !is_pdf_content_type(field.content_type()) {
            return Err(AppError::Validation("Only PDF files are allowed.".to_string()));
        }

        let file_name = field.file_name().unwrap_or("<unnamed>").to_string();
        let bytes = field.bytes().await.map_err(invalid_upload)?;
        if bytes.is_empty() {
            return Err(AppError::Validation("Empty file uploaded.".to_string()));
        }

        let size = bytes.len();
        let extracted_text = extract_text(bytes).await?;
        info!(
            "Extracted {} chars from '{}' ({} bytes)",
            extracted_text.chars().count(),
            file_name,
            size
        );

        return Ok(Json(UploadResponse { extracted_text }));
    }

    Err(AppError::Validation("No file uploaded.".to_string()))
}

fn invalid_upload(err: MultipartError) -> AppError {
    AppError::Validation(format!("Invalid upload: {}", err.body_text()))
}

/// Compares the MIME essence only, so `application/pdf; charset=binary` passes.
fn is_pdf_content_type(content_type: Option<&str>) -> bool {
    content_type
        .and_then(|ct| ct.split(';').next())
        .map(|essence| essence.trim().eq_ignore_ascii_case(PDF_CONTENT_TYPE))
        .unwrap_or(false)
}
