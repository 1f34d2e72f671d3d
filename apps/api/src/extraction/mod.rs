//! Document Text Extractor: PDF bytes in, one normalised text blob out.
//!
//! Pages are read in document order from the PDF text layer (no OCR),
//! trimmed individually, and joined with a blank line.

pub mod handlers;

use bytes::Bytes;
use thiserror::Error;

/// Separator placed between consecutive pages.
const PAGE_SEPARATOR: &str = "\n\n";

#[derive(Debug, Error)]
pub enum ExtractionError {
    /// The bytes could not be decoded as a PDF document.
    #[error("{0}")]
    Parse(String),

    /// Structurally valid PDF without a text layer (e.g. scanned images).
    #[error("document contains no extractable text")]
    EmptyContent,

    #[error("extraction worker failed: {0}")]
    Worker(String),
}

/// Synchronous extraction. CPU-bound; call from a blocking context.
pub fn extract(bytes: &[u8]) -> Result<String, ExtractionError> {
    let pages = pdf_extract::extract_text_from_mem_by_pages(bytes)
        .map_err(|e| ExtractionError::Parse(e.to_string()))?;
    join_pages(&pages)
}

/// Runs [`extract`] on the blocking pool so the request executor is never stalled.
/// A panic inside the PDF parser surfaces as `Parse` instead of unwinding into the server.
pub async fn extract_text(bytes: Bytes) -> Result<String, ExtractionError> {
    tokio::task::spawn_blocking(move || extract(&bytes))
        .await
        .map_err(|e| {
            if e.is_panic() {
                ExtractionError::Parse("PDF parser aborted on malformed input".to_string())
            } else {
                ExtractionError::Worker(e.to_string())
            }
        })?
}

/// Trims every page, joins them with a blank line, and trims the result.
fn join_pages<S: AsRef<str>>(pages: &[S]) -> Result<String, ExtractionError> {
    let text = pages
        .iter()
        .map(|page| page.as_ref().trim())
        .collect::<Vec<_>>()
        .join(PAGE_SEPARATOR);

    let text = text.trim();
    if text.is_empty() {
        return Err(ExtractionError::EmptyContent);
    }
    Ok(text.to_string())
}
