//! Text Extractor — raw document bytes in, best-effort text out.
//!
//! Knows nothing about batches, prompts, or models. Whether extracted text
//! is usable (e.g. non-empty) is the caller's concern.

use thiserror::Error;

use crate::screening::document::DocumentKind;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("failed to read PDF: {0}")]
    Pdf(String),

    #[error("text file is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}

/// Extracts text from a document's raw bytes.
///
/// PDFs are parsed as paginated documents; per-page text is concatenated in
/// page order, and pages without text contribute nothing. A structurally
/// valid PDF that yields only whitespace is NOT an error here. Plain text
/// must decode as UTF-8.
pub fn extract_text(bytes: &[u8], kind: DocumentKind) -> Result<String, ExtractionError> {
    match kind {
        DocumentKind::Pdf => {
            pdf_extract::extract_text_from_mem(bytes).map_err(|e| ExtractionError::Pdf(e.to_string()))
        }
        DocumentKind::PlainText => Ok(String::from_utf8(bytes.to_vec())?),
    }
}
