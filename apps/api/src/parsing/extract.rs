//! PDF text extraction.
//!
//! `pdf_extract` can panic on malformed input instead of returning an error,
//! so every call runs inside `catch_unwind`. Only text-based PDFs are
//! supported: a document with no extractable text is an input error.

use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("could not read PDF: {0}")]
    Io(#[from] std::io::Error),

    #[error("PDF extraction failed: {0}")]
    Malformed(String),

    #[error("No text extracted from PDF. Use OCR if the document is scanned.")]
    NoText,
}

static TRAILING_SPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[ \t\x0B\x0C\r]+\n").expect("valid regex"));
static BLANK_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\n{3,}").expect("valid regex"));

/// Reads a PDF from disk and returns its normalized text.
pub fn extract_text(path: &Path) -> Result<String, ExtractError> {
    let bytes = std::fs::read(path)?;
    extract_text_from_mem(&bytes)
}

/// Extracts and normalizes text from in-memory PDF bytes.
pub fn extract_text_from_mem(bytes: &[u8]) -> Result<String, ExtractError> {
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem(bytes)
    }));

    let raw = match result {
        Ok(Ok(text)) => text,
        Ok(Err(e)) => return Err(ExtractError::Malformed(e.to_string())),
        Err(_) => {
            return Err(ExtractError::Malformed(
                "extractor panicked (malformed document)".to_string(),
            ))
        }
    };

    let text = normalize_whitespace(&raw);
    if text.is_empty() {
        return Err(ExtractError::NoText);
    }
    Ok(text)
}

/// Strips whitespace before each newline, collapses 3+ newlines to exactly
/// two, and trims the result.
pub fn normalize_whitespace(raw: &str) -> String {
    let text = raw.replace("\r\n", "\n");
    let text = TRAILING_SPACE.replace_all(&text, "\n");
    let text = BLANK_RUN.replace_all(&text, "\n\n");
    text.trim().to_string()
}
