// Document renderer: ResumeRecord → layout blocks → paginated PDF.
// CPU-bound; callers on the async runtime wrap it in tokio::task::spawn_blocking.

pub mod font_metrics;
pub mod handlers;
pub mod layout;
pub mod pdf;

use std::path::Path;

use serde_json::Value;
use thiserror::Error;

use crate::models::resume::ResumeRecord;

use layout::build_blocks;
use pdf::PageSetup;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("invalid resume record: {0}")]
    InvalidRecord(#[from] serde_json::Error),

    #[error("PDF serialization failed: {0}")]
    Pdf(String),

    #[error("could not write PDF: {0}")]
    Io(#[from] std::io::Error),
}

/// Renders a typed record to PDF bytes.
pub fn render_to_bytes(record: &ResumeRecord) -> Result<Vec<u8>, RenderError> {
    let blocks = build_blocks(record);
    pdf::write_pdf(&blocks, &PageSetup::letter())
}

/// Typed view of an untyped JSON record, as received from the model or the client.
pub fn record_from_value(value: &Value) -> Result<ResumeRecord, RenderError> {
    Ok(ResumeRecord::from_value(value)?)
}

/// Renders a typed record straight to a file, overwriting it if present.
pub fn render_to_file(record: &ResumeRecord, path: &Path) -> Result<(), RenderError> {
    let bytes = render_to_bytes(record)?;
    std::fs::write(path, bytes)?;
    Ok(())
}
