//! Axum route handler for the upload-and-parse endpoint.

use axum::{
    extract::{Multipart, State},
    Json,
};
use bytes::Bytes;
use serde::Serialize;
use tracing::info;

use crate::errors::AppError;
use crate::llm_client::recovery::RecoveryOutcome;
use crate::parsing::pipeline::parse_resume_bytes;
use crate::render::handlers::render_preview;
use crate::render::record_from_value;
use crate::state::AppState;

const FILE_FIELD: &str = "file";

#[derive(Debug, Serialize)]
pub struct UploadResponse {
    pub filename: String,
    /// The parsed object exactly as recovered, or `{error, raw_output}`.
    pub parsed: RecoveryOutcome,
    /// `None` when the model output could not be recovered.
    pub pdf_url: Option<String>,
}

/// POST /upload/
///
/// Stores the uploaded PDF, runs extraction → completion → JSON recovery,
/// renders a preview and returns the parsed object with its URL.
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, AppError> {
    let (filename, bytes) = read_file_field(&mut multipart).await?;
    if bytes.is_empty() {
        return Err(AppError::BadRequest("uploaded file is empty".to_string()));
    }

    let stored = state.store.save_upload(&filename, &bytes).await?;
    info!("Received upload '{}' -> {}", filename, stored.file_name);

    let parsed = parse_resume_bytes(bytes.to_vec(), state.llm.as_ref()).await?;

    let pdf_url = match parsed.parsed() {
        Some(value) => {
            let record = record_from_value(value)?;
            Some(render_preview(&state.store, record).await?)
        }
        None => None,
    };

    Ok(Json(UploadResponse {
        filename,
        parsed,
        pdf_url,
    }))
}

async fn read_file_field(multipart: &mut Multipart) -> Result<(String, Bytes), AppError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(format!("invalid multipart body: {e}")))?
    {
        if field.name() != Some(FILE_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or_default().to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AppError::BadRequest(format!("could not read uploaded file: {e}")))?;
        return Ok((filename, bytes));
    }
    Err(AppError::BadRequest(format!(
        "multipart field '{FILE_FIELD}' is required"
    )))
}
