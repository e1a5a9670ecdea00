//! Axum route handler for the update-and-rerender endpoint.

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::errors::AppError;
use crate::models::resume::ResumeRecord;
use crate::render::{record_from_value, render_to_file};
use crate::state::AppState;
use crate::storage::FileStore;

#[derive(Debug, Deserialize)]
pub struct UpdateRequest {
    pub parsed: Value,
}

#[derive(Debug, Serialize)]
pub struct UpdateResponse {
    pub success: bool,
    pub pdf_url: String,
}

/// POST /update/
///
/// Re-renders a client-edited record. No extraction or model call.
pub async fn handle_update(
    State(state): State<AppState>,
    payload: Result<Json<UpdateRequest>, JsonRejection>,
) -> Result<Json<UpdateResponse>, AppError> {
    let Json(request) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;
    let record = record_from_value(&request.parsed)?;
    let pdf_url = render_preview(&state.store, record).await?;
    Ok(Json(UpdateResponse {
        success: true,
        pdf_url,
    }))
}

/// Renders `record` to a fresh request-scoped file and returns its public URL.
pub(crate) async fn render_preview(
    store: &FileStore,
    record: ResumeRecord,
) -> Result<String, AppError> {
    let preview = store.preview_file();
    let path = preview.path.clone();

    tokio::task::spawn_blocking(move || render_to_file(&record, &path))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in render: {e}")))??;

    info!("Rendered preview {}", preview.path.display());
    Ok(store.public_url(&preview.file_name))
}
