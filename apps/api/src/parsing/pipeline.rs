//! Résumé parsing pipeline: PDF → text → prompt → completion → JSON recovery.

use std::path::Path;

use tracing::{info, warn};

use crate::errors::AppError;
use crate::llm_client::recovery::{recover, RecoveryOutcome};
use crate::llm_client::{ChatCompletion, ChatMessage};
use crate::models::resume::conformance_warnings;
use crate::parsing::extract::{extract_text, extract_text_from_mem};
use crate::parsing::prompts::{build_user_prompt, RESUME_PARSE_SYSTEM};

/// Parses an uploaded PDF held in memory. Extraction runs on the blocking pool.
pub async fn parse_resume_bytes(
    bytes: Vec<u8>,
    llm: &dyn ChatCompletion,
) -> Result<RecoveryOutcome, AppError> {
    let text = tokio::task::spawn_blocking(move || extract_text_from_mem(&bytes))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in extraction: {e}")))??;
    parse_resume_text(&text, llm).await
}

/// Parses a PDF on disk.
pub async fn parse_resume(path: &Path, llm: &dyn ChatCompletion) -> Result<RecoveryOutcome, AppError> {
    let path = path.to_path_buf();
    let text = tokio::task::spawn_blocking(move || extract_text(&path))
        .await
        .map_err(|e| AppError::Internal(anyhow::anyhow!("spawn_blocking failed in extraction: {e}")))??;
    parse_resume_text(&text, llm).await
}

/// Runs the completion and recovery steps on already-extracted text.
pub async fn parse_resume_text(
    text: &str,
    llm: &dyn ChatCompletion,
) -> Result<RecoveryOutcome, AppError> {
    let messages = [
        ChatMessage::system(RESUME_PARSE_SYSTEM),
        ChatMessage::user(build_user_prompt(text)),
    ];

    info!("Sending resume to model ({} chars of text)", text.len());
    let completion = llm.complete(&messages).await?;
    let outcome = recover(llm, &completion).await?;

    if let Some(parsed) = outcome.parsed() {
        let warnings = conformance_warnings(parsed);
        if !warnings.is_empty() {
            warn!("Parsed resume deviates from schema: {}", warnings.join("; "));
        }
    }

    Ok(outcome)
}
