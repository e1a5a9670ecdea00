//! JSON recovery for untrusted completion text.
//!
//! Protocol:
//! 1. Parse the whole completion as a JSON object.
//! 2. Otherwise parse the slice from the first `{` to the last `}`.
//! 3. Otherwise make exactly one fixer call and repeat 1–2 on its output.
//! 4. Otherwise hand back an `Unrecoverable` value carrying the raw text.
//!
//! Only well-formedness is checked here. A parsed object that is missing every
//! schema field is still `Parsed`.

use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::llm_client::prompts::FIXER_SYSTEM;
use crate::llm_client::{ChatCompletion, ChatMessage, LlmError};

pub const UNRECOVERABLE_MESSAGE: &str = "Could not fix JSON";

/// Best-effort error object returned in place of a parsed record.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnrecoverableJson {
    pub error: String,
    pub raw_output: String,
}

/// Result of running the recovery protocol. Serializes to either the parsed
/// object itself or `{"error", "raw_output"}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RecoveryOutcome {
    Parsed(Value),
    Unrecoverable(UnrecoverableJson),
}

impl RecoveryOutcome {
    pub fn parsed(&self) -> Option<&Value> {
        match self {
            RecoveryOutcome::Parsed(value) => Some(value),
            RecoveryOutcome::Unrecoverable(_) => None,
        }
    }
}

/// Steps 1 and 2: whole-text parse, then the outermost brace slice.
/// Only JSON objects count as success.
pub fn parse_json_object(text: &str) -> Option<Value> {
    if let Some(value) = parse_object(text) {
        return Some(value);
    }

    let first = text.find('{')?;
    let last = text.rfind('}')?;
    if last <= first {
        return None;
    }
    parse_object(&text[first..=last])
}

fn parse_object(text: &str) -> Option<Value> {
    match serde_json::from_str::<Value>(text) {
        Ok(value @ Value::Object(_)) => Some(value),
        _ => None,
    }
}

/// Runs the full protocol against `completion`, using `client` for the single
/// fixer call if needed. Transport failures during the fixer call propagate.
pub async fn recover(
    client: &dyn ChatCompletion,
    completion: &str,
) -> Result<RecoveryOutcome, LlmError> {
    if let Some(value) = parse_json_object(completion) {
        return Ok(RecoveryOutcome::Parsed(value));
    }

    warn!(
        "Model output was not valid JSON ({} chars), retrying with fixer",
        completion.len()
    );
    let messages = [ChatMessage::system(FIXER_SYSTEM), ChatMessage::user(completion)];
    let fixed = client.complete(&messages).await?;

    match parse_json_object(&fixed) {
        Some(value) => {
            info!("Fixer call produced valid JSON");
            Ok(RecoveryOutcome::Parsed(value))
        }
        None => {
            warn!("Fixer output was still not valid JSON");
            Ok(RecoveryOutcome::Unrecoverable(UnrecoverableJson {
                error: UNRECOVERABLE_MESSAGE.to_string(),
                raw_output: fixed,
            }))
        }
    }
}
