use std::sync::Arc;

use crate::llm_client::ChatCompletion;
use crate::storage::FileStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Completion backend. `LlmClient` in production, a scripted client in tests.
    pub llm: Arc<dyn ChatCompletion>,
    pub store: FileStore,
}
