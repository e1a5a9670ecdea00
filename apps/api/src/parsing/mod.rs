// Résumé parsing: PDF text extraction, prompt construction and the
// upload pipeline. All model calls go through llm_client.

pub mod extract;
pub mod handlers;
pub mod pipeline;
pub mod prompts;
