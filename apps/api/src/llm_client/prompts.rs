// Shared prompt constants.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains the cross-cutting JSON repair prompt.

/// System prompt for the one-shot fixer call. The user message is the raw
/// completion that failed to parse, with no other context.
pub const FIXER_SYSTEM: &str = "You are a JSON fixer. \
    Convert the following text into valid JSON only. \
    Return only JSON, no explanations.";
