//! Canonical grounding prompt shared by every generative backend.

use crate::config::GenerationConfig;
use crate::types::{CompletionRequest, Query};

/// Sampling temperature for every backend call. Not configurable.
pub const TEMPERATURE: f32 = 0.0;

/// System instruction restricting the model to the supplied context.
pub const SYSTEM_PROMPT: &str = "You are an industrial maintenance assistant. Your ONLY job is to extract and structure information from the provided CONTEXT.

STRICT RULES:
1. Use ONLY information explicitly present in the CONTEXT.
2. If a section has no relevant info in the context, write: \"Not found in manual.\"
3. Do NOT use general knowledge. Do NOT guess. Do NOT add anything not in the context.
4. If the context is completely unrelated to the query, respond only with: INSUFFICIENT_CONTEXT

Output format (use exactly):
PROBLEM SUMMARY:
[What the context says about this issue]

POSSIBLE CAUSES:
1. [cause from context]

STEP-BY-STEP CORRECTIVE ACTIONS:
1. [step from context]

SAFETY NOTES:
[warnings from context, or \"None stated in manual.\"]";

/// User turn: context verbatim between `===` lines, then the query.
pub fn build_user_prompt(context: &str, query: &str) -> String {
    format!(
        "CONTEXT (from uploaded manual/repair logs only):\n===\n{context}\n===\n\nTechnician query: {query}\n\nUsing ONLY the context above, provide the structured response."
    )
}

/// Assemble the full request for one backend call.
pub fn build_request(query: &Query, generation: &GenerationConfig) -> CompletionRequest {
    CompletionRequest {
        system: SYSTEM_PROMPT.to_string(),
        prompt: build_user_prompt(&query.context, &query.query),
        temperature: TEMPERATURE,
        max_tokens: generation.max_tokens,
    }
}
