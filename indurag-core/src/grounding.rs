//! Grounding check for generated answers.

/// Token a backend emits when the context does not cover the query.
pub const INSUFFICIENT_CONTEXT: &str = "INSUFFICIENT_CONTEXT";

/// Judges whether generated text may be shown to a technician.
#[derive(Debug, Clone, Copy, Default)]
pub struct GroundingValidator;

impl GroundingValidator {
    pub fn new() -> Self {
        Self
    }

    /// True if `text` is blank or carries the sentinel anywhere, in any case.
    pub fn is_bad(&self, text: &str) -> bool {
        text.trim().is_empty() || text.to_uppercase().contains(INSUFFICIENT_CONTEXT)
    }
}
