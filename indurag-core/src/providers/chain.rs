//! Ordered provider fallback with grounding validation.
//!
//! Tiers are tried one at a time in priority order. A tier fails if its call
//! errors (transport, status, payload, timeout) or if its text is judged bad by
//! the [`GroundingValidator`]. The first tier with good text wins; when every
//! generative tier fails the [`RuleBasedExtractor`] answers, and it cannot fail.

use crate::answer::no_context_answer;
use crate::brain::LlmProvider;
use crate::config::{FormatterConfig, GenerationConfig};
use crate::error::LlmError;
use crate::extractor::RuleBasedExtractor;
use crate::grounding::GroundingValidator;
use crate::prompt::build_request;
use crate::types::{GenerationOutcome, Query};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Name recorded for the terminal extractor tier.
pub const RULE_BASED_TIER: &str = "rule-based";

/// Name recorded when the empty-context template answers.
pub const NO_CONTEXT_TIER: &str = "no-context";

/// What the chain produced for one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChainResult {
    /// Canonical four-section answer text.
    pub answer: String,
    /// Tier that produced `answer`.
    pub backend: String,
    /// Every tier tried, in order, including the winner.
    pub attempts: Vec<GenerationOutcome>,
}

/// The resilience ladder: generative backends, then the extractor.
pub struct ProviderChain {
    providers: Vec<Arc<dyn LlmProvider>>,
    generation: GenerationConfig,
    validator: GroundingValidator,
    extractor: RuleBasedExtractor,
}

impl ProviderChain {
    /// Create a chain over `providers`, tried in the order given.
    pub fn new(
        providers: Vec<Arc<dyn LlmProvider>>,
        generation: GenerationConfig,
        extractor: RuleBasedExtractor,
    ) -> Self {
        Self {
            providers,
            generation,
            validator: GroundingValidator::new(),
            extractor,
        }
    }

    /// Build the chain from startup configuration.
    pub fn from_config(config: &FormatterConfig) -> Result<Self, LlmError> {
        Ok(Self::new(
            super::create_providers(config)?,
            config.generation.clone(),
            RuleBasedExtractor::new(config.extractor),
        ))
    }

    /// Names of all tiers in the order they are tried.
    pub fn tier_names(&self) -> Vec<String> {
        self.providers
            .iter()
            .map(|p| p.provider_name().to_string())
            .chain(std::iter::once(RULE_BASED_TIER.to_string()))
            .collect()
    }

    /// Produce a grounded answer for `query`. Never fails.
    pub async fn generate(&self, query: &Query) -> ChainResult {
        if !query.has_context() {
            debug!(machine = %query.machine, "Empty context, skipping all backends");
            return ChainResult {
                answer: no_context_answer(&query.query, &query.machine),
                backend: NO_CONTEXT_TIER.to_string(),
                attempts: Vec::new(),
            };
        }

        let request = build_request(query, &self.generation);
        let mut attempts = Vec::with_capacity(self.providers.len() + 1);

        for (i, provider) in self.providers.iter().enumerate() {
            let name = provider.provider_name();
            let started = Instant::now();

            match provider.complete(request.clone()).await {
                Ok(response) if !self.validator.is_bad(&response.text) => {
                    info!(
                        provider = name,
                        model = %response.model,
                        elapsed_ms = started.elapsed().as_millis() as u64,
                        "Grounded answer produced"
                    );
                    attempts.push(GenerationOutcome::success(name, response.text.clone()));
                    return ChainResult {
                        answer: response.text,
                        backend: name.to_string(),
                        attempts,
                    };
                }
                Ok(_) => {
                    warn!(
                        provider_index = i,
                        provider = name,
                        "Provider output empty or flagged insufficient context, trying next"
                    );
                    attempts.push(GenerationOutcome::failure(name));
                }
                Err(e) => {
                    warn!(
                        provider_index = i,
                        provider = name,
                        model = provider.model_name(),
                        error = %e,
                        "Provider failed, trying next"
                    );
                    attempts.push(GenerationOutcome::failure(name));
                }
            }
        }

        debug!("Falling back to rule-based extraction");
        let answer = self.extractor.extract(&query.context, &query.query);
        attempts.push(GenerationOutcome::success(RULE_BASED_TIER, answer.clone()));
        ChainResult {
            answer,
            backend: RULE_BASED_TIER.to_string(),
            attempts,
        }
    }
}
