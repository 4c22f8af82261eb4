//! Request-level entry point: chain, then parse, with retrieval chunks passed
//! through untouched.

use crate::parser::{ParsedAnswer, parse};
use crate::providers::ProviderChain;
use crate::types::{ChunkRef, GenerationOutcome, Query};
use serde::{Deserialize, Serialize};

/// Input from the retrieval collaborator.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatRequest {
    #[serde(default)]
    pub context: String,
    pub query: String,
    pub machine: String,
    #[serde(default)]
    pub chunks: Vec<ChunkRef>,
}

/// Output for the presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatResponse {
    /// Canonical answer text as produced by the winning tier.
    pub formatted: String,
    pub parsed: ParsedAnswer,
    pub backend: String,
    pub attempts: Vec<GenerationOutcome>,
    pub chunks: Vec<ChunkRef>,
}

/// Runs one request through the provider chain and the section parser.
pub struct Formatter {
    chain: ProviderChain,
}

impl Formatter {
    pub fn new(chain: ProviderChain) -> Self {
        Self { chain }
    }

    pub fn chain(&self) -> &ProviderChain {
        &self.chain
    }

    pub async fn format(&self, request: FormatRequest) -> FormatResponse {
        let FormatRequest {
            context,
            query,
            machine,
            chunks,
        } = request;
        let result = self.chain.generate(&Query::new(context, query, machine)).await;
        FormatResponse {
            parsed: parse(&result.answer),
            formatted: result.answer,
            backend: result.backend,
            attempts: result.attempts,
            chunks,
        }
    }
}
