//! # indurag Core
//!
//! Grounded answer formatting for maintenance questions. Retrieved manual text
//! and a technician's query go in; a fixed four-section answer comes out.
//!
//! The pipeline is a fallback ladder of generation backends
//! ([`ProviderChain`]) whose outputs are vetted by a [`GroundingValidator`],
//! ending in a deterministic [`RuleBasedExtractor`] that cannot fail. The
//! chosen text is read back into typed sections by [`parse`].

pub mod answer;
pub mod brain;
pub mod config;
pub mod error;
pub mod extractor;
pub mod gateway;
pub mod grounding;
pub mod parser;
pub mod prompt;
pub mod providers;
pub mod service;
pub mod types;

// Re-export commonly used types at the crate root.
pub use brain::{LlmProvider, MockLlmProvider};
pub use config::{ExtractorLimits, FormatterConfig, load_config};
pub use error::{ConfigError, LlmError};
pub use extractor::RuleBasedExtractor;
pub use grounding::GroundingValidator;
pub use parser::{ParsedAnswer, parse};
pub use providers::{ChainResult, ProviderChain};
pub use service::{FormatRequest, FormatResponse, Formatter};
pub use types::{ChunkRef, CompletionRequest, CompletionResponse, GenerationOutcome, Query};
