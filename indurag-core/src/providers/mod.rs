//! Generation backend implementations.
//!
//! Provides concrete implementations of the `LlmProvider` trait for:
//! - Ollama (local models)
//! - OpenAI chat completions
//! - Anthropic Messages API
//!
//! [`ProviderChain`] tries them in that order and ends with the rule-based
//! extractor.

pub mod anthropic;
pub mod chain;
pub mod ollama;
pub mod openai;

use crate::brain::LlmProvider;
use crate::config::FormatterConfig;
use crate::error::LlmError;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

pub use anthropic::AnthropicProvider;
pub use chain::{ChainResult, ProviderChain, RULE_BASED_TIER};
pub use ollama::OllamaProvider;
pub use openai::OpenAiProvider;

/// Cap on TCP connect time, applied on top of the per-backend timeout.
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// Build an HTTP client whose overall request timeout is `timeout_secs`.
pub(crate) fn http_client(timeout_secs: u64) -> Result<Client, LlmError> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS.min(timeout_secs.max(1))))
        .build()
        .map_err(|e| LlmError::Connection {
            message: format!("Failed to build HTTP client: {}", e),
        })
}

/// Instantiate the enabled generative backends in priority order.
///
/// The local backend is included when `local.enabled` is set; each cloud
/// backend only when its credential resolves. Credentials are read once here.
pub fn create_providers(config: &FormatterConfig) -> Result<Vec<Arc<dyn LlmProvider>>, LlmError> {
    let mut providers: Vec<Arc<dyn LlmProvider>> = Vec::new();

    if config.local.enabled {
        providers.push(Arc::new(OllamaProvider::new(&config.local)?));
    }
    if let Some(key) = config.openai.resolve_api_key() {
        providers.push(Arc::new(OpenAiProvider::new(&config.openai, key)?));
    }
    if let Some(key) = config.anthropic.resolve_api_key() {
        providers.push(Arc::new(AnthropicProvider::new(&config.anthropic, key)?));
    }

    info!(
        backends = ?providers.iter().map(|p| p.provider_name()).collect::<Vec<_>>(),
        "Generation backends configured"
    );
    Ok(providers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CloudBackendConfig;

    fn config_without_env_keys() -> FormatterConfig {
        let mut config = FormatterConfig::default();
        config.openai = CloudBackendConfig {
            api_key_env: "INDURAG_TEST_NO_OPENAI_KEY".into(),
            ..CloudBackendConfig::openai()
        };
        config.anthropic = CloudBackendConfig {
            api_key_env: "INDURAG_TEST_NO_ANTHROPIC_KEY".into(),
            ..CloudBackendConfig::anthropic()
        };
        config
    }

    #[test]
    fn test_create_providers_local_only() {
        let providers = create_providers(&config_without_env_keys()).unwrap();
        let names: Vec<_> = providers.iter().map(|p| p.provider_name()).collect();
        assert_eq!(names, vec!["ollama"]);
    }

    #[test]
    fn test_create_providers_priority_order() {
        let mut config = config_without_env_keys();
        config.openai.api_key = Some("sk-openai".into());
        config.anthropic.api_key = Some("sk-ant".into());
        let providers = create_providers(&config).unwrap();
        let names: Vec<_> = providers.iter().map(|p| p.provider_name()).collect();
        assert_eq!(names, vec!["ollama", "openai", "anthropic"]);
    }

    #[test]
    fn test_create_providers_none_enabled() {
        let mut config = config_without_env_keys();
        config.local.enabled = false;
        assert!(create_providers(&config).unwrap().is_empty());
    }

    #[test]
    fn test_http_client_builds() {
        assert!(http_client(60).is_ok());
        assert!(http_client(0).is_ok());
    }
}
