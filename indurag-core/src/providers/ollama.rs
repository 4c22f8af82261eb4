//! Local Ollama provider (`POST /api/generate`, non-streaming).

use crate::brain::LlmProvider;
use crate::config::LocalBackendConfig;
use crate::error::LlmError;
use crate::types::{CompletionRequest, CompletionResponse};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Request for /api/generate
#[derive(Debug, Clone, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    system: &'a str,
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Clone, Serialize)]
struct GenerateOptions {
    temperature: f32,
    num_predict: usize,
}

/// Response from /api/generate (non-streaming)
#[derive(Debug, Clone, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    response: String,
}

pub struct OllamaProvider {
    client: Client,
    base_url: String,
    model: String,
    timeout_secs: u64,
}

impl OllamaProvider {
    pub fn new(config: &LocalBackendConfig) -> Result<Self, LlmError> {
        Ok(Self {
            client: super::http_client(config.timeout_secs)?,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            timeout_secs: config.timeout_secs,
        })
    }
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let url = format!("{}/api/generate", self.base_url);
        let body = GenerateRequest {
            model: &self.model,
            prompt: &request.prompt,
            system: &request.system,
            stream: false,
            options: GenerateOptions {
                temperature: request.temperature,
                num_predict: request.max_tokens,
            },
        };

        debug!(url = %url, model = %self.model, "Sending Ollama generate request");

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| LlmError::from_transport(e, self.timeout_secs))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            return Err(LlmError::ApiRequest {
                message: format!("HTTP {} from Ollama: {}", status, text),
            });
        }

        let parsed: GenerateResponse = response.json().await.map_err(|e| {
            if e.is_timeout() {
                LlmError::Timeout {
                    timeout_secs: self.timeout_secs,
                }
            } else {
                LlmError::ResponseParse {
                    message: format!("Invalid Ollama response: {}", e),
                }
            }
        })?;

        Ok(CompletionResponse {
            text: parsed.response,
            model: parsed.model.unwrap_or_else(|| self.model.clone()),
        })
    }

    fn provider_name(&self) -> &str {
        "ollama"
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_request_serialization() {
        let body = GenerateRequest {
            model: "mistral",
            prompt: "CONTEXT",
            system: "RULES",
            stream: false,
            options: GenerateOptions {
                temperature: 0.0,
                num_predict: 1024,
            },
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["model"], "mistral");
        assert_eq!(json["system"], "RULES");
        assert_eq!(json["stream"], false);
        assert_eq!(json["options"]["temperature"], 0.0);
        assert_eq!(json["options"]["num_predict"], 1024);
    }

    #[test]
    fn test_generate_response_tolerates_missing_fields() {
        let parsed: GenerateResponse = serde_json::from_str(r#"{"done": true}"#).unwrap();
        assert!(parsed.response.is_empty());
        assert!(parsed.model.is_none());

        let parsed: GenerateResponse =
            serde_json::from_str(r#"{"model":"mistral","response":"PROBLEM SUMMARY:","done":true}"#)
                .unwrap();
        assert_eq!(parsed.response, "PROBLEM SUMMARY:");
    }

    #[test]
    fn test_provider_from_config() {
        let config = LocalBackendConfig {
            base_url: "http://gpu-box:11434/".into(),
            ..LocalBackendConfig::default()
        };
        let provider = OllamaProvider::new(&config).unwrap();
        assert_eq!(provider.base_url, "http://gpu-box:11434");
        assert_eq!(provider.model_name(), "mistral");
        assert_eq!(provider.provider_name(), "ollama");
    }
}
