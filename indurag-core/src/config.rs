//! Configuration system for indurag.
//!
//! Uses `figment` for layered configuration: defaults -> user config file ->
//! workspace config file -> environment -> explicit overrides. The result is an
//! immutable [`FormatterConfig`] built once at startup and handed to the
//! provider chain.

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::ConfigError;

/// Top-level configuration for the formatting pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FormatterConfig {
    #[serde(default)]
    pub local: LocalBackendConfig,
    #[serde(default = "CloudBackendConfig::openai")]
    pub openai: CloudBackendConfig,
    #[serde(default = "CloudBackendConfig::anthropic")]
    pub anthropic: CloudBackendConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub extractor: ExtractorLimits,
    #[serde(default)]
    pub server: ServerConfig,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            local: LocalBackendConfig::default(),
            openai: CloudBackendConfig::openai(),
            anthropic: CloudBackendConfig::anthropic(),
            generation: GenerationConfig::default(),
            extractor: ExtractorLimits::default(),
            server: ServerConfig::default(),
        }
    }
}

/// Local (Ollama) generation backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocalBackendConfig {
    /// Whether the local backend is tried first.
    pub enabled: bool,
    /// Base URL of the Ollama daemon.
    pub base_url: String,
    /// Model tag passed to `/api/generate`.
    pub model: String,
    /// Connect + response timeout in seconds.
    pub timeout_secs: u64,
}

impl Default for LocalBackendConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "http://localhost:11434".to_string(),
            model: "mistral".to_string(),
            timeout_secs: 120,
        }
    }
}

/// A hosted generation backend gated on credential presence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CloudBackendConfig {
    /// Model identifier.
    pub model: String,
    /// Environment variable name containing the API key.
    pub api_key_env: String,
    /// Inline API key. Takes precedence over `api_key_env` when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Optional base URL override for the API endpoint.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Connect + response timeout in seconds.
    pub timeout_secs: u64,
}

impl CloudBackendConfig {
    pub fn openai() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            api_key_env: "OPENAI_API_KEY".to_string(),
            api_key: None,
            base_url: None,
            timeout_secs: 60,
        }
    }

    pub fn anthropic() -> Self {
        Self {
            model: "claude-haiku-4-5-20251001".to_string(),
            api_key_env: "ANTHROPIC_API_KEY".to_string(),
            api_key: None,
            base_url: None,
            timeout_secs: 60,
        }
    }

    /// Resolve the credential: inline key first, then the named env var.
    ///
    /// Blank values count as absent.
    pub fn resolve_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var(&self.api_key_env).ok())
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
    }
}

/// Output budget shared by every generative backend. Temperature is fixed at
/// [`crate::prompt::TEMPERATURE`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub max_tokens: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self { max_tokens: 1024 }
    }
}

/// Output bounds for the rule-based extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractorLimits {
    pub max_causes: usize,
    pub max_fixes: usize,
    pub max_warnings: usize,
    /// Captured lines are cut to this many characters.
    pub max_line_chars: usize,
}

pub const DEFAULT_MAX_CAUSES: usize = 5;
pub const DEFAULT_MAX_FIXES: usize = 7;
pub const DEFAULT_MAX_WARNINGS: usize = 3;
pub const DEFAULT_MAX_LINE_CHARS: usize = 250;

impl Default for ExtractorLimits {
    fn default() -> Self {
        Self {
            max_causes: DEFAULT_MAX_CAUSES,
            max_fixes: DEFAULT_MAX_FIXES,
            max_warnings: DEFAULT_MAX_WARNINGS,
            max_line_chars: DEFAULT_MAX_LINE_CHARS,
        }
    }
}

/// HTTP service settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub bind_addr: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:8000".to_string(),
        }
    }
}

impl FormatterConfig {
    /// Validate this config and return any warnings.
    ///
    /// Returns an empty Vec if the config is valid. Problems are reported as
    /// human-readable messages rather than errors.
    pub fn validate(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.generation.max_tokens == 0 {
            warnings.push("generation.max_tokens is 0; backends will return nothing".into());
        }
        let limits = &self.extractor;
        if limits.max_causes == 0 || limits.max_fixes == 0 {
            warnings.push(
                "extractor caps of 0 mean the rule-based fallback never reports content".into(),
            );
        }
        if limits.max_line_chars == 0 {
            warnings.push("extractor.max_line_chars is 0; captured lines will be empty".into());
        }
        for (name, backend) in [("openai", &self.openai), ("anthropic", &self.anthropic)] {
            if backend.timeout_secs == 0 {
                warnings.push(format!("{name}.timeout_secs is 0"));
            }
        }
        if self.local.enabled && self.local.timeout_secs == 0 {
            warnings.push("local.timeout_secs is 0".into());
        }
        warnings
    }
}

/// Load configuration from all layers.
///
/// Layers, lowest precedence first:
/// 1. Built-in defaults
/// 2. `~/.config/indurag/config.toml`
/// 3. `<workspace>/.indurag/config.toml`
/// 4. `INDURAG_*` environment variables (`INDURAG_LOCAL__MODEL=llama3`)
/// 5. Legacy variables `USE_OLLAMA`, `OLLAMA_MODEL`, `OLLAMA_URL`
/// 6. Explicit overrides
pub fn load_config(
    workspace: Option<&Path>,
    overrides: Option<&FormatterConfig>,
) -> Result<FormatterConfig, ConfigError> {
    let user_config = directories::ProjectDirs::from("dev", "indurag", "indurag")
        .map(|dirs| dirs.config_dir().join("config.toml"));
    load_layers(user_config.as_deref(), workspace, overrides)
}

fn load_layers(
    user_config: Option<&Path>,
    workspace: Option<&Path>,
    overrides: Option<&FormatterConfig>,
) -> Result<FormatterConfig, ConfigError> {
    let mut figment = Figment::from(Serialized::defaults(FormatterConfig::default()));

    if let Some(user_config) = user_config.filter(|p| p.exists()) {
        figment = figment.merge(Toml::file(user_config));
    }

    if let Some(ws) = workspace {
        let ws_config = ws.join(".indurag").join("config.toml");
        if ws_config.exists() {
            figment = figment.merge(Toml::file(&ws_config));
        }
    }

    figment = figment.merge(Env::prefixed("INDURAG_").split("__"));
    figment = figment.merge(legacy_env());
    if let Some(enabled) = legacy_use_ollama() {
        figment = figment.merge(Serialized::default("local.enabled", enabled));
    }

    if let Some(overrides) = overrides {
        figment = figment.merge(Serialized::defaults(overrides));
    }

    Ok(figment.extract()?)
}

/// `USE_OLLAMA` turns the local backend on only when it reads `true`, in any
/// case. Every other value turns it off.
fn legacy_use_ollama() -> Option<bool> {
    std::env::var("USE_OLLAMA")
        .ok()
        .map(|value| value.trim().eq_ignore_ascii_case("true"))
}

fn legacy_env() -> Env {
    Env::raw()
        .only(&["OLLAMA_MODEL", "OLLAMA_URL"])
        .map(|key| match key.as_str().to_ascii_uppercase().as_str() {
            "OLLAMA_MODEL" => "local.model".into(),
            _ => "local.base_url".into(),
        })
}
