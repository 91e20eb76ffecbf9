//! Orchestrator configuration.
//!
//! Settings are layered: built-in defaults, then an optional user config
//! file at `<config_dir>/examforge/config.toml`, then an optional
//! `examforge.toml` in the working directory, then `EXAMFORGE_*`
//! environment variables. Every field has a default, so an empty
//! environment yields a working local setup.

use examforge_core::ProviderKind;
use examforge_error::ConfigError;
use examforge_rate_limit::RateLimitConfig;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

fn default_proxy_base_url() -> String {
    "http://localhost:5000/api".to_string()
}

fn default_fast_base_url() -> String {
    "https://api.groq.com/openai/v1/chat/completions".to_string()
}

fn default_fast_api_key_env() -> String {
    "GROQ_API_KEY".to_string()
}

fn default_local_base_url() -> String {
    "http://localhost:11434/v1/chat/completions".to_string()
}

fn default_primary_model() -> String {
    "gemini-flash-lite-latest".to_string()
}

fn default_secondary_model() -> String {
    "llama-3.3-70b-versatile".to_string()
}

fn default_local_model() -> String {
    "llama3".to_string()
}

fn default_deep_model() -> String {
    "gemini-2.5-pro".to_string()
}

fn default_batch_size() -> usize {
    5
}

fn default_backoff_ms() -> u64 {
    4500
}

/// Settings for one provider slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderSettings {
    /// Model identifier sent to the provider
    pub model: String,
    /// Rate limit settings for this slot
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
}

impl ProviderSettings {
    fn new(model: String) -> Self {
        Self {
            model,
            rate_limit: RateLimitConfig::default(),
        }
    }
}

/// Per-slot provider settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvidersConfig {
    /// Default proxy-served model
    pub primary: ProviderSettings,
    /// Fast cloud fallback
    pub secondary: ProviderSettings,
    /// Local/offline server
    pub local: ProviderSettings,
    /// Extended-reasoning proxy slot
    pub deep_reasoning: ProviderSettings,
}

impl Default for ProvidersConfig {
    fn default() -> Self {
        Self {
            primary: ProviderSettings::new(default_primary_model()),
            secondary: ProviderSettings::new(default_secondary_model()),
            local: ProviderSettings::new(default_local_model()),
            deep_reasoning: ProviderSettings::new(default_deep_model()),
        }
    }
}

/// Progressive fetch settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchSettings {
    /// Items requested per provider call
    pub batch_size: usize,
    /// Pause between consecutive batch rounds, in milliseconds
    pub backoff_ms: u64,
}

impl Default for BatchSettings {
    fn default() -> Self {
        Self {
            batch_size: default_batch_size(),
            backoff_ms: default_backoff_ms(),
        }
    }
}

impl BatchSettings {
    /// Inter-round pause as a [`Duration`].
    pub fn backoff(&self) -> Duration {
        Duration::from_millis(self.backoff_ms)
    }
}

/// Top-level orchestrator configuration.
///
/// # Examples
///
/// ```
/// use examforge::OrchestratorConfig;
///
/// let config = OrchestratorConfig::default();
/// assert_eq!(config.batch.batch_size, 5);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Provider tried first when a request names none
    pub preferred_provider: ProviderKind,
    /// Base URL of the generation proxy
    pub proxy_base_url: String,
    /// Chat-completions URL of the fast cloud provider
    pub fast_base_url: String,
    /// Environment variable holding the fast provider's API key
    pub fast_api_key_env: String,
    /// Chat-completions URL of the local server
    pub local_base_url: String,
    /// Per-slot provider settings
    pub providers: ProvidersConfig,
    /// Progressive fetch settings
    pub batch: BatchSettings,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            preferred_provider: ProviderKind::Primary,
            proxy_base_url: default_proxy_base_url(),
            fast_base_url: default_fast_base_url(),
            fast_api_key_env: default_fast_api_key_env(),
            local_base_url: default_local_base_url(),
            providers: ProvidersConfig::default(),
            batch: BatchSettings::default(),
        }
    }
}

impl OrchestratorConfig {
    /// Load configuration from files and the environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when a source is present but malformed.
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = config::Config::builder();

        if let Some(dir) = dirs::config_dir() {
            let user_file = dir.join("examforge").join("config.toml");
            builder = builder.add_source(config::File::from(user_file).required(false));
        }

        let settings = builder
            .add_source(config::File::with_name("examforge").required(false))
            .add_source(config::Environment::with_prefix("EXAMFORGE").separator("__"))
            .build()
            .map_err(|e| ConfigError::new(e.to_string()))?;

        let config: Self = settings
            .try_deserialize()
            .map_err(|e| ConfigError::new(e.to_string()))?;
        debug!(preferred = %config.preferred_provider, "Loaded orchestrator configuration");
        Ok(config)
    }

    /// Settings for the given provider slot.
    pub fn provider(&self, kind: ProviderKind) -> &ProviderSettings {
        match kind {
            ProviderKind::Primary => &self.providers.primary,
            ProviderKind::Secondary => &self.providers.secondary,
            ProviderKind::Local => &self.providers.local,
            ProviderKind::DeepReasoning => &self.providers.deep_reasoning,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_every_slot() {
        let config = OrchestratorConfig::default();
        for kind in examforge_core::ProviderKind::all() {
            assert!(!config.provider(kind).model.is_empty());
        }
        assert_eq!(config.batch.backoff(), Duration::from_millis(4500));
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let toml = r#"
            preferred_provider = "secondary"

            [providers.secondary]
            model = "mixtral-8x7b"
        "#;
        let config: OrchestratorConfig = toml_from_str(toml);
        assert_eq!(config.preferred_provider, ProviderKind::Secondary);
        assert_eq!(config.providers.secondary.model, "mixtral-8x7b");
        assert_eq!(config.providers.primary.model, "gemini-flash-lite-latest");
    }

    fn toml_from_str(raw: &str) -> OrchestratorConfig {
        config::Config::builder()
            .add_source(config::File::from_str(raw, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap()
    }
}
