//! File and environment configuration for a provider-backed engine.
//!
//! ```yaml
//! engine:
//!   model: gpt-4.1-mini
//!   max_retries: 5
//!   preface: "You are assisting a data-entry workflow.\n"
//! provider:
//!   type: openai
//!   base_url: https://api.openai.com/v1
//! timeout: 30s
//! ```

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use surety_core::{Engine, EngineConfig};

use crate::providers::{CompletionConfig, ProviderRegistry};
use crate::transport::ProviderTransport;
use crate::RuntimeError;

/// Overrides `engine.model`.
pub const MODEL_ENV: &str = "SURETY_MODEL";

/// Overrides `engine.max_retries`.
pub const MAX_RETRIES_ENV: &str = "SURETY_MAX_RETRIES";

/// Model used when neither the file nor the environment names one.
pub const DEFAULT_MODEL: &str = "gpt-4.1-mini";

/// Which provider to build, plus its own settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Registry key, e.g. `openai`
    #[serde(rename = "type", default = "default_provider_type")]
    pub kind: String,

    /// Everything else, handed to the provider factory as JSON
    #[serde(flatten)]
    pub settings: Map<String, JsonValue>,
}

fn default_provider_type() -> String {
    "openai".to_string()
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            kind: default_provider_type(),
            settings: Map::new(),
        }
    }
}

impl ProviderConfig {
    /// Settings as the JSON object factories consume.
    pub fn settings_json(&self) -> JsonValue {
        JsonValue::Object(self.settings.clone())
    }
}

/// Engine defaults, provider selection and request limits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    pub engine: EngineConfig,

    pub provider: ProviderConfig,

    /// Per-request timeout, e.g. `"30s"` or `"1m 30s"`
    #[serde(with = "humantime_duration")]
    pub timeout: Duration,

    /// Upper bound on generated tokens per attempt
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_output_tokens: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

mod humantime_duration {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.collect_str(&humantime::format_duration(*duration))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let text = String::deserialize(deserializer)?;
        humantime::parse_duration(&text).map_err(serde::de::Error::custom)
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            engine: EngineConfig::new(DEFAULT_MODEL),
            provider: ProviderConfig::default(),
            timeout: Duration::from_secs(30),
            max_output_tokens: None,
            temperature: None,
        }
    }
}

impl RuntimeConfig {
    pub fn from_yaml(text: &str) -> Result<Self, RuntimeError> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn from_json(text: &str) -> Result<Self, RuntimeError> {
        Ok(serde_json::from_str(text)?)
    }

    /// Load a `.json` file as JSON and anything else as YAML.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, RuntimeError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = match path.extension().and_then(|e| e.to_str()) {
            Some("json") => Self::from_json(&text)?,
            _ => Self::from_yaml(&text)?,
        };
        tracing::debug!(path = %path.display(), provider = %config.provider.kind, "Loaded config");
        Ok(config)
    }

    /// Apply `SURETY_MODEL` and `SURETY_MAX_RETRIES` from the process
    /// environment.
    pub fn apply_env_overrides(&mut self) -> Result<(), RuntimeError> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), RuntimeError> {
        if let Some(model) = lookup(MODEL_ENV).filter(|m| !m.trim().is_empty()) {
            self.engine.model = model.trim().to_string();
        }
        if let Some(raw) = lookup(MAX_RETRIES_ENV) {
            self.engine.max_retries =
                raw.trim()
                    .parse()
                    .map_err(|_| RuntimeError::InvalidSetting {
                        key: MAX_RETRIES_ENV,
                        value: raw.clone(),
                    })?;
        }
        Ok(())
    }

    /// Check engine invariants and that the timeout is non-zero.
    pub fn validate(&self) -> Result<(), RuntimeError> {
        self.engine.validate()?;
        if self.timeout.is_zero() {
            return Err(RuntimeError::InvalidSetting {
                key: "timeout",
                value: humantime::format_duration(self.timeout).to_string(),
            });
        }
        Ok(())
    }

    /// Request settings for every dispatch. The model is replaced per call.
    pub fn completion_config(&self) -> CompletionConfig {
        CompletionConfig {
            model: self.engine.model.clone(),
            max_output_tokens: self.max_output_tokens,
            temperature: self.temperature,
            timeout: self.timeout,
        }
    }

    /// Build the configured provider and wrap it in an engine.
    pub fn build_engine(
        &self,
        registry: &ProviderRegistry,
    ) -> Result<Engine<ProviderTransport>, RuntimeError> {
        self.validate()?;

        let settings = self.provider.settings_json();
        registry.validate(&self.provider.kind, &settings)?;
        let provider = registry.create(&self.provider.kind, &settings)?;

        let transport = ProviderTransport::new(Arc::clone(&provider), self.completion_config())?;
        Ok(Engine::new(transport, self.engine.clone())?)
    }
}
