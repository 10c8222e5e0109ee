//! # surety-runtime
//!
//! Real transports for the `surety-core` assurance engine.
//!
//! `surety-core` never touches the network. This crate supplies:
//!
//! - [`providers`]: the async [`LlmProvider`] trait, the OpenAI Responses API
//!   provider, credential handling and a registry keyed by provider type
//! - [`ProviderTransport`]: a blocking [`surety_core::Transport`] over any
//!   provider
//! - [`RuntimeConfig`]: YAML/JSON configuration with environment overrides
//!
//! ## Example
//!
//! ```rust,ignore
//! use surety_core::parse_integer;
//! use surety_runtime::{ProviderRegistry, RuntimeConfig};
//!
//! let mut config = RuntimeConfig::from_file("surety.yaml")?;
//! config.apply_env_overrides()?;
//! let engine = config.build_engine(&ProviderRegistry::with_defaults())?;
//!
//! let moons: i64 = engine.ensure("How many moons does Mars have?", &parse_integer)?;
//! ```

use thiserror::Error;

pub mod config;
pub mod providers;
mod transport;

pub use config::{ProviderConfig, RuntimeConfig, DEFAULT_MODEL, MAX_RETRIES_ENV, MODEL_ENV};
pub use providers::{
    ChatMessage, CompletionConfig, CompletionResponse, LlmProvider, ProviderError,
    ProviderFactory, ProviderRegistry, TokenUsage,
};
pub use transport::ProviderTransport;

#[cfg(feature = "openai")]
pub use providers::{OpenAiProvider, OpenAiProviderFactory};

/// Errors from loading configuration and assembling an engine.
#[derive(Error, Debug)]
pub enum RuntimeError {
    #[error("invalid engine configuration: {0}")]
    Config(#[from] surety_core::ConfigError),

    #[error("provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid YAML config: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid JSON config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid value for {key}: {value:?}")]
    InvalidSetting { key: &'static str, value: String },
}
