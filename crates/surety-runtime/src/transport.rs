//! Blocking bridge from an async [`LlmProvider`] to the engine's
//! [`Transport`].

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use surety_core::Transport;
use tokio::runtime::{Builder, Handle, Runtime};
use tracing::debug;

use crate::providers::{ChatMessage, CompletionConfig, LlmProvider, ProviderError, TokenUsage};

/// Runs each dispatch on a private single-threaded tokio runtime.
///
/// The engine passes the model per call; it replaces
/// [`CompletionConfig::model`] while the rest of the config (timeout, token
/// limit, temperature) applies to every request. Token usage is summed over
/// the transport's lifetime.
///
/// Must not be used from inside another tokio runtime: `send` returns
/// [`ProviderError::Runtime`] there instead of blocking the executor.
pub struct ProviderTransport {
    provider: Arc<dyn LlmProvider>,
    config: CompletionConfig,
    runtime: Runtime,
    usage: Mutex<TokenUsage>,
}

impl ProviderTransport {
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        config: CompletionConfig,
    ) -> Result<Self, ProviderError> {
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(|e| ProviderError::Runtime(e.to_string()))?;

        Ok(Self {
            provider,
            config,
            runtime,
            usage: Mutex::new(TokenUsage::default()),
        })
    }

    pub fn provider(&self) -> &Arc<dyn LlmProvider> {
        &self.provider
    }

    pub fn completion_config(&self) -> &CompletionConfig {
        &self.config
    }

    /// Tokens used by every successful dispatch so far.
    pub fn usage(&self) -> TokenUsage {
        *self.usage.lock()
    }
}

impl fmt::Debug for ProviderTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderTransport")
            .field("provider", &self.provider.name())
            .field("config", &self.config)
            .field("usage", &self.usage())
            .finish()
    }
}

impl Transport for ProviderTransport {
    type Error = ProviderError;

    fn send(&self, model: &str, prompt: &str) -> Result<String, ProviderError> {
        if Handle::try_current().is_ok() {
            return Err(ProviderError::Runtime(
                "cannot block inside an async context; call from a blocking thread".to_string(),
            ));
        }

        let config = CompletionConfig {
            model: model.to_string(),
            ..self.config.clone()
        };
        let messages = vec![ChatMessage::user(prompt)];

        let response = self
            .runtime
            .block_on(self.provider.complete(messages, &config))?;

        self.usage.lock().accumulate(&response.usage);
        debug!(
            provider = self.provider.name(),
            model = %response.model,
            response_id = response.response_id.as_deref().unwrap_or("-"),
            prompt_tokens = response.usage.prompt_tokens,
            completion_tokens = response.usage.completion_tokens,
            "Completion received"
        );

        Ok(response.content)
    }
}
