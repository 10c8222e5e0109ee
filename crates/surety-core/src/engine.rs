//! The assurance loop.
//!
//! [`Engine::ensure`] sends a prompt, classifies the response, and retries
//! until the parser accepts an answer, the model declines, or the retry
//! budget runs out.
//!
//! # Execution Flow
//! 1. Resolve per-call overrides against the engine defaults
//! 2. Compose `preface + body (+ decline instruction)`
//! 3. For each attempt: dispatch, record, check for a decline, parse
//! 4. Return the first parsed value, or a terminal [`EnsureError`]

use std::fmt;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::attempts::AttemptLog;
use crate::error::{ConfigError, EnsureError};
use crate::parsers::Parser;
use crate::prompt::{compose_prompt, is_decline};
use crate::transport::{Reporter, TracingReporter, Transport};

/// Attempts per call when not configured otherwise.
pub const DEFAULT_MAX_RETRIES: u32 = 10;

/// Engine-wide defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Model identifier passed to the transport on every dispatch
    pub model: String,

    /// Text placed before every prompt body
    pub preface: String,

    /// Attempts per call (at least 1)
    pub max_retries: u32,

    /// Whether the model may answer with the decline sentinel
    pub allow_decline: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            model: String::new(),
            preface: String::new(),
            max_retries: DEFAULT_MAX_RETRIES,
            allow_decline: true,
        }
    }
}

impl EngineConfig {
    /// Create a config for the given model with default settings.
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            ..Default::default()
        }
    }

    /// Check the invariants an engine relies on.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model.trim().is_empty() {
            return Err(ConfigError::MissingModel);
        }
        if self.max_retries == 0 {
            return Err(ConfigError::InvalidMaxRetries(self.max_retries));
        }
        Ok(())
    }
}

/// Per-call overrides of the engine defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnsureOptions {
    /// Overrides [`EngineConfig::max_retries`]
    pub max_retries: Option<u32>,

    /// Overrides [`EngineConfig::allow_decline`]
    pub allow_decline: Option<bool>,
}

impl EnsureOptions {
    pub const fn new() -> Self {
        Self {
            max_retries: None,
            allow_decline: None,
        }
    }

    #[must_use]
    pub const fn max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = Some(max_retries);
        self
    }

    #[must_use]
    pub const fn allow_decline(mut self, allow: bool) -> Self {
        self.allow_decline = Some(allow);
        self
    }
}

/// A successful `ensure` call with its attempt history.
#[derive(Debug, Clone, PartialEq)]
pub struct Ensured<T> {
    /// The parsed value
    pub value: T,

    /// Every raw response received, the accepted one last
    pub attempts: AttemptLog,
}

/// Drives the assurance loop over a [`Transport`].
///
/// One engine is meant to be built once and reused. Each call keeps its own
/// attempt log; only the preface carries over between calls.
pub struct Engine<T> {
    transport: T,
    config: EngineConfig,
    reporter: Box<dyn Reporter>,
}

impl<T: fmt::Debug> fmt::Debug for Engine<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Engine")
            .field("transport", &self.transport)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<T: Transport> Engine<T> {
    /// Create an engine, validating the configuration.
    pub fn new(transport: T, config: EngineConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self {
            transport,
            config,
            reporter: Box::new(TracingReporter),
        })
    }

    /// Replace the reporter that receives invalid-response notices.
    #[must_use]
    pub fn with_reporter(mut self, reporter: impl Reporter + 'static) -> Self {
        self.reporter = Box::new(reporter);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// The current preface.
    pub fn preface(&self) -> &str {
        &self.config.preface
    }

    /// Replace the preface for all future calls.
    pub fn set_preface(&mut self, preface: impl Into<String>) {
        self.config.preface = preface.into();
    }

    /// Remove the preface.
    pub fn clear_preface(&mut self) {
        self.config.preface.clear();
    }

    /// The exact prompt `ensure` would send for `body`.
    pub fn compose_prompt(&self, body: &str, allow_decline: bool) -> String {
        compose_prompt(&self.config.preface, body, allow_decline)
    }

    /// Ask until `parser` accepts an answer, using the engine defaults.
    pub fn ensure<P: Parser>(
        &self,
        prompt: &str,
        parser: &P,
    ) -> Result<P::Output, EnsureError<T::Error>> {
        self.ensure_with(prompt, parser, EnsureOptions::new())
    }

    /// Ask until `parser` accepts an answer, with per-call overrides.
    pub fn ensure_with<P: Parser>(
        &self,
        prompt: &str,
        parser: &P,
        options: EnsureOptions,
    ) -> Result<P::Output, EnsureError<T::Error>> {
        self.ensure_detailed(prompt, parser, options)
            .map(|ensured| ensured.value)
    }

    /// Like [`ensure_with`](Self::ensure_with), also returning the attempt log.
    ///
    /// # Errors
    ///
    /// - [`EnsureError::InvalidRequest`] if the body is blank or
    ///   `max_retries` is 0; nothing is dispatched.
    /// - [`EnsureError::Declined`] as soon as the model declines.
    /// - [`EnsureError::RetriesExhausted`] once every attempt failed to parse.
    /// - [`EnsureError::Transport`] on the first transport failure.
    pub fn ensure_detailed<P: Parser>(
        &self,
        prompt: &str,
        parser: &P,
        options: EnsureOptions,
    ) -> Result<Ensured<P::Output>, EnsureError<T::Error>> {
        if prompt.trim().is_empty() {
            return Err(EnsureError::InvalidRequest(
                "prompt body must not be empty".to_string(),
            ));
        }

        let allow_decline = options.allow_decline.unwrap_or(self.config.allow_decline);
        let prompt = self.compose_prompt(prompt, allow_decline);

        let max_retries = options.max_retries.unwrap_or(self.config.max_retries);
        if max_retries == 0 {
            return Err(EnsureError::InvalidRequest(
                "max_retries must be at least 1".to_string(),
            ));
        }

        let mut attempts = AttemptLog::new();

        for attempt in 1..=max_retries {
            debug!(attempt, max_retries, model = %self.config.model, "Prompt:\n{prompt}");

            let raw = self
                .transport
                .send(&self.config.model, &prompt)
                .map_err(EnsureError::Transport)?;

            debug!(attempt, max_retries, "Response:\n{raw}");
            attempts.record(raw.as_str());

            if allow_decline && is_decline(&raw) {
                debug!(attempt, "Model declined response");
                return Err(EnsureError::Declined { prompt });
            }

            match parser.parse(&raw) {
                Ok(value) => return Ok(Ensured { value, attempts }),
                Err(_) => {
                    let next = if attempt < max_retries {
                        "retrying"
                    } else {
                        "giving up"
                    };
                    self.reporter.notify(&format!(
                        "Invalid response: '{raw}'. Attempt {attempt}/{max_retries}, {next}."
                    ));
                }
            }
        }

        Err(EnsureError::RetriesExhausted {
            max_retries,
            prompt,
            attempts,
        })
    }
}

/// Builds an [`Engine`] from defaults, overriding only what is set.
///
/// Defaults: empty preface, [`DEFAULT_MAX_RETRIES`] attempts, declines
/// allowed, [`TracingReporter`].
#[derive(Default)]
pub struct EngineBuilder {
    config: EngineConfig,
    reporter: Option<Box<dyn Reporter>>,
}

impl EngineBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing configuration.
    pub fn from_config(config: EngineConfig) -> Self {
        Self {
            config,
            reporter: None,
        }
    }

    #[must_use]
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    #[must_use]
    pub fn preface(mut self, preface: impl Into<String>) -> Self {
        self.config.preface = preface.into();
        self
    }

    #[must_use]
    pub fn max_retries(mut self, max_retries: u32) -> Self {
        self.config.max_retries = max_retries;
        self
    }

    #[must_use]
    pub fn allow_decline(mut self, allow: bool) -> Self {
        self.config.allow_decline = allow;
        self
    }

    #[must_use]
    pub fn reporter(mut self, reporter: impl Reporter + 'static) -> Self {
        self.reporter = Some(Box::new(reporter));
        self
    }

    /// Build the engine over `transport`.
    pub fn build<T: Transport>(self, transport: T) -> Result<Engine<T>, ConfigError> {
        let mut engine = Engine::new(transport, self.config)?;
        if let Some(reporter) = self.reporter {
            engine.reporter = reporter;
        }
        Ok(engine)
    }
}

impl fmt::Debug for EngineBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineBuilder")
            .field("config", &self.config)
            .field("custom_reporter", &self.reporter.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::parse_integer;
    use crate::prompt::DECLINE_INSTRUCTION;
    use std::cell::Cell;

    #[derive(Debug, thiserror::Error)]
    #[error("offline")]
    struct Offline;

    /// Answers every prompt with the same text and counts dispatches.
    #[derive(Debug)]
    struct Constant {
        reply: &'static str,
        calls: Cell<u32>,
    }

    impl Constant {
        fn new(reply: &'static str) -> Self {
            Self {
                reply,
                calls: Cell::new(0),
            }
        }
    }

    impl Transport for Constant {
        type Error = Offline;

        fn send(&self, _model: &str, _prompt: &str) -> Result<String, Offline> {
            self.calls.set(self.calls.get() + 1);
            Ok(self.reply.to_string())
        }
    }

    #[test]
    fn test_config_defaults() {
        let config = EngineConfig::new("gpt-4.1-mini");
        assert_eq!(config.max_retries, 10);
        assert!(config.allow_decline);
        assert!(config.preface.is_empty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_rejects_zero_retries() {
        let config = EngineConfig {
            max_retries: 0,
            ..EngineConfig::new("m")
        };
        assert_eq!(config.validate(), Err(ConfigError::InvalidMaxRetries(0)));
    }

    #[test]
    fn test_config_rejects_blank_model() {
        assert_eq!(
            EngineConfig::new("  ").validate(),
            Err(ConfigError::MissingModel)
        );
    }

    #[test]
    fn test_config_deserializes_with_defaults() {
        let config: EngineConfig = serde_json::from_str(r#"{"model": "m"}"#).unwrap();
        assert_eq!(config, EngineConfig::new("m"));
    }

    #[test]
    fn test_builder_applies_overrides() {
        let engine = EngineBuilder::new()
            .model("m")
            .preface("Be brief.\n")
            .max_retries(3)
            .allow_decline(false)
            .build(Constant::new("1"))
            .unwrap();

        assert_eq!(engine.model(), "m");
        assert_eq!(engine.preface(), "Be brief.\n");
        assert_eq!(engine.config().max_retries, 3);
        assert!(!engine.config().allow_decline);
    }

    #[test]
    fn test_builder_without_model_fails() {
        let result = EngineBuilder::new().build(Constant::new("1"));
        assert!(matches!(result, Err(ConfigError::MissingModel)));
    }

    #[test]
    fn test_blank_prompt_dispatches_nothing() {
        let engine = Engine::new(Constant::new("1"), EngineConfig::new("m")).unwrap();
        let result = engine.ensure("   ", &parse_integer);
        assert!(matches!(result, Err(EnsureError::InvalidRequest(_))));
        assert_eq!(engine.transport().calls.get(), 0);
    }

    #[test]
    fn test_zero_retry_override_dispatches_nothing() {
        let engine = Engine::new(Constant::new("1"), EngineConfig::new("m")).unwrap();
        let result = engine.ensure_with("n?", &parse_integer, EnsureOptions::new().max_retries(0));
        assert!(matches!(result, Err(EnsureError::InvalidRequest(_))));
        assert_eq!(engine.transport().calls.get(), 0);
    }

    #[test]
    fn test_declined_text_is_parsed_when_declines_disallowed() {
        let engine = Engine::new(Constant::new("DECLINED"), EngineConfig::new("m"))
            .unwrap()
            .with_reporter(crate::NullReporter);
        let options = EnsureOptions::new().allow_decline(false).max_retries(2);

        let err = engine
            .ensure_with("n?", &parse_integer, options)
            .unwrap_err();
        assert!(err.is_exhausted());
        assert_eq!(engine.transport().calls.get(), 2);
    }

    #[test]
    fn test_compose_prompt_respects_preface() {
        let mut engine = Engine::new(Constant::new("1"), EngineConfig::new("m")).unwrap();
        engine.set_preface("Context.\n");
        assert_eq!(
            engine.compose_prompt("Q?", true),
            format!("Context.\nQ?\n{DECLINE_INSTRUCTION}")
        );
        engine.clear_preface();
        assert_eq!(engine.compose_prompt("Q?", false), "Q?");
    }

    #[test]
    fn test_debug_hides_reporter() {
        let engine = Engine::new(Constant::new("1"), EngineConfig::new("m")).unwrap();
        let debug = format!("{engine:?}");
        assert!(debug.contains("Engine"));
        assert!(debug.contains("max_retries"));
    }
}
