//! Failure signals produced by parsers and the assurance engine.

use thiserror::Error;

use crate::attempts::AttemptLog;

/// A parser rejected a response.
///
/// This is the only way a parser may fail. The engine catches it, reports
/// the invalid response, and moves on to the next attempt; it never reaches
/// the caller of [`Engine::ensure`](crate::Engine::ensure).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("could not parse response: {response:?}")]
pub struct ParseFailed {
    response: String,
}

impl ParseFailed {
    /// Create a failure for the given raw response.
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            response: response.into(),
        }
    }

    /// The raw response text the parser rejected.
    pub fn response(&self) -> &str {
        &self.response
    }
}

/// Terminal outcomes of an `ensure` call other than success.
///
/// `E` is the transport's own error type. Transport failures are passed
/// through untouched in [`EnsureError::Transport`].
#[derive(Error, Debug)]
pub enum EnsureError<E: std::error::Error + 'static> {
    /// The model answered with the decline sentinel. Never retried.
    #[error("model declined to answer the prompt")]
    Declined {
        /// The fully composed prompt that was declined.
        prompt: String,
    },

    /// Every attempt produced a response the parser rejected.
    #[error("no parsable response after {max_retries} attempts")]
    RetriesExhausted {
        /// Maximum number of attempts that were allowed.
        max_retries: u32,
        /// The fully composed prompt sent on every attempt.
        prompt: String,
        /// Raw response text of each attempt, 1-indexed.
        attempts: AttemptLog,
    },

    /// The transport failed; the error is the transport's own value.
    #[error("transport failed: {0}")]
    Transport(#[source] E),

    /// The call was rejected before anything was dispatched.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
}

impl<E: std::error::Error + 'static> EnsureError<E> {
    /// The composed prompt, for declined and exhausted calls.
    pub fn prompt(&self) -> Option<&str> {
        match self {
            Self::Declined { prompt } | Self::RetriesExhausted { prompt, .. } => Some(prompt),
            _ => None,
        }
    }

    /// The attempt history of an exhausted call.
    pub fn attempts(&self) -> Option<&AttemptLog> {
        match self {
            Self::RetriesExhausted { attempts, .. } => Some(attempts),
            _ => None,
        }
    }

    /// Whether the model explicitly declined.
    pub fn is_declined(&self) -> bool {
        matches!(self, Self::Declined { .. })
    }

    /// Whether all attempts were used up without a parsable answer.
    pub fn is_exhausted(&self) -> bool {
        matches!(self, Self::RetriesExhausted { .. })
    }

    /// The transport error, if the call failed in transport.
    pub fn transport_error(&self) -> Option<&E> {
        match self {
            Self::Transport(err) => Some(err),
            _ => None,
        }
    }
}

/// Invalid engine configuration.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("model identifier must not be empty")]
    MissingModel,

    #[error("max_retries must be at least 1, got {0}")]
    InvalidMaxRetries(u32),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Error, Debug)]
    #[error("connection reset")]
    struct ConnectionReset;

    #[test]
    fn test_parse_failed_keeps_original_text() {
        let err = ParseFailed::new("  not a number \n");
        assert_eq!(err.response(), "  not a number \n");
        assert!(err.to_string().contains("not a number"));
    }

    #[test]
    fn test_declined_exposes_prompt() {
        let err: EnsureError<ConnectionReset> = EnsureError::Declined {
            prompt: "What is the airspeed of a swallow?".to_string(),
        };
        assert!(err.is_declined());
        assert!(!err.is_exhausted());
        assert_eq!(err.prompt(), Some("What is the airspeed of a swallow?"));
        assert!(err.attempts().is_none());
    }

    #[test]
    fn test_transport_error_is_source() {
        use std::error::Error as _;

        let err: EnsureError<ConnectionReset> = EnsureError::Transport(ConnectionReset);
        assert!(err.transport_error().is_some());
        assert!(err.prompt().is_none());
        assert_eq!(err.source().map(|s| s.to_string()), Some("connection reset".to_string()));
    }

    #[test]
    fn test_config_error_messages() {
        assert!(ConfigError::InvalidMaxRetries(0).to_string().contains("at least 1"));
        assert!(ConfigError::MissingModel.to_string().contains("model"));
    }
}
