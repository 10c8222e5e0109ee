//! # surety-core
//!
//! Turns free-text language model answers into typed values.
//!
//! The [`Engine`] sends a prompt through a [`Transport`], hands each raw
//! response to a [`Parser`], and retries a bounded number of times until
//! the parser accepts one. The model may also be allowed to decline, in which
//! case the call stops immediately.
//!
//! ## Key Guarantees
//!
//! 1. **Bounded**: at most `max_retries` dispatches per call
//! 2. **Sequential**: attempt N+1 starts only after attempt N is classified
//! 3. **Traceable**: exhausted calls return every raw response, 1-indexed
//! 4. **No I/O here**: the network lives behind [`Transport`]
//!
//! ## Example
//!
//! ```rust,ignore
//! use surety_core::{parsers::parse_integer, EngineBuilder, EnsureError};
//!
//! let engine = EngineBuilder::new().model("gpt-4.1-mini").build(transport)?;
//!
//! match engine.ensure("How many legs does a spider have?", &parse_integer) {
//!     Ok(legs) => println!("{legs}"),
//!     Err(EnsureError::Declined { .. }) => println!("model does not know"),
//!     Err(EnsureError::RetriesExhausted { attempts, .. }) => {
//!         for (attempt, raw) in attempts.iter() {
//!             println!("{attempt}: {raw}");
//!         }
//!     }
//!     Err(err) => return Err(err.into()),
//! }
//! ```

pub mod attempts;
pub mod engine;
pub mod error;
pub mod parsers;
pub mod prompt;
pub mod transport;

// Re-export main types at crate root
pub use attempts::AttemptLog;
pub use engine::{
    Engine, EngineBuilder, EngineConfig, EnsureOptions, Ensured, DEFAULT_MAX_RETRIES,
};
pub use error::{ConfigError, EnsureError, ParseFailed};
pub use parsers::{
    parse_boolean, parse_float, parse_integer, parse_number, parse_string, Parser,
    StringChoiceParser, StringListParser,
};
pub use prompt::{compose_prompt, is_decline, DECLINE_INSTRUCTION};
pub use transport::{NullReporter, Reporter, TracingReporter, Transport};
