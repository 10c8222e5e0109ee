//! Parsers turn raw response text into typed values.
//!
//! Any `Fn(&str) -> Result<T, ParseFailed>` is a [`Parser`], so the scalar
//! parsers are plain functions. Parsers that need configuration are structs.
//!
//! | parser                 | output        | accepts                                 |
//! |------------------------|---------------|-----------------------------------------|
//! | [`parse_boolean`]      | `bool`        | `true`/`yes`/`false`/`no`, any case     |
//! | [`parse_integer`]      | `i64`         | Rust integer literal                    |
//! | [`parse_number`]       | any `FromStr` | that type's literal syntax              |
//! | [`parse_float`]        | `f64`         | Rust float literal                      |
//! | [`parse_string`]       | `String`      | anything                                |
//! | [`StringChoiceParser`] | `String`      | one of a fixed set, case-sensitive      |
//! | [`StringListParser`]   | `Vec<String>` | separated items, blanks dropped         |
//!
//! All of them trim surrounding whitespace first.

mod choice;
mod list;
mod scalar;

pub use choice::StringChoiceParser;
pub use list::{StringListParser, DEFAULT_SEPARATOR};
pub use scalar::{parse_boolean, parse_float, parse_integer, parse_number, parse_string};

use crate::error::ParseFailed;

/// Converts a raw model response into a value.
///
/// Implementations must be pure: the same input always gives the same
/// result, and the only failure is [`ParseFailed`].
pub trait Parser {
    /// The value produced on success.
    type Output;

    /// Parse a raw response.
    fn parse(&self, response: &str) -> Result<Self::Output, ParseFailed>;
}

impl<T, F> Parser for F
where
    F: Fn(&str) -> Result<T, ParseFailed>,
{
    type Output = T;

    fn parse(&self, response: &str) -> Result<T, ParseFailed> {
        self(response)
    }
}
