//! Parser restricted to a fixed set of answers.

use std::collections::BTreeSet;

use super::Parser;
use crate::error::ParseFailed;

/// Accepts a response only if, once trimmed, it exactly matches one of the
/// allowed choices. Matching is case-sensitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringChoiceParser {
    choices: BTreeSet<String>,
}

impl StringChoiceParser {
    /// Create a parser from the allowed choices.
    pub fn new<I, S>(choices: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            choices: choices.into_iter().map(Into::into).collect(),
        }
    }

    /// The allowed choices, in sorted order.
    pub fn choices(&self) -> &BTreeSet<String> {
        &self.choices
    }
}

impl Parser for StringChoiceParser {
    type Output = String;

    fn parse(&self, response: &str) -> Result<String, ParseFailed> {
        let normalized = response.trim();
        if self.choices.contains(normalized) {
            Ok(normalized.to_string())
        } else {
            Err(ParseFailed::new(response))
        }
    }
}
