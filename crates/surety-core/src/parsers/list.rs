//! Parser for separated lists of items.

use super::Parser;
use crate::error::ParseFailed;

/// Default item separator.
pub const DEFAULT_SEPARATOR: &str = ",";

/// Splits a response on a separator, trims each item and drops blank ones.
///
/// A response with no items fails unless `allow_empty` is set, in which case
/// it parses to an empty list. An empty separator treats the whole response
/// as a single item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StringListParser {
    separator: String,
    allow_empty: bool,
}

impl Default for StringListParser {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR.to_string(),
            allow_empty: false,
        }
    }
}

impl StringListParser {
    /// Comma-separated, at least one item required.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a different separator.
    #[must_use]
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Accept responses that contain no items.
    #[must_use]
    pub fn allow_empty(mut self, allow: bool) -> Self {
        self.allow_empty = allow;
        self
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    pub fn allows_empty(&self) -> bool {
        self.allow_empty
    }

    fn segments<'a>(&'a self, response: &'a str) -> Box<dyn Iterator<Item = &'a str> + 'a> {
        if self.separator.is_empty() {
            Box::new(std::iter::once(response))
        } else {
            Box::new(response.split(self.separator.as_str()))
        }
    }
}

impl Parser for StringListParser {
    type Output = Vec<String>;

    fn parse(&self, response: &str) -> Result<Vec<String>, ParseFailed> {
        let items: Vec<String> = self
            .segments(response)
            .map(str::trim)
            .filter(|item| !item.is_empty())
            .map(str::to_string)
            .collect();

        if items.is_empty() && !self.allow_empty {
            return Err(ParseFailed::new(response));
        }

        Ok(items)
    }
}
