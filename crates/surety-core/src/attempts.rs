//! Per-call record of raw model responses.

use serde::{Deserialize, Serialize};

/// Raw responses received during one `ensure` call, keyed by attempt number.
///
/// Attempt numbers start at 1 and are contiguous. Entries are only ever
/// appended, and responses are stored exactly as the transport returned them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttemptLog {
    responses: Vec<String>,
}

impl AttemptLog {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the response for the next attempt and return its attempt number.
    pub(crate) fn record(&mut self, response: impl Into<String>) -> u32 {
        self.responses.push(response.into());
        self.len()
    }

    /// Number of recorded attempts.
    pub fn len(&self) -> u32 {
        u32::try_from(self.responses.len()).unwrap_or(u32::MAX)
    }

    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }

    /// Raw response of the given 1-based attempt.
    pub fn get(&self, attempt: u32) -> Option<&str> {
        let index = usize::try_from(attempt.checked_sub(1)?).ok()?;
        self.responses.get(index).map(String::as_str)
    }

    /// Response of the most recent attempt.
    pub fn last(&self) -> Option<&str> {
        self.responses.last().map(String::as_str)
    }

    /// Iterate `(attempt, response)` pairs in attempt order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, &str)> + '_ {
        (1u32..).zip(self.responses.iter().map(String::as_str))
    }

    /// Raw responses in attempt order (index 0 is attempt 1).
    pub fn responses(&self) -> &[String] {
        &self.responses
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attempts_are_one_indexed() {
        let mut log = AttemptLog::new();
        assert!(log.is_empty());

        assert_eq!(log.record("first"), 1);
        assert_eq!(log.record(" second\n"), 2);

        assert_eq!(log.len(), 2);
        assert_eq!(log.get(0), None);
        assert_eq!(log.get(1), Some("first"));
        assert_eq!(log.get(2), Some(" second\n"));
        assert_eq!(log.get(3), None);
        assert_eq!(log.last(), Some(" second\n"));
    }

    #[test]
    fn test_iter_yields_contiguous_attempts() {
        let mut log = AttemptLog::new();
        log.record("a");
        log.record("b");
        log.record("c");

        let pairs: Vec<(u32, &str)> = log.iter().collect();
        assert_eq!(pairs, vec![(1, "a"), (2, "b"), (3, "c")]);
    }

    #[test]
    fn test_serializes_as_plain_list() {
        let mut log = AttemptLog::new();
        log.record("maybe");
        log.record("perhaps");

        let json = serde_json::to_string(&log).unwrap();
        assert_eq!(json, r#"["maybe","perhaps"]"#);
    }
}
