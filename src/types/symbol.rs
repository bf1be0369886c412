use serde::{Deserialize, Serialize};
use std::fmt;

/// Longest ticker accepted at the API boundary.
pub const MAX_SYMBOL_LEN: usize = 5;

/// A validated stock ticker.
///
/// Only ASCII letters are accepted, at most five of them. The stored form is
/// upper-case so that `aapl` and `AAPL` resolve to the same cache entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Symbol(String);

impl Symbol {
    /// Validate a raw path segment.
    pub fn parse(raw: &str) -> Option<Self> {
        if raw.is_empty() || raw.len() > MAX_SYMBOL_LEN {
            return None;
        }
        if !raw.chars().all(|c| c.is_ascii_alphabetic()) {
            return None;
        }
        Some(Self(raw.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Symbol {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_symbols() {
        assert_eq!(Symbol::parse("AAPL").unwrap().as_str(), "AAPL");
        assert_eq!(Symbol::parse("f").unwrap().as_str(), "F");
        assert_eq!(Symbol::parse("googl").unwrap().as_str(), "GOOGL");
    }

    #[test]
    fn test_parse_rejects_digits() {
        assert!(Symbol::parse("AB1").is_none());
        assert!(Symbol::parse("123").is_none());
    }

    #[test]
    fn test_parse_rejects_long_and_empty() {
        assert!(Symbol::parse("TOOLONG").is_none());
        assert!(Symbol::parse("ABCDEF").is_none());
        assert!(Symbol::parse("").is_none());
    }

    #[test]
    fn test_parse_rejects_punctuation_and_unicode() {
        assert!(Symbol::parse("BRK.B").is_none());
        assert!(Symbol::parse("A-B").is_none());
        assert!(Symbol::parse("ÄPL").is_none());
    }

    #[test]
    fn test_symbol_display_and_serialize() {
        let symbol = Symbol::parse("msft").unwrap();
        assert_eq!(symbol.to_string(), "MSFT");
        assert_eq!(serde_json::to_string(&symbol).unwrap(), "\"MSFT\"");
    }
}
