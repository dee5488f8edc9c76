//! Collector authentication header parsing.
//!
//! The header string is a comma-separated list of `key:value` pairs. The
//! first colon splits key from value, so values may themselves contain
//! colons. No escaping is supported.

use std::collections::BTreeMap;
use thiserror::Error;

/// Errors produced while parsing a header string.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderParseError {
    /// The header string is empty or only whitespace.
    #[error("header string is empty")]
    Empty,

    /// A pair has no `:` separator.
    #[error("header pair {0:?} is missing a ':' separator")]
    MissingSeparator(String),

    /// A pair has nothing before the `:`.
    #[error("header pair {0:?} has an empty key")]
    EmptyKey(String),
}

/// Parse a `key:value,key:value` header string into an ordered map.
///
/// Empty segments (e.g. from a trailing comma) are skipped. Keys and values
/// are trimmed. A later duplicate key overwrites an earlier one.
pub fn parse_headers(raw: &str) -> Result<BTreeMap<String, String>, HeaderParseError> {
    if raw.trim().is_empty() {
        return Err(HeaderParseError::Empty);
    }

    let mut headers = BTreeMap::new();
    for pair in raw.split(',') {
        let pair = pair.trim();
        if pair.is_empty() {
            continue;
        }

        let (key, value) = pair
            .split_once(':')
            .ok_or_else(|| HeaderParseError::MissingSeparator(pair.to_string()))?;

        let key = key.trim();
        if key.is_empty() {
            return Err(HeaderParseError::EmptyKey(pair.to_string()));
        }

        headers.insert(key.to_string(), value.trim().to_string());
    }

    if headers.is_empty() {
        return Err(HeaderParseError::Empty);
    }

    Ok(headers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_pair() {
        let headers = parse_headers("api-key:abc123").unwrap();
        assert_eq!(headers.len(), 1);
        assert_eq!(headers.get("api-key").map(String::as_str), Some("abc123"));
    }

    #[test]
    fn test_multiple_pairs_and_whitespace() {
        let headers = parse_headers(" api-key : abc123 , x-team:core ,").unwrap();
        assert_eq!(headers.len(), 2);
        assert_eq!(headers["api-key"], "abc123");
        assert_eq!(headers["x-team"], "core");
    }

    #[test]
    fn test_first_colon_splits() {
        let headers = parse_headers("authorization:Basic dXNlcjpwYXNz:extra").unwrap();
        assert_eq!(headers["authorization"], "Basic dXNlcjpwYXNz:extra");
    }

    #[test]
    fn test_empty_value_allowed() {
        let headers = parse_headers("x-flag:").unwrap();
        assert_eq!(headers["x-flag"], "");
    }

    #[test]
    fn test_empty_input_rejected() {
        assert_eq!(parse_headers(""), Err(HeaderParseError::Empty));
        assert_eq!(parse_headers("  "), Err(HeaderParseError::Empty));
        assert_eq!(parse_headers(",,"), Err(HeaderParseError::Empty));
    }

    #[test]
    fn test_malformed_pairs_rejected() {
        assert_eq!(
            parse_headers("api-key:abc,broken"),
            Err(HeaderParseError::MissingSeparator("broken".to_string()))
        );
        assert_eq!(
            parse_headers(":value"),
            Err(HeaderParseError::EmptyKey(":value".to_string()))
        );
    }
}
