//! Declarative content checks evaluated against a fetched response body.
//!
//! HTML inspection is deliberately regex-based rather than a structural
//! parse: the checks only test for marker presence, so a full HTML parser
//! would be disproportionate. Nested or malformed markup can therefore
//! produce false positives or negatives.

use regex::{escape, Regex};
use serde::{Deserialize, Serialize};

/// One predicate over a fetched response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", tag = "kind", content = "value")]
pub enum Check {
    /// The first `<title>` tag's text contains the substring.
    /// Tag matching is case-insensitive, the substring comparison is not.
    Title(String),
    /// The raw body contains the substring (case-sensitive).
    Content(String),
    /// The body carries the token as a class, an id, or a tag name.
    Element(String),
    /// The body parses as a JSON object with the named top-level key.
    Json(String),
}

impl Check {
    pub fn title(expected: impl Into<String>) -> Self {
        Self::Title(expected.into())
    }

    pub fn content(expected: impl Into<String>) -> Self {
        Self::Content(expected.into())
    }

    pub fn element(token: impl Into<String>) -> Self {
        Self::Element(token.into())
    }

    pub fn json(key: impl Into<String>) -> Self {
        Self::Json(key.into())
    }

    /// Evaluate this check against a response body. Pure; never panics.
    pub fn evaluate(&self, body: &str) -> bool {
        match self {
            Self::Title(expected) => title_contains(body, expected),
            Self::Content(expected) => body.contains(expected.as_str()),
            Self::Element(token) => element_present(body, token),
            Self::Json(key) => json_key_present(body, key),
        }
    }

    /// Short human-readable description used in report lines.
    pub fn describe(&self) -> String {
        match self {
            Self::Title(expected) => format!("title contains \"{}\"", expected),
            Self::Content(expected) => format!("content contains \"{}\"", expected),
            Self::Element(token) => format!("element \"{}\"", token),
            Self::Json(key) => format!("json key \"{}\"", key),
        }
    }
}

fn title_contains(body: &str, expected: &str) -> bool {
    let re = match Regex::new(r"(?is)<title[^>]*>(.*?)</title>") {
        Ok(re) => re,
        Err(_) => return false,
    };
    re.captures(body)
        .map(|caps| caps[1].contains(expected))
        .unwrap_or(false)
}

fn element_present(body: &str, token: &str) -> bool {
    let escaped = escape(token);
    // Any one of class-token, exact id, or bare tag name is sufficient.
    let patterns = [
        format!(r#"class\s*=\s*["'][^"']*{escaped}[^"']*["']"#),
        format!(r#"id\s*=\s*["']{escaped}["']"#),
        format!(r"(?i)<{escaped}[\s>/]"),
    ];
    patterns
        .iter()
        .any(|pattern| matches_pattern(body, pattern))
}

fn matches_pattern(body: &str, pattern: &str) -> bool {
    Regex::new(pattern)
        .map(|re| re.is_match(body))
        .unwrap_or(false)
}

fn json_key_present(body: &str, key: &str) -> bool {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|value| value.as_object().map(|map| map.contains_key(key)))
        .unwrap_or(false)
}
