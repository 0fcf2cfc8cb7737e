use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// ============================================================================
// Error Types
// ============================================================================

/// Conversion failures surfaced to the caller.
///
/// Decode and encode failures are only ever suppressed by an explicit
/// [`ErrorPolicy`] other than `Strict`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Bytes could not be decoded under the declared encoding
    #[error("'{encoding}' codec can't decode {len} byte(s) at offset {offset}")]
    Decode {
        encoding: &'static str,
        offset: usize,
        len: usize,
    },

    /// Text contains a codepoint the target encoding cannot represent
    #[error("'{encoding}' codec can't encode character {codepoint:?} at index {index}")]
    Encode {
        encoding: &'static str,
        codepoint: char,
        index: usize,
    },

    /// Policy name not recognised, or not applicable in this direction
    #[error("Unsupported {kind} policy: {value}")]
    UnsupportedPolicy { kind: &'static str, value: String },

    /// Non-text input under the strict non-text policy
    #[error("Expected text or bytes, got {kind}")]
    NonText { kind: &'static str },

    /// Label not present in the codec registry
    #[error("Unknown encoding: {0}")]
    UnknownEncoding(String),
}

// ============================================================================
// Policies
// ============================================================================

/// How undecodable bytes or unencodable characters are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorPolicy {
    /// Fail with [`Error::Decode`] / [`Error::Encode`]
    #[default]
    Strict,
    /// U+FFFD per malformed run when decoding, `?` when encoding
    Replace,
    /// Drop the offending input
    Ignore,
    /// `&#NNNN;` character references (encoding only)
    #[serde(rename = "xmlcharrefreplace")]
    XmlCharRefReplace,
    /// `\xNN` / `\uNNNN` / `\UNNNNNNNN` escapes
    #[serde(rename = "backslashreplace")]
    BackslashReplace,
}

impl ErrorPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorPolicy::Strict => "strict",
            ErrorPolicy::Replace => "replace",
            ErrorPolicy::Ignore => "ignore",
            ErrorPolicy::XmlCharRefReplace => "xmlcharrefreplace",
            ErrorPolicy::BackslashReplace => "backslashreplace",
        }
    }
}

impl FromStr for ErrorPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "strict" => Ok(ErrorPolicy::Strict),
            "replace" => Ok(ErrorPolicy::Replace),
            "ignore" => Ok(ErrorPolicy::Ignore),
            "xmlcharrefreplace" => Ok(ErrorPolicy::XmlCharRefReplace),
            "backslashreplace" => Ok(ErrorPolicy::BackslashReplace),
            _ => Err(Error::UnsupportedPolicy {
                kind: "errors",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for ErrorPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How values that are neither text nor bytes are coerced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NonTextPolicy {
    /// Use the value's own conversion hook, falling back to its Debug form
    #[default]
    SimpleRepr,
    /// Hand the value back untouched
    Passthru,
    /// Always use the Debug form
    Repr,
    /// Produce empty text or bytes
    Empty,
    /// Fail with [`Error::NonText`]
    Strict,
}

impl NonTextPolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            NonTextPolicy::SimpleRepr => "simplerepr",
            NonTextPolicy::Passthru => "passthru",
            NonTextPolicy::Repr => "repr",
            NonTextPolicy::Empty => "empty",
            NonTextPolicy::Strict => "strict",
        }
    }
}

impl FromStr for NonTextPolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "simplerepr" => Ok(NonTextPolicy::SimpleRepr),
            "passthru" => Ok(NonTextPolicy::Passthru),
            "repr" => Ok(NonTextPolicy::Repr),
            "empty" => Ok(NonTextPolicy::Empty),
            "strict" => Ok(NonTextPolicy::Strict),
            _ => Err(Error::UnsupportedPolicy {
                kind: "non-text",
                value: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for NonTextPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Tests
// ============================================================================
