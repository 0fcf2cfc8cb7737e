//! Type-coercing conversion between text and bytes.
//!
//! Callers wrap their input in a [`Value`] that says what it is: already
//! text, raw bytes, or an object with (or without) its own conversion hook.
//! [`to_text`] and [`to_bytes`] then normalize it according to a
//! [`Conversion`], never failing on the input *kind* unless the caller
//! chose [`NonTextPolicy::Strict`].

use std::borrow::Cow;
use std::fmt;

use encoding_rs::{Encoding, UTF_8};

use super::codec::{decode, encode, lookup};
use super::types::{Error, ErrorPolicy, NonTextPolicy};

// ============================================================================
// Inputs
// ============================================================================

/// What an object's conversion hook produced.
///
/// Hooks are allowed to return either kind; the converter normalizes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Form {
    Text(String),
    Bytes(Vec<u8>),
}

/// An object that knows how to render itself as text.
///
/// Objects that can produce both text and bytes should implement this trait;
/// the text form wins in both directions.
pub trait Textual: fmt::Debug {
    fn to_text_form(&self) -> anyhow::Result<Form>;
}

/// An object that knows how to render itself as bytes.
pub trait ByteConvertible: fmt::Debug {
    fn to_byte_form(&self) -> anyhow::Result<Form>;
}

/// Input to [`to_text`] / [`to_bytes`].
#[derive(Debug, Clone, Copy)]
pub enum Value<'a> {
    Text(&'a str),
    Bytes(&'a [u8]),
    Textual(&'a dyn Textual),
    ByteConvertible(&'a dyn ByteConvertible),
    /// No conversion hook: only the Debug form is available
    Opaque(&'a dyn fmt::Debug),
}

impl Value<'_> {
    /// Short description of the value's kind, used in error messages.
    pub fn kind(&self) -> &'static str {
        match self {
            Value::Text(_) => "text",
            Value::Bytes(_) => "bytes",
            Value::Textual(_) => "textual object",
            Value::ByteConvertible(_) => "byte-convertible object",
            Value::Opaque(_) => "opaque object",
        }
    }

    fn debug_repr(&self) -> String {
        match self {
            Value::Text(text) => format!("{text:?}"),
            Value::Bytes(bytes) => format!("{bytes:?}"),
            Value::Textual(obj) => format!("{obj:?}"),
            Value::ByteConvertible(obj) => format!("{obj:?}"),
            Value::Opaque(obj) => format!("{obj:?}"),
        }
    }
}

impl<'a> From<&'a str> for Value<'a> {
    fn from(text: &'a str) -> Self {
        Value::Text(text)
    }
}

impl<'a> From<&'a String> for Value<'a> {
    fn from(text: &'a String) -> Self {
        Value::Text(text)
    }
}

impl<'a> From<&'a [u8]> for Value<'a> {
    fn from(bytes: &'a [u8]) -> Self {
        Value::Bytes(bytes)
    }
}

impl<'a, const N: usize> From<&'a [u8; N]> for Value<'a> {
    fn from(bytes: &'a [u8; N]) -> Self {
        Value::Bytes(bytes)
    }
}

impl<'a> From<&'a Vec<u8>> for Value<'a> {
    fn from(bytes: &'a Vec<u8>) -> Self {
        Value::Bytes(bytes)
    }
}

// ============================================================================
// Options and Outputs
// ============================================================================

/// Encoding and policies for one conversion call.
///
/// Defaults to UTF-8, [`ErrorPolicy::Strict`] and
/// [`NonTextPolicy::SimpleRepr`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Conversion {
    pub encoding: &'static Encoding,
    pub errors: ErrorPolicy,
    pub non_text: NonTextPolicy,
}

impl Default for Conversion {
    fn default() -> Self {
        Self {
            encoding: UTF_8,
            errors: ErrorPolicy::Strict,
            non_text: NonTextPolicy::SimpleRepr,
        }
    }
}

impl Conversion {
    /// Default policies with the encoding named by `label`.
    pub fn with_encoding(label: &str) -> Result<Self, Error> {
        Ok(Self {
            encoding: lookup(label)?,
            ..Self::default()
        })
    }

    pub fn errors(mut self, errors: ErrorPolicy) -> Self {
        self.errors = errors;
        self
    }

    pub fn non_text(mut self, non_text: NonTextPolicy) -> Self {
        self.non_text = non_text;
        self
    }
}

/// Result of a conversion: either the normalized value, or the original
/// input handed back under [`NonTextPolicy::Passthru`].
#[derive(Debug, Clone)]
pub enum Coerced<'a, T> {
    Converted(T),
    Passthru(Value<'a>),
}

impl<T> Coerced<'_, T> {
    /// The converted value, or `None` for a passthru.
    pub fn converted(self) -> Option<T> {
        match self {
            Coerced::Converted(value) => Some(value),
            Coerced::Passthru(_) => None,
        }
    }

    pub fn is_passthru(&self) -> bool {
        matches!(self, Coerced::Passthru(_))
    }
}

// ============================================================================
// Conversion
// ============================================================================

/// Normalize `value` to text.
///
/// - Text is returned unchanged (borrowed).
/// - Bytes are decoded with `conversion.encoding` / `conversion.errors`.
/// - Anything else follows `conversion.non_text`.
///
/// # Errors
///
/// [`Error::Decode`] for undecodable bytes under `Strict`,
/// [`Error::UnsupportedPolicy`] for a decode under `XmlCharRefReplace`, and
/// [`Error::NonText`] for object input under [`NonTextPolicy::Strict`].
pub fn to_text<'a>(
    value: Value<'a>,
    conversion: &Conversion,
) -> Result<Coerced<'a, Cow<'a, str>>, Error> {
    match value {
        Value::Text(text) => return Ok(Coerced::Converted(Cow::Borrowed(text))),
        Value::Bytes(bytes) => {
            return decode(bytes, conversion.encoding, conversion.errors).map(Coerced::Converted)
        }
        _ => {}
    }

    let text = match conversion.non_text {
        NonTextPolicy::Strict => return Err(Error::NonText { kind: value.kind() }),
        NonTextPolicy::Passthru => return Ok(Coerced::Passthru(value)),
        NonTextPolicy::Empty => String::new(),
        NonTextPolicy::Repr => value.debug_repr(),
        NonTextPolicy::SimpleRepr => simple_text(value, conversion),
    };
    Ok(Coerced::Converted(Cow::Owned(text)))
}

/// Normalize `value` to bytes; the mirror of [`to_text`].
///
/// - Bytes are returned unchanged (borrowed).
/// - Text is encoded with `conversion.encoding` / `conversion.errors`.
/// - Anything else follows `conversion.non_text`.
///
/// Byte output from an object's own hook is taken to already be in
/// `conversion.encoding`: it is returned untouched when it decodes cleanly
/// under that encoding. Otherwise a lenient `conversion.errors` policy is
/// applied to it (decode, then re-encode), and under `Strict` it is replaced
/// by the Debug form.
pub fn to_bytes<'a>(
    value: Value<'a>,
    conversion: &Conversion,
) -> Result<Coerced<'a, Cow<'a, [u8]>>, Error> {
    match value {
        Value::Bytes(bytes) => return Ok(Coerced::Converted(Cow::Borrowed(bytes))),
        Value::Text(text) => {
            return encode(text, conversion.encoding, conversion.errors).map(Coerced::Converted)
        }
        _ => {}
    }

    let bytes = match conversion.non_text {
        NonTextPolicy::Strict => return Err(Error::NonText { kind: value.kind() }),
        NonTextPolicy::Passthru => return Ok(Coerced::Passthru(value)),
        NonTextPolicy::Empty => Vec::new(),
        NonTextPolicy::Repr => encode_repr(value, conversion),
        NonTextPolicy::SimpleRepr => simple_bytes(value, conversion),
    };
    Ok(Coerced::Converted(Cow::Owned(bytes)))
}

fn hook_form(value: Value<'_>) -> Option<anyhow::Result<Form>> {
    match value {
        Value::Textual(obj) => Some(obj.to_text_form()),
        Value::ByteConvertible(obj) => Some(obj.to_byte_form()),
        _ => None,
    }
}

fn simple_text(value: Value<'_>, conversion: &Conversion) -> String {
    match hook_form(value) {
        Some(Ok(Form::Text(text))) => text,
        Some(Ok(Form::Bytes(bytes))) => match decode(&bytes, conversion.encoding, conversion.errors)
        {
            Ok(text) => text.into_owned(),
            Err(e) => {
                tracing::debug!(kind = value.kind(), error = %e, "Hook output undecodable, using Debug form");
                value.debug_repr()
            }
        },
        Some(Err(e)) => {
            tracing::warn!(kind = value.kind(), error = %e, "Conversion hook failed, using Debug form");
            value.debug_repr()
        }
        None => value.debug_repr(),
    }
}

fn simple_bytes(value: Value<'_>, conversion: &Conversion) -> Vec<u8> {
    match hook_form(value) {
        Some(Ok(Form::Text(text))) => match encode(&text, conversion.encoding, conversion.errors) {
            Ok(bytes) => bytes.into_owned(),
            Err(e) => {
                tracing::debug!(kind = value.kind(), error = %e, "Hook output unencodable, using Debug form");
                encode_repr(value, conversion)
            }
        },
        Some(Ok(Form::Bytes(bytes))) => {
            if decode(&bytes, conversion.encoding, ErrorPolicy::Strict).is_ok() {
                return bytes;
            }
            let recoded = match conversion.errors {
                ErrorPolicy::Strict => None,
                errors => decode(&bytes, conversion.encoding, errors)
                    .and_then(|text| encode(&text, conversion.encoding, errors).map(Cow::into_owned))
                    .ok(),
            };
            recoded.unwrap_or_else(|| {
                tracing::debug!(
                    kind = value.kind(),
                    encoding = conversion.encoding.name(),
                    errors = %conversion.errors,
                    "Hook bytes not valid in target encoding, using Debug form"
                );
                encode_repr(value, conversion)
            })
        }
        Some(Err(e)) => {
            tracing::warn!(kind = value.kind(), error = %e, "Conversion hook failed, using Debug form");
            encode_repr(value, conversion)
        }
        None => encode_repr(value, conversion),
    }
}

/// Debug form encoded for output. Falls back to backslash escapes so that
/// the non-strict policies stay total even when the caller asked for
/// `Strict` encoding errors.
fn encode_repr(value: Value<'_>, conversion: &Conversion) -> Vec<u8> {
    let repr = value.debug_repr();
    match encode(&repr, conversion.encoding, conversion.errors) {
        Ok(bytes) => bytes.into_owned(),
        Err(_) => match encode(&repr, conversion.encoding, ErrorPolicy::BackslashReplace) {
            Ok(bytes) => bytes.into_owned(),
            Err(_) => repr.as_bytes().to_vec(),
        },
    }
}

/// Compare two values as text decoded under `encoding`.
///
/// Identical raw inputs of the same kind are equal without decoding. Any
/// conversion failure (including a passthru) makes the values unequal.
pub fn equal(a: Value<'_>, b: Value<'_>, encoding: &'static Encoding) -> bool {
    match (a, b) {
        (Value::Text(x), Value::Text(y)) if x == y => return true,
        (Value::Bytes(x), Value::Bytes(y)) if x == y => return true,
        _ => {}
    }

    let conversion = Conversion {
        encoding,
        ..Conversion::default()
    };
    match (to_text(a, &conversion), to_text(b, &conversion)) {
        (Ok(Coerced::Converted(x)), Ok(Coerced::Converted(y))) => x == y,
        _ => false,
    }
}

/// Render any value as text for messages and logs. Never fails.
///
/// Uses `simplerepr` with lossy UTF-8 decoding.
pub fn to_string_repr(value: Value<'_>) -> String {
    let conversion = Conversion::default().errors(ErrorPolicy::Replace);
    match to_text(value, &conversion) {
        Ok(Coerced::Converted(text)) => text.into_owned(),
        _ => value.debug_repr(),
    }
}

// ============================================================================
// Tests
// ============================================================================
