//! Conversion between byte sequences and decoded text.
//!
//! This module provides:
//!
//! - **Codec primitives**: label lookup plus policy-aware `decode` / `encode`
//! - **Type-coercing conversion**: [`to_text`] / [`to_bytes`] over any [`Value`]
//! - **Comparison**: [`equal`] across raw encodings
//! - **Detection**: [`guess_encoding`] with a pluggable [`Detector`]
//!
//! # Examples
//!
//! ```
//! use textkit::encoding::{to_text, Conversion, ErrorPolicy, Value};
//!
//! let latin1 = Conversion::with_encoding("latin1").unwrap();
//! let text = to_text(Value::Bytes(b"caf\xe9"), &latin1).unwrap();
//! assert_eq!(text.converted().unwrap(), "café");
//!
//! let lossy = Conversion::default().errors(ErrorPolicy::Replace);
//! let text = to_text(Value::Bytes(b"caf\xe9"), &lossy).unwrap();
//! assert_eq!(text.converted().unwrap(), "caf\u{FFFD}");
//! ```

mod codec;
mod convert;
mod detect;
mod types;

pub use codec::{decode, encode, lookup, valid_encoding};
pub use convert::{
    equal, to_bytes, to_string_repr, to_text, ByteConvertible, Coerced, Conversion, Form,
    Textual, Value,
};
pub use detect::{
    guess_decode, guess_encoding, guess_encoding_with, Chardet, Detector, FALLBACK_LABEL,
    UTF8_LABEL,
};
pub use types::{Error, ErrorPolicy, NonTextPolicy};
