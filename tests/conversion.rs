//! Integration tests for the conversion core: decoding, encoding, non-text
//! coercion, comparison across encodings and encoding guessing.

use std::borrow::Cow;

use encoding_rs::{EUC_JP, UTF_8, WINDOWS_1252};
use pretty_assertions::assert_eq;
use textkit::encoding::{
    equal, guess_encoding, lookup, to_bytes, to_text, ByteConvertible, Conversion, Error,
    ErrorPolicy, Form, NonTextPolicy, Textual, Value,
};

const U_SPANISH: &str = "El veloz murciélago saltó sobre el perro perezoso.";
const U_JAPANESE: &str = "速い茶色のキツネが怠惰な犬に'増";
const U_ACCENT: &str = "café";
const U_SYLLABARY: &str = "く ku";

fn latin1(text: &str) -> Vec<u8> {
    encoding_rs::WINDOWS_1252.encode(text).0.into_owned()
}

fn euc_jp(text: &str) -> Vec<u8> {
    EUC_JP.encode(text).0.into_owned()
}

fn conv(label: &str) -> Conversion {
    Conversion::with_encoding(label).unwrap()
}

fn text_of<'a>(value: Value<'a>, conversion: &Conversion) -> Cow<'a, str> {
    to_text(value, conversion)
        .unwrap()
        .converted()
        .expect("converted text")
}

fn bytes_of<'a>(value: Value<'a>, conversion: &Conversion) -> Cow<'a, [u8]> {
    to_bytes(value, conversion)
        .unwrap()
        .converted()
        .expect("converted bytes")
}

// ============================================================================
// Objects with conversion hooks
// ============================================================================

/// Text hook only
#[derive(Debug)]
struct TextNoBytes;

impl Textual for TextNoBytes {
    fn to_text_form(&self) -> anyhow::Result<Form> {
        Ok(Form::Text(U_ACCENT.to_string()))
    }
}

/// Byte hook returning UTF-8 bytes
#[derive(Debug)]
struct BytesNoText;

impl ByteConvertible for BytesNoText {
    fn to_byte_form(&self) -> anyhow::Result<Form> {
        Ok(Form::Bytes(U_ACCENT.as_bytes().to_vec()))
    }
}

/// Byte hook that actually returns text
#[derive(Debug)]
struct BytesReturnsText;

impl ByteConvertible for BytesReturnsText {
    fn to_byte_form(&self) -> anyhow::Result<Form> {
        Ok(Form::Text(U_ACCENT.to_string()))
    }
}

/// Text hook that actually returns UTF-8 bytes
#[derive(Debug)]
struct TextReturnsBytes;

impl Textual for TextReturnsBytes {
    fn to_text_form(&self) -> anyhow::Result<Form> {
        Ok(Form::Bytes(U_ACCENT.as_bytes().to_vec()))
    }
}

// ============================================================================
// to_text
// ============================================================================

#[test]
fn test_to_text_good_values() {
    assert_eq!(text_of(Value::Text(U_JAPANESE), &conv("latin1")), U_JAPANESE);
    assert_eq!(
        text_of(Value::Bytes(U_SPANISH.as_bytes()), &Conversion::default()),
        U_SPANISH
    );
    assert_eq!(
        text_of(Value::Bytes(U_JAPANESE.as_bytes()), &Conversion::default()),
        U_JAPANESE
    );
    assert_eq!(
        text_of(Value::Bytes(&latin1(U_SPANISH)), &conv("latin1")),
        U_SPANISH
    );
    assert_eq!(
        text_of(Value::Bytes(&euc_jp(U_JAPANESE)), &conv("euc_jp")),
        U_JAPANESE
    );
}

#[test]
fn test_to_text_single_byte_example() {
    assert_eq!(text_of(Value::Bytes(b"\xe9"), &conv("latin1")), "é");

    let err = to_text(Value::Bytes(b"\xe9"), &Conversion::default()).unwrap_err();
    assert_eq!(
        err,
        Error::Decode {
            encoding: "UTF-8",
            offset: 0,
            len: 1
        }
    );

    let replace = Conversion::default().errors(ErrorPolicy::Replace);
    assert_eq!(text_of(Value::Bytes(b"\xe9"), &replace), "\u{FFFD}");
}

#[test]
fn test_to_text_errors() {
    let accent = latin1(U_ACCENT);
    let replace = Conversion::default().errors(ErrorPolicy::Replace);
    let ignore = Conversion::default().errors(ErrorPolicy::Ignore);

    assert_eq!(text_of(Value::Bytes(&accent), &replace), "caf\u{FFFD}");
    assert_eq!(text_of(Value::Bytes(&accent), &ignore), "caf");
    assert!(matches!(
        to_text(Value::Bytes(&accent), &Conversion::default()),
        Err(Error::Decode { offset: 3, .. })
    ));
}

#[test]
fn test_to_text_non_string() {
    let base = Conversion::default();

    assert_eq!(text_of(Value::Opaque(&5), &base), "5");
    assert_eq!(
        text_of(Value::Opaque(&5), &base.non_text(NonTextPolicy::Repr)),
        "5"
    );
    assert_eq!(
        text_of(Value::Opaque(&5), &base.non_text(NonTextPolicy::Empty)),
        ""
    );

    let passthru = to_text(Value::Opaque(&5), &base.non_text(NonTextPolicy::Passthru)).unwrap();
    assert!(passthru.is_passthru());

    let err = to_text(Value::Opaque(&5), &base.non_text(NonTextPolicy::Strict)).unwrap_err();
    assert_eq!(err, Error::NonText { kind: "opaque object" });

    assert_eq!(text_of(Value::Textual(&TextNoBytes), &base), U_ACCENT);
    assert_eq!(text_of(Value::ByteConvertible(&BytesNoText), &base), U_ACCENT);
    assert_eq!(text_of(Value::ByteConvertible(&BytesReturnsText), &base), U_ACCENT);
    assert_eq!(text_of(Value::Textual(&TextReturnsBytes), &base), U_ACCENT);
}

#[test]
fn test_to_text_repr_skips_hooks() {
    let repr = Conversion::default().non_text(NonTextPolicy::Repr);
    assert_eq!(text_of(Value::Textual(&TextNoBytes), &repr), "TextNoBytes");
}

#[test]
fn test_to_text_strict_non_text_rejects_objects_only() {
    let strict = Conversion::default().non_text(NonTextPolicy::Strict);
    assert_eq!(text_of(Value::Text("ok"), &strict), "ok");
    assert!(to_text(Value::Textual(&TextNoBytes), &strict).is_err());
}

// ============================================================================
// to_bytes
// ============================================================================

#[test]
fn test_to_bytes_good_values() {
    assert_eq!(
        &*bytes_of(Value::Bytes(U_JAPANESE.as_bytes()), &conv("latin1")),
        U_JAPANESE.as_bytes()
    );
    assert_eq!(
        &*bytes_of(Value::Text(U_SPANISH), &Conversion::default()),
        U_SPANISH.as_bytes()
    );
    assert_eq!(
        &*bytes_of(Value::Text(U_JAPANESE), &Conversion::default()),
        U_JAPANESE.as_bytes()
    );
    assert_eq!(
        bytes_of(Value::Text(U_SPANISH), &conv("latin1")).into_owned(),
        latin1(U_SPANISH)
    );
    assert_eq!(
        bytes_of(Value::Text(U_JAPANESE), &conv("euc_jp")).into_owned(),
        euc_jp(U_JAPANESE)
    );
}

#[test]
fn test_to_bytes_errors() {
    assert_eq!(
        &*bytes_of(
            Value::Text(U_SYLLABARY),
            &conv("latin1").errors(ErrorPolicy::Replace)
        ),
        b"? ku"
    );
    assert_eq!(
        &*bytes_of(
            Value::Text(U_SYLLABARY),
            &conv("latin").errors(ErrorPolicy::Ignore)
        ),
        b" ku"
    );
    assert_eq!(
        to_bytes(Value::Text(U_SYLLABARY), &conv("latin1")).unwrap_err(),
        Error::Encode {
            encoding: "windows-1252",
            codepoint: 'く',
            index: 0
        }
    );
}

#[test]
fn test_to_bytes_non_string() {
    let base = Conversion::default();

    assert_eq!(&*bytes_of(Value::Opaque(&5), &base), b"5");
    assert_eq!(
        &*bytes_of(Value::Opaque(&5), &base.non_text(NonTextPolicy::Repr)),
        b"5"
    );
    assert!(bytes_of(Value::Opaque(&5), &base.non_text(NonTextPolicy::Empty)).is_empty());
    assert!(to_bytes(Value::Opaque(&5), &base.non_text(NonTextPolicy::Passthru))
        .unwrap()
        .is_passthru());
    assert!(matches!(
        to_bytes(Value::Opaque(&5), &base.non_text(NonTextPolicy::Strict)),
        Err(Error::NonText { .. })
    ));

    // Text hook output is encoded
    assert_eq!(
        &*bytes_of(Value::Textual(&TextNoBytes), &base),
        U_ACCENT.as_bytes()
    );
    // Byte hook output valid in the target encoding is kept raw
    assert_eq!(
        &*bytes_of(Value::ByteConvertible(&BytesNoText), &base),
        U_ACCENT.as_bytes()
    );
    // Byte hook that returns text is encoded, honoring the caller's encoding
    assert_eq!(
        &*bytes_of(Value::ByteConvertible(&BytesReturnsText), &base),
        U_ACCENT.as_bytes()
    );
    assert_eq!(
        bytes_of(Value::ByteConvertible(&BytesReturnsText), &conv("latin1")).into_owned(),
        latin1(U_ACCENT)
    );
    // Text hook that returns UTF-8 bytes
    assert_eq!(
        &*bytes_of(Value::Textual(&TextReturnsBytes), &base),
        U_ACCENT.as_bytes()
    );
}

/// Byte hook returning latin-1 bytes
#[derive(Debug)]
struct Latin1Bytes;

impl ByteConvertible for Latin1Bytes {
    fn to_byte_form(&self) -> anyhow::Result<Form> {
        Ok(Form::Bytes(latin1(U_ACCENT)))
    }
}

#[test]
fn test_to_bytes_byte_hook_output_checked_against_target_encoding() {
    // Latin-1 "café" isn't UTF-8, so the Debug form is used instead
    assert_eq!(
        &*bytes_of(Value::ByteConvertible(&Latin1Bytes), &Conversion::default()),
        b"Latin1Bytes"
    );
    // ...but is kept as is when the caller targets latin-1
    assert_eq!(
        bytes_of(Value::ByteConvertible(&Latin1Bytes), &conv("latin1")).into_owned(),
        latin1(U_ACCENT)
    );
}

#[test]
fn test_round_trip_law() {
    for (text, label) in [
        (U_SPANISH, "latin1"),
        (U_SPANISH, "utf-8"),
        (U_JAPANESE, "euc_jp"),
        (U_JAPANESE, "shift_jis"),
        (U_JAPANESE, "utf-16"),
    ] {
        let conversion = conv(label);
        let bytes = bytes_of(Value::Text(text), &conversion);
        assert_eq!(text_of(Value::Bytes(&bytes), &conversion), text, "{label}");
    }
}

// ============================================================================
// equal
// ============================================================================

#[test]
fn test_equal() {
    let euc = euc_jp(U_JAPANESE);

    assert!(equal(Value::Text(U_JAPANESE), Value::Text(U_JAPANESE), UTF_8));
    assert!(equal(Value::Bytes(&euc), Value::Bytes(&euc), UTF_8));
    assert!(!equal(Value::Text(U_JAPANESE), Value::Bytes(&euc), UTF_8));
    assert!(equal(Value::Text(U_JAPANESE), Value::Bytes(&euc), EUC_JP));
}

#[test]
fn test_equal_across_raw_encodings() {
    let as_latin1 = latin1(U_ACCENT);
    assert!(equal(
        Value::Bytes(&as_latin1),
        Value::Text(U_ACCENT),
        WINDOWS_1252
    ));
    assert!(!equal(
        Value::Bytes(&as_latin1),
        Value::Bytes(U_ACCENT.as_bytes()),
        WINDOWS_1252
    ));
    assert!(equal(Value::Opaque(&5), Value::Text("5"), UTF_8));
}

// ============================================================================
// guess_encoding
// ============================================================================

#[test]
fn test_guess_encoding_no_detector() {
    assert_eq!(guess_encoding(U_SPANISH.as_bytes(), true), "utf8");
    assert_eq!(guess_encoding(&latin1(U_SPANISH), true), "latin1");
    assert_eq!(guess_encoding(U_JAPANESE.as_bytes(), true), "utf8");
    assert_eq!(guess_encoding(&euc_jp(U_JAPANESE), true), "latin1");
}

#[test]
fn test_guess_encoding_with_detector() {
    // Several encodings can produce the same bytes; what matters is that the
    // guess decodes back to the original text.
    for (bytes, expected) in [
        (U_SPANISH.as_bytes().to_vec(), U_SPANISH),
        (latin1(U_SPANISH), U_SPANISH),
        (U_JAPANESE.as_bytes().to_vec(), U_JAPANESE),
    ] {
        let label = guess_encoding(&bytes, false);
        let conversion = Conversion {
            encoding: lookup(label).unwrap(),
            ..Conversion::default()
        };
        assert_eq!(text_of(Value::Bytes(&bytes), &conversion), expected, "{label}");
    }
}
