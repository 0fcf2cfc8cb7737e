//! Policy-aware codec primitives over the `encoding_rs` registry.
//!
//! `encoding_rs` implements the WHATWG Encoding Standard, so its own
//! replacement behaviour is fixed (U+FFFD on decode, HTML numeric character
//! references on encode). The functions here drive the `*_without_replacement`
//! decoder/encoder loops instead, so every [`ErrorPolicy`] can be applied at
//! the exact byte offset or character where conversion fails.

use std::borrow::Cow;

use encoding_rs::{
    DecoderResult, EncoderResult, Encoding, BIG5, EUC_JP, EUC_KR, GB18030, GBK, ISO_8859_15,
    ISO_8859_2, KOI8_R, REPLACEMENT, SHIFT_JIS, UTF_16BE, UTF_16LE, UTF_8, WINDOWS_1250,
    WINDOWS_1251, WINDOWS_1252,
};

use super::types::{Error, ErrorPolicy};

/// Resolve an encoding label through the codec registry.
///
/// Labels are matched case-insensitively with surrounding whitespace
/// ignored, and `_` is treated as `-`. A handful of common aliases outside
/// the WHATWG label set (`latin`, `eucjp`, `utf16`, `cp932`...) are accepted
/// too. The WHATWG "replacement" encoding is never returned since it cannot
/// round-trip anything.
///
/// Note: `latin1` / `iso-8859-1` resolve to windows-1252, which decodes every
/// byte value without failure.
pub fn lookup(label: &str) -> Result<&'static Encoding, Error> {
    let trimmed = label.trim();
    let normalized = trimmed.to_ascii_lowercase().replace('_', "-");

    let found = Encoding::for_label(trimmed.as_bytes())
        .or_else(|| Encoding::for_label(normalized.as_bytes()))
        .or_else(|| alias(&normalized));

    match found {
        Some(encoding) if encoding != REPLACEMENT => Ok(encoding),
        _ => Err(Error::UnknownEncoding(label.to_string())),
    }
}

fn alias(label: &str) -> Option<&'static Encoding> {
    let encoding = match label {
        "utf8" | "u8" | "utf" => UTF_8,
        "utf16" | "utf-16-le" | "utf16le" | "u16" => UTF_16LE,
        "utf-16-be" | "utf16be" => UTF_16BE,
        "latin" | "latin-1" | "iso8859-1" | "8859" | "cp819" => WINDOWS_1252,
        "latin2" | "latin-2" | "iso8859-2" => ISO_8859_2,
        "latin9" | "latin-9" | "iso8859-15" => ISO_8859_15,
        "cp1250" => WINDOWS_1250,
        "cp1251" => WINDOWS_1251,
        "cp1252" => WINDOWS_1252,
        "eucjp" | "ujis" | "u-jis" => EUC_JP,
        "euckr" | "cp949" => EUC_KR,
        "sjis" | "shiftjis" | "s-jis" | "cp932" | "mskanji" => SHIFT_JIS,
        "cp936" | "gb2312-80" => GBK,
        "gb-18030" => GB18030,
        "big5hkscs" | "big5-tw" | "cp950" => BIG5,
        "koi8r" => KOI8_R,
        _ => return None,
    };
    Some(encoding)
}

/// Decode `bytes` under `encoding`, applying `errors` to malformed input.
///
/// Valid UTF-8 decoded as UTF-8 is borrowed. No BOM sniffing is done: a
/// leading BOM decodes to U+FEFF like any other character.
///
/// `XmlCharRefReplace` has no meaning for decoding and is rejected with
/// [`Error::UnsupportedPolicy`].
pub fn decode<'a>(
    bytes: &'a [u8],
    encoding: &'static Encoding,
    errors: ErrorPolicy,
) -> Result<Cow<'a, str>, Error> {
    if errors == ErrorPolicy::XmlCharRefReplace {
        return Err(Error::UnsupportedPolicy {
            kind: "decode errors",
            value: errors.to_string(),
        });
    }
    if encoding == UTF_8 {
        if let Ok(text) = std::str::from_utf8(bytes) {
            return Ok(Cow::Borrowed(text));
        }
    }

    let mut decoder = encoding.new_decoder_without_bom_handling();
    let mut out = String::with_capacity(bytes.len());
    let mut pos = 0;

    loop {
        let rest = &bytes[pos..];
        let needed = decoder
            .max_utf8_buffer_length_without_replacement(rest.len())
            .unwrap_or(rest.len().saturating_mul(3));
        out.reserve(needed);

        let (result, read) = decoder.decode_to_string_without_replacement(rest, &mut out, true);
        pos += read;

        match result {
            DecoderResult::InputEmpty => break,
            DecoderResult::OutputFull => continue,
            DecoderResult::Malformed(bad, after) => {
                let end = pos.saturating_sub(after as usize);
                let start = end.saturating_sub(bad as usize);
                match errors {
                    ErrorPolicy::Strict => {
                        return Err(Error::Decode {
                            encoding: encoding.name(),
                            offset: start,
                            len: bad as usize,
                        });
                    }
                    ErrorPolicy::Replace => out.push('\u{FFFD}'),
                    ErrorPolicy::Ignore => {}
                    ErrorPolicy::BackslashReplace => {
                        for byte in &bytes[start..end] {
                            out.push_str(&format!("\\x{byte:02x}"));
                        }
                    }
                    ErrorPolicy::XmlCharRefReplace => unreachable!("rejected above"),
                }
            }
        }
    }

    Ok(Cow::Owned(out))
}

/// Encode `text` under `encoding`, applying `errors` to unmappable characters.
///
/// UTF-8 output is borrowed. UTF-16LE/BE are encoded directly since the
/// WHATWG encoders only ever produce ASCII-compatible output.
///
/// Some legacy encoders map a character onto a different one (Shift_JIS and
/// EUC-JP write U+00A5 as `\`, ISO-2022-JP widens half-width katakana).
/// Those characters count as unmappable here, so strict output always
/// decodes back to `text`.
pub fn encode<'a>(
    text: &'a str,
    encoding: &'static Encoding,
    errors: ErrorPolicy,
) -> Result<Cow<'a, [u8]>, Error> {
    if encoding == UTF_8 {
        return Ok(Cow::Borrowed(text.as_bytes()));
    }
    if encoding == UTF_16LE || encoding == UTF_16BE {
        return Ok(Cow::Owned(encode_utf16(text, encoding == UTF_16BE)));
    }

    let mut out = Vec::with_capacity(text.len());
    let mut pos = 0;

    for (at, c) in text.char_indices() {
        if c.is_ascii() || round_trips(c, encoding) {
            continue;
        }
        encode_run(text, pos..at, encoding, errors, &mut out)?;
        unmappable(text, at, c, encoding, errors, &mut out)?;
        pos = at + c.len_utf8();
    }
    encode_run(text, pos..text.len(), encoding, errors, &mut out)?;

    Ok(Cow::Owned(out))
}

/// Encode `text[range]` with a fresh encoder, flushing any shift state at
/// the end so policy output can follow in the base (ASCII) state.
fn encode_run(
    text: &str,
    range: std::ops::Range<usize>,
    encoding: &'static Encoding,
    errors: ErrorPolicy,
    out: &mut Vec<u8>,
) -> Result<(), Error> {
    let mut encoder = encoding.new_encoder();
    let mut pos = range.start;

    loop {
        let rest = &text[pos..range.end];
        let needed = encoder
            .max_buffer_length_from_utf8_without_replacement(rest.len())
            .unwrap_or(rest.len().saturating_mul(4));
        out.reserve(needed);

        let (result, read) = encoder.encode_from_utf8_to_vec_without_replacement(rest, out, true);
        pos += read;

        match result {
            EncoderResult::InputEmpty => return Ok(()),
            EncoderResult::OutputFull => continue,
            EncoderResult::Unmappable(c) => {
                unmappable(text, pos - c.len_utf8(), c, encoding, errors, out)?;
            }
        }
    }
}

fn unmappable(
    text: &str,
    at: usize,
    c: char,
    encoding: &'static Encoding,
    errors: ErrorPolicy,
    out: &mut Vec<u8>,
) -> Result<(), Error> {
    match errors {
        ErrorPolicy::Strict => {
            return Err(Error::Encode {
                encoding: encoding.name(),
                codepoint: c,
                index: text[..at].chars().count(),
            });
        }
        ErrorPolicy::Replace => out.push(b'?'),
        ErrorPolicy::Ignore => {}
        ErrorPolicy::XmlCharRefReplace => {
            out.extend_from_slice(format!("&#{};", u32::from(c)).as_bytes());
        }
        ErrorPolicy::BackslashReplace => {
            out.extend_from_slice(backslash_escape(c).as_bytes());
        }
    }
    Ok(())
}

/// Whether `c` survives an encode/decode cycle through `encoding`.
///
/// Characters the encoder rejects outright report `true`; the encoder loop
/// reports those itself.
fn round_trips(c: char, encoding: &'static Encoding) -> bool {
    let mut buf = [0u8; 4];
    let single: &str = c.encode_utf8(&mut buf);
    let mut encoder = encoding.new_encoder();
    let mut bytes = Vec::with_capacity(16);
    let (result, _) = encoder.encode_from_utf8_to_vec_without_replacement(single, &mut bytes, true);
    if !matches!(result, EncoderResult::InputEmpty) {
        return true;
    }
    matches!(
        encoding.decode_without_bom_handling_and_without_replacement(&bytes),
        Some(decoded) if decoded == single
    )
}

fn encode_utf16(text: &str, big_endian: bool) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len() * 2);
    for unit in text.encode_utf16() {
        let bytes = if big_endian {
            unit.to_be_bytes()
        } else {
            unit.to_le_bytes()
        };
        out.extend_from_slice(&bytes);
    }
    out
}

fn backslash_escape(c: char) -> String {
    match u32::from(c) {
        cp @ 0..=0xff => format!("\\x{cp:02x}"),
        cp @ 0x100..=0xffff => format!("\\u{cp:04x}"),
        cp => format!("\\U{cp:08x}"),
    }
}

/// Whether `bytes` decode cleanly under the encoding named by `label`.
///
/// Unknown labels are reported as `false` rather than an error.
pub fn valid_encoding(bytes: &[u8], label: &str) -> bool {
    match lookup(label) {
        Ok(encoding) => decode(bytes, encoding, ErrorPolicy::Strict).is_ok(),
        Err(_) => false,
    }
}

// ============================================================================
// Tests
// ============================================================================
