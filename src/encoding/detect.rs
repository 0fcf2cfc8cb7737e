//! Encoding guessing for byte sequences of unknown origin.

use encoding_rs::{Encoding, UTF_8, WINDOWS_1252};

use super::codec::decode;
use super::types::ErrorPolicy;

/// Label returned for valid UTF-8 input.
pub const UTF8_LABEL: &str = "utf8";
/// Label returned when nothing better is known; decodes any byte sequence.
pub const FALLBACK_LABEL: &str = "latin1";

/// A pluggable statistical encoding detector.
pub trait Detector: Send + Sync {
    /// Best guess for `bytes`, or `None` when the detector has no opinion.
    fn detect(&self, bytes: &[u8]) -> Option<&'static Encoding>;
}

/// Detector backed by `chardetng`, the detector used by Firefox.
#[derive(Debug, Clone, Copy, Default)]
pub struct Chardet;

impl Detector for Chardet {
    fn detect(&self, bytes: &[u8]) -> Option<&'static Encoding> {
        let mut detector = chardetng::EncodingDetector::new();
        detector.feed(bytes, true);
        Some(detector.guess(None, true))
    }
}

/// Guess the encoding of `bytes`.
///
/// 1. Valid UTF-8 → `"utf8"`.
/// 2. Unless `disable_heuristic_detector`, the [`Chardet`] detector's guess.
/// 3. `"latin1"`.
pub fn guess_encoding(bytes: &[u8], disable_heuristic_detector: bool) -> &'static str {
    if disable_heuristic_detector {
        guess(bytes, None).0
    } else {
        guess(bytes, Some(&Chardet)).0
    }
}

/// [`guess_encoding`] with a caller-supplied detector.
pub fn guess_encoding_with(bytes: &[u8], detector: &dyn Detector) -> &'static str {
    guess(bytes, Some(detector)).0
}

/// Guess the encoding of `bytes` and decode them, replacing anything
/// malformed. Never fails.
pub fn guess_decode(bytes: &[u8], disable_heuristic_detector: bool) -> String {
    let detector: Option<&dyn Detector> = if disable_heuristic_detector {
        None
    } else {
        Some(&Chardet)
    };
    let (label, encoding) = guess(bytes, detector);
    tracing::debug!(encoding = label, len = bytes.len(), "Decoding with guessed encoding");
    match decode(bytes, encoding, ErrorPolicy::Replace) {
        Ok(text) => text.into_owned(),
        Err(_) => String::from_utf8_lossy(bytes).into_owned(),
    }
}

fn guess(bytes: &[u8], detector: Option<&dyn Detector>) -> (&'static str, &'static Encoding) {
    if Encoding::utf8_valid_up_to(bytes) == bytes.len() {
        return (UTF8_LABEL, UTF_8);
    }

    if let Some(detector) = detector {
        if let Some(encoding) = detector.detect(bytes) {
            tracing::debug!(encoding = encoding.name(), "Heuristic detector guess");
            return (encoding.name(), encoding);
        }
        tracing::debug!("Heuristic detector had no guess, using fallback");
    }

    (FALLBACK_LABEL, WINDOWS_1252)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::SHIFT_JIS;

    struct Fixed(Option<&'static Encoding>);

    impl Detector for Fixed {
        fn detect(&self, _bytes: &[u8]) -> Option<&'static Encoding> {
            self.0
        }
    }

    #[test]
    fn test_utf8_wins_without_detector() {
        assert_eq!(guess_encoding("速い茶色".as_bytes(), true), "utf8");
        assert_eq!(guess_encoding(b"plain ascii", true), "utf8");
        assert_eq!(guess_encoding(b"", true), "utf8");
    }

    #[test]
    fn test_utf8_wins_over_detector() {
        let detector = Fixed(Some(SHIFT_JIS));
        assert_eq!(guess_encoding_with("café".as_bytes(), &detector), "utf8");
    }

    #[test]
    fn test_fallback_without_detector() {
        assert_eq!(guess_encoding(b"caf\xe9", true), "latin1");
    }

    #[test]
    fn test_custom_detector_label() {
        let detector = Fixed(Some(SHIFT_JIS));
        assert_eq!(guess_encoding_with(b"caf\xe9", &detector), "Shift_JIS");

        let silent = Fixed(None);
        assert_eq!(guess_encoding_with(b"caf\xe9", &silent), "latin1");
    }

    #[test]
    fn test_guess_decode_fallback_is_total() {
        assert_eq!(guess_decode(b"caf\xe9", true), "café");
        assert_eq!(guess_decode("く ku".as_bytes(), true), "く ku");
    }
}
