use std::borrow::Cow;

use encoding_rs::Encoding;
use unicode_width::UnicodeWidthChar;

/// Number of terminal columns a single codepoint occupies (0, 1 or 2).
///
/// Combining marks and other zero-width codepoints are 0, East Asian wide
/// and fullwidth codepoints are 2. Control characters, which have no
/// defined width, count as 0.
pub fn char_width(c: char) -> usize {
    UnicodeWidthChar::width(c).unwrap_or(0)
}

/// Calculates the display width of a string in terminal columns.
///
/// This is the sum of [`char_width`] over every codepoint, so it always
/// agrees with [`width_chop`] on where a string ends.
///
/// # Examples
///
/// ```
/// use textkit::display::width_of;
///
/// assert_eq!(width_of("Hello"), 5);
/// assert_eq!(width_of("速い茶色"), 8);
/// assert_eq!(width_of("cafe\u{301}"), 4);
/// ```
pub fn width_of(text: &str) -> usize {
    text.chars().map(char_width).sum()
}

/// Longest prefix of `text` that fits in `max_width` columns, with its width.
///
/// A glyph that would overflow the remaining columns is excluded entirely,
/// so the result may be narrower than `max_width` (a wide glyph with one
/// column left). Zero-width codepoints following the last fitting glyph
/// stay attached to it.
///
/// # Examples
///
/// ```
/// use textkit::display::width_chop;
///
/// assert_eq!(width_chop("速い茶色", 5), (4, "速い"));
/// assert_eq!(width_chop("速い茶色", 100), (8, "速い茶色"));
/// assert_eq!(width_chop("abc", 0), (0, ""));
/// ```
pub fn width_chop(text: &str, max_width: usize) -> (usize, &str) {
    let mut width = 0;
    for (idx, c) in text.char_indices() {
        let w = char_width(c);
        if width + w > max_width {
            return (width, &text[..idx]);
        }
        width += w;
    }
    (width, text)
}

/// Options for [`width_fill`].
#[derive(Debug, Clone, Copy)]
pub struct Fill<'a> {
    /// Left-align (pad after the content) when true, right-align otherwise
    pub left: bool,
    /// Chop the text to this many columns before padding
    pub chop: Option<usize>,
    pub prefix: &'a str,
    pub suffix: &'a str,
}

impl Default for Fill<'_> {
    fn default() -> Self {
        Self {
            left: true,
            chop: None,
            prefix: "",
            suffix: "",
        }
    }
}

/// Pad `text` with spaces to `target_width` columns.
///
/// `prefix` and `suffix` are placed around the (optionally chopped) text and
/// count towards the width. Content that already reaches `target_width` is
/// returned without padding; only `fill.chop` ever truncates.
///
/// # Examples
///
/// ```
/// use textkit::display::{width_fill, Fill};
///
/// assert_eq!(width_fill("ab", 5, Fill::default()), "ab   ");
/// assert_eq!(width_fill("ab", 5, Fill { left: false, ..Fill::default() }), "   ab");
/// ```
pub fn width_fill(text: &str, target_width: usize, fill: Fill<'_>) -> String {
    let (content_width, content) = match fill.chop {
        Some(chop) => width_chop(text, chop),
        None => (width_of(text), text),
    };
    let used = width_of(fill.prefix) + content_width + width_of(fill.suffix);
    let padding = " ".repeat(target_width.saturating_sub(used));

    let mut out = String::with_capacity(
        fill.prefix.len() + content.len() + fill.suffix.len() + padding.len(),
    );
    if !fill.left {
        out.push_str(&padding);
    }
    out.push_str(fill.prefix);
    out.push_str(content);
    out.push_str(fill.suffix);
    if fill.left {
        out.push_str(&padding);
    }
    out
}

/// Ellipsis string used for truncation
const ELLIPSIS: &str = "...";
/// Display width of the ellipsis (3 columns for ASCII "...")
const ELLIPSIS_WIDTH: usize = 3;

/// Truncates a string to fit within a maximum display width.
///
/// If truncation is necessary, appends "..." to indicate text was cut off.
/// Returns `Cow::Borrowed` when the string already fits.
///
/// For widths too narrow to hold a glyph plus the ellipsis (0-3 columns),
/// the result is a plain [`width_chop`] without ellipsis.
///
/// # Examples
///
/// ```
/// use textkit::display::truncate_to_width;
///
/// assert_eq!(truncate_to_width("Short", 10), "Short");
/// assert_eq!(truncate_to_width("Hello World", 8), "Hello...");
/// assert_eq!(truncate_to_width("速い茶色", 7), "速い...");
/// assert_eq!(truncate_to_width("Test", 2), "Te");
/// ```
pub fn truncate_to_width(text: &str, max_width: usize) -> Cow<'_, str> {
    let (_, fits) = width_chop(text, max_width);
    if fits.len() == text.len() {
        return Cow::Borrowed(text);
    }
    if max_width <= ELLIPSIS_WIDTH {
        return Cow::Owned(fits.to_string());
    }

    let (_, head) = width_chop(text, max_width - ELLIPSIS_WIDTH);
    Cow::Owned(format!("{head}{ELLIPSIS}"))
}

/// Whether `bytes` form well-formed UTF-8.
///
/// Rejects overlong encodings, stray continuation bytes, surrogates,
/// codepoints above U+10FFFF and sequences cut off at the end.
pub fn validate(bytes: &[u8]) -> bool {
    Encoding::utf8_valid_up_to(bytes) == bytes.len()
}

// ============================================================================
// Tests
// ============================================================================
