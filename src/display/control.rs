use std::borrow::Cow;

/// What to do with control characters found in text bound for a terminal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ControlStrategy {
    /// Remove them
    #[default]
    Strip,
    /// Substitute `?` for each one
    Replace,
}

const ESC: char = '\x1b';
const BEL: char = '\x07';

fn is_control(c: char) -> bool {
    c == '\x7f' || (c < ' ' && !matches!(c, '\t' | '\n' | '\r'))
}

/// Neutralize terminal control characters before measuring or printing text.
///
/// ANSI CSI sequences (`ESC [` ... final byte 0x40-0x7E) and OSC sequences
/// (`ESC ]` ... BEL or `ESC \`) are always removed whole, since they are
/// markup rather than characters. Remaining C0 controls, DEL and bare ESC
/// are stripped or replaced according to `strategy`. Tab, newline and
/// carriage return are kept.
///
/// Returns `Cow::Borrowed` when there is nothing to do.
///
/// # Examples
///
/// ```
/// use textkit::display::{process_control_chars, ControlStrategy};
///
/// assert_eq!(process_control_chars("\x1b[31mred\x1b[0m", ControlStrategy::Strip), "red");
/// assert_eq!(process_control_chars("a\x00b", ControlStrategy::Replace), "a?b");
/// ```
pub fn process_control_chars(text: &str, strategy: ControlStrategy) -> Cow<'_, str> {
    if !text.chars().any(is_control) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if c == ESC {
            match chars.peek() {
                Some('[') => {
                    chars.next();
                    // parameter and intermediate bytes, then the final byte
                    for next in chars.by_ref() {
                        if ('\x40'..='\x7e').contains(&next) {
                            break;
                        }
                    }
                    continue;
                }
                Some(']') => {
                    chars.next();
                    while let Some(next) = chars.next() {
                        if next == BEL {
                            break;
                        }
                        if next == ESC && chars.peek() == Some(&'\\') {
                            chars.next();
                            break;
                        }
                    }
                    continue;
                }
                _ => {}
            }
        }

        if is_control(c) {
            if strategy == ControlStrategy::Replace {
                out.push('?');
            }
        } else {
            out.push(c);
        }
    }

    Cow::Owned(out)
}

// ============================================================================
// Tests
// ============================================================================
