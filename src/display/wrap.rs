//! Greedy word wrapping measured in terminal columns.

use super::width::{char_width, width_chop, width_of};

/// Column width used by callers that have no preference.
pub const DEFAULT_WRAP_WIDTH: usize = 70;

/// Wrap `text` into lines of at most `width` display columns.
///
/// Words are split on whitespace and packed greedily, separated by a single
/// space. Blank input lines separate paragraphs and are kept as empty output
/// lines between them (leading and trailing blank lines are dropped); other
/// newlines are treated as spaces. `initial_indent` starts the first line of
/// each paragraph and `subsequent_indent` the rest.
///
/// A word wider than the room left on an empty line is broken across lines.
/// Every line carries at least one glyph, so an indent that leaves no room
/// still makes progress (that line exceeds `width`).
///
/// # Examples
///
/// ```
/// use textkit::display::wrap;
///
/// assert_eq!(wrap("速い 茶色の キツネ", 8, "", ""), vec!["速い", "茶色の", "キツネ"]);
/// assert_eq!(wrap("a b c d", 3, "> ", ""), vec!["> a", "b c", "d"]);
/// ```
pub fn wrap(text: &str, width: usize, initial_indent: &str, subsequent_indent: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut paragraph: Vec<&str> = Vec::new();
    let mut blanks = 0;

    for line in text.lines() {
        if line.trim().is_empty() {
            wrap_paragraph(&paragraph, width, initial_indent, subsequent_indent, &mut lines);
            paragraph.clear();
            blanks += 1;
            continue;
        }
        if !lines.is_empty() {
            lines.extend(std::iter::repeat(String::new()).take(blanks));
        }
        blanks = 0;
        paragraph.extend(line.split_whitespace());
    }
    wrap_paragraph(&paragraph, width, initial_indent, subsequent_indent, &mut lines);

    lines
}

/// [`wrap`] joined into a single string with `\n`.
pub fn fill(text: &str, width: usize, initial_indent: &str, subsequent_indent: &str) -> String {
    wrap(text, width, initial_indent, subsequent_indent).join("\n")
}

struct Line<'a> {
    text: String,
    width: usize,
    empty: bool,
    subsequent_indent: &'a str,
}

impl<'a> Line<'a> {
    fn new(indent: &str, subsequent_indent: &'a str) -> Self {
        Self {
            text: indent.to_string(),
            width: width_of(indent),
            empty: true,
            subsequent_indent,
        }
    }

    fn push(&mut self, piece: &str, piece_width: usize) {
        self.text.push_str(piece);
        self.width += piece_width;
        self.empty = false;
    }

    /// Emit the current line and start a continuation line.
    fn break_into(&mut self, lines: &mut Vec<String>) {
        let next = Line::new(self.subsequent_indent, self.subsequent_indent);
        let done = std::mem::replace(self, next);
        lines.push(done.text);
    }
}

fn wrap_paragraph(
    words: &[&str],
    width: usize,
    initial_indent: &str,
    subsequent_indent: &str,
    lines: &mut Vec<String>,
) {
    if words.is_empty() {
        return;
    }

    let mut line = Line::new(initial_indent, subsequent_indent);
    for word in words {
        let word_width = width_of(word);
        if !line.empty {
            if line.width + 1 + word_width <= width {
                line.push(" ", 1);
                line.push(word, word_width);
                continue;
            }
            line.break_into(lines);
        }

        // Line holds only its indent here
        let mut rest: &str = word;
        loop {
            let rest_width = width_of(rest);
            let room = width.saturating_sub(line.width);
            if rest_width <= room {
                line.push(rest, rest_width);
                break;
            }

            let (mut head_width, mut head) = width_chop(rest, room);
            if head.is_empty() {
                let first = rest.chars().next().map_or(rest.len(), char::len_utf8);
                head = &rest[..first];
                head_width = head.chars().map(char_width).sum();
            }
            line.push(head, head_width);
            rest = &rest[head.len()..];
            if rest.is_empty() {
                break;
            }
            line.break_into(lines);
        }
    }
    lines.push(line.text);
}

// ============================================================================
// Tests
// ============================================================================
