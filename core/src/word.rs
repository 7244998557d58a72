//! Identifier resolution at a cursor position.
//!
//! Given one line of source text and a cursor column, finds the contiguous
//! identifier touching the cursor. Offsets are character columns on the
//! line, and spans are half-open.
//!
//! The scan is asymmetric: an identifier may *end* in apostrophes
//! (`foo'`, `every'`), but an apostrophe never extends it leftwards.
//!
//! # Example
//!
//! ```
//! use command_docs_core::{Span, locate_identifier};
//!
//! let found = locate_identifier("play 70 -- comment", 4).unwrap();
//! assert_eq!(found.text, "play");
//! assert_eq!(found.span, Span::new(0, 4));
//!
//! // Past the trimmed line (inside the stripped comment).
//! assert!(locate_identifier("play 70 -- comment", 12).is_none());
//! ```

use serde::Serialize;

/// Line comment marker stripped before resolution.
pub const DEFAULT_COMMENT_MARKER: &str = "--";

/// Half-open character range `[start, end)` on a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// An identifier found on a line and the span it occupies.
///
/// `text` may be empty when the cursor sits between two non-identifier
/// characters; the span is then zero-length at the cursor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identifier {
    pub text: String,
    pub span: Span,
}

fn is_leading_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_'
}

fn is_trailing_char(ch: char) -> bool {
    is_leading_char(ch) || ch == '\''
}

/// Removes a trailing line comment and trailing whitespace.
///
/// An empty `marker` disables comment stripping.
///
/// # Examples
///
/// ```
/// use command_docs_core::strip_comment;
///
/// assert_eq!(strip_comment("fast 2 -- twice", "--"), "fast 2");
/// assert_eq!(strip_comment("fast 2   ", "--"), "fast 2");
/// ```
pub fn strip_comment<'a>(line: &'a str, marker: &str) -> &'a str {
    let code = match line.find(marker) {
        Some(idx) if !marker.is_empty() => &line[..idx],
        _ => line,
    };
    code.trim_end()
}

/// Resolves the identifier at `cursor` using the default comment marker.
///
/// Returns `None` when `cursor` lies beyond the end of the line after
/// comment and trailing-whitespace stripping.
pub fn locate_identifier(line: &str, cursor: usize) -> Option<Identifier> {
    locate_identifier_with(line, cursor, DEFAULT_COMMENT_MARKER)
}

/// Resolves the identifier at `cursor`, stripping comments that start
/// with `comment_marker`.
pub fn locate_identifier_with(
    line: &str,
    cursor: usize,
    comment_marker: &str,
) -> Option<Identifier> {
    let chars: Vec<char> = strip_comment(line, comment_marker).chars().collect();
    if cursor > chars.len() {
        return None;
    }

    let start = chars[..cursor]
        .iter()
        .rposition(|&ch| !is_leading_char(ch))
        .map_or(0, |idx| idx + 1);
    let end = chars[cursor..]
        .iter()
        .position(|&ch| !is_trailing_char(ch))
        .map_or(chars.len(), |idx| cursor + idx);

    Some(Identifier {
        text: chars[start..end].iter().collect(),
        span: Span::new(start, end),
    })
}

/// Identifier resolver bound to a comment marker.
///
/// # Examples
///
/// ```
/// use command_docs_core::WordResolver;
///
/// let resolver = WordResolver::new("//");
/// let found = resolver.locate("sound bd // kick", 3).unwrap();
/// assert_eq!(found.text, "sound");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordResolver {
    comment_marker: String,
}

impl WordResolver {
    pub fn new(comment_marker: impl Into<String>) -> Self {
        Self {
            comment_marker: comment_marker.into(),
        }
    }

    pub fn comment_marker(&self) -> &str {
        &self.comment_marker
    }

    pub fn locate(&self, line: &str, cursor: usize) -> Option<Identifier> {
        locate_identifier_with(line, cursor, &self.comment_marker)
    }
}

impl Default for WordResolver {
    fn default() -> Self {
        Self::new(DEFAULT_COMMENT_MARKER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const LINE: &str = "play 70 -- comment";

    fn resolve(line: &str, cursor: usize) -> (String, usize, usize) {
        let found = locate_identifier(line, cursor).unwrap();
        (found.text, found.span.start, found.span.end)
    }

    #[test]
    fn test_cursor_at_end_of_word() {
        assert_eq!(resolve(LINE, 4), ("play".to_string(), 0, 4));
    }

    #[test]
    fn test_cursor_at_start_of_word() {
        assert_eq!(resolve(LINE, 0), ("play".to_string(), 0, 4));
    }

    #[test]
    fn test_cursor_inside_number() {
        assert_eq!(resolve(LINE, 7), ("70".to_string(), 5, 7));
        assert_eq!(resolve(LINE, 6), ("70".to_string(), 5, 7));
    }

    #[test]
    fn test_cursor_past_stripped_comment() {
        assert!(locate_identifier(LINE, 19).is_none());
        assert!(locate_identifier(LINE, 9).is_none());
        assert!(locate_identifier(LINE, 8).is_none());
    }

    #[test]
    fn test_apostrophe_extends_rightwards() {
        assert_eq!(resolve("foo'bar", 3), ("foo'bar".to_string(), 0, 7));
        assert_eq!(resolve("every' 3", 2), ("every'".to_string(), 0, 6));
    }

    #[test]
    fn test_apostrophe_never_starts_identifier() {
        assert_eq!(resolve("foo'bar", 4), ("bar".to_string(), 4, 7));
        assert_eq!(resolve("foo'", 4), (String::new(), 4, 4));
    }

    #[test]
    fn test_empty_match_between_separators() {
        let found = locate_identifier("(  )", 2).unwrap();
        assert_eq!(found.text, "");
        assert!(found.span.is_empty());
        assert_eq!(found.span.start, 2);
    }

    #[test]
    fn test_empty_line() {
        let found = locate_identifier("", 0).unwrap();
        assert_eq!(found.text, "");
        assert_eq!(found.span.len(), 0);
        assert!(locate_identifier("", 1).is_none());
    }

    #[test]
    fn test_underscore_and_digits() {
        assert_eq!(
            resolve("d1 $ play_pattern", 10),
            ("play_pattern".to_string(), 5, 17)
        );
    }

    #[test]
    fn test_trailing_whitespace_bounds_cursor() {
        assert!(locate_identifier("fast   ", 5).is_none());
        assert_eq!(resolve("fast   ", 4), ("fast".to_string(), 0, 4));
    }

    #[test]
    fn test_custom_comment_marker() {
        let resolver = WordResolver::new("//");
        assert!(resolver.locate("s bd // kick", 9).is_none());
        assert!(resolver.locate("s bd -- kick", 9).is_some());
    }

    #[test]
    fn test_empty_marker_keeps_comments() {
        let found = locate_identifier_with("fast -- x", 9, "").unwrap();
        assert_eq!(found.text, "x");
    }

    #[test]
    fn test_non_ascii_text_uses_char_columns() {
        assert_eq!(resolve("é fast", 4), ("fast".to_string(), 2, 6));
    }
}
