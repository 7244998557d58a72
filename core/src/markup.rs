//! Trusted markup text values.
//!
//! Every piece of formatted text produced by this workspace is a
//! [`MarkupText`]: the markdown source plus a trust flag the host rendering
//! surface consumes. Values are only ever built through the constructors
//! here, so the flag is always set.

use std::fmt;

use serde::Serialize;

/// Line break used when joining and normalizing formatted text.
#[cfg(windows)]
pub const LINE_BREAK: &str = "\r\n";
/// Line break used when joining and normalizing formatted text.
#[cfg(not(windows))]
pub const LINE_BREAK: &str = "\n";

/// Markdown content marked as safe to render with rich markup.
///
/// # Examples
///
/// ```
/// use command_docs_core::MarkupText;
///
/// let text = MarkupText::trusted("`play` a note");
/// assert!(text.is_trusted());
/// assert_eq!(text.to_plain_text(), "play a note");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MarkupText {
    value: String,
    is_trusted: bool,
}

impl MarkupText {
    /// Wraps markdown source as trusted markup.
    pub fn trusted(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            is_trusted: true,
        }
    }

    /// Wraps `code` in a fenced code block tagged with `language`.
    ///
    /// Line endings are normalized to [`LINE_BREAK`] and trailing blank
    /// lines are dropped before fencing.
    ///
    /// # Examples
    ///
    /// ```
    /// use command_docs_core::{LINE_BREAK, MarkupText};
    ///
    /// let block = MarkupText::code_block("haskell", "d1 $ s \"bd\"\r\n\r\n");
    /// let expected = ["```haskell", "d1 $ s \"bd\"", "```"].join(LINE_BREAK);
    /// assert_eq!(block.value(), expected);
    /// ```
    pub fn code_block(language: &str, code: &str) -> Self {
        let code = strip_trailing_blank_lines(&normalize_line_endings(code));
        Self::trusted(format!("```{language}{LINE_BREAK}{code}{LINE_BREAK}```"))
    }

    /// Returns the markdown source.
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns `true` when the host may render rich markup from this value.
    pub fn is_trusted(&self) -> bool {
        self.is_trusted
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Returns the source with inline-code backticks removed.
    pub fn to_plain_text(&self) -> String {
        self.value.replace('`', "")
    }
}

impl fmt::Display for MarkupText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// Rewrites `\r\n`, `\r`, and `\n` line endings as [`LINE_BREAK`].
pub fn normalize_line_endings(text: &str) -> String {
    text.replace("\r\n", "\n")
        .replace('\r', "\n")
        .split('\n')
        .collect::<Vec<_>>()
        .join(LINE_BREAK)
}

fn strip_trailing_blank_lines(text: &str) -> String {
    let mut lines: Vec<&str> = text.split(LINE_BREAK).collect();
    while lines.last().is_some_and(|line| line.trim().is_empty()) {
        lines.pop();
    }
    lines.join(LINE_BREAK)
}
