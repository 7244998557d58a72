//! Command documentation model, detail formatter, and identifier resolution.
//!
//! This crate defines the normalized documentation model for callable
//! commands and the two pure operations built on it:
//!
//! - [`CommandDescription`]: immutable documentation for one command
//!   (signature lines, parameters, return value, help prose, examples),
//!   built from a [`CommandDescriptionConfig`].
//! - [`ParameterDescription`]: one parameter with help text, an optional
//!   [`ParameterType`], and an editable-placeholder flag.
//! - [`MarkupText`]: trusted markdown text, the value type of every piece
//!   of rendered output.
//! - [`CommandDescription::format`]: renders a description at a
//!   [`DetailLevel`].
//! - [`locate_identifier`]: finds the identifier touching a cursor on a
//!   line of text, returning its [`Span`].
//!
//! # Example
//!
//! ```
//! use command_docs_core::*;
//!
//! let desc = CommandDescription::new(
//!     "fast",
//!     CommandDescriptionConfig {
//!         parameters: Some(vec![ParameterDescription::new("amount", "speed-up factor")]),
//!         help: Some("Speeds up a pattern.".into()),
//!         ..Default::default()
//!     },
//! );
//!
//! let word = locate_identifier("d1 $ fast 2 $ s \"bd\"", 7).unwrap();
//! assert_eq!(word.text, desc.command());
//!
//! let help = desc.format(DetailLevel::Full, true).unwrap();
//! assert!(help.value().starts_with("fast amount"));
//! ```

mod format;
mod markup;
mod types;
mod word;

pub use format::{DetailLevel, ParseLevelError};
pub use markup::{LINE_BREAK, MarkupText, normalize_line_endings};
pub use types::*;
pub use word::{
    DEFAULT_COMMENT_MARKER, Identifier, Span, WordResolver, locate_identifier,
    locate_identifier_with, strip_comment,
};
