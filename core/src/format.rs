//! Detail-level-aware rendering of command descriptions.
//!
//! Detail levels are strictly additive: each level renders everything the
//! level below it does and appends more sections. Sections are joined with
//! a horizontal rule, which only ever appears between two non-empty
//! sections.
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
//! assert!(desc.format(DetailLevel::Off, true).is_none());
//! let minimum = desc.format(DetailLevel::Minimum, true).unwrap();
//! assert_eq!(minimum.value(), "fast amount");
//!
//! let detailed = desc.format(DetailLevel::NoExamplesNoLinks, true).unwrap();
//! assert!(detailed.value().starts_with(minimum.value()));
//! assert!(detailed.value().contains("`amount` speed-up factor"));
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::markup::{LINE_BREAK, MarkupText};
use crate::types::{CommandDescription, ParameterDescription};

/// Requested verbosity tier for rendered help.
///
/// Levels are ordered: `Off < Minimum < NoExamplesNoLinks < Full`.
///
/// # Examples
///
/// ```
/// use command_docs_core::DetailLevel;
///
/// assert_eq!(DetailLevel::default(), DetailLevel::Full);
/// assert!(DetailLevel::Minimum < DetailLevel::Full);
/// assert_eq!(
///     "no_examples_no_links".parse::<DetailLevel>(),
///     Ok(DetailLevel::NoExamplesNoLinks)
/// );
/// ```
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DetailLevel {
    /// Render nothing.
    Off,
    /// Signature lines only.
    Minimum,
    /// Signature, help prose, parameters, and return value.
    NoExamplesNoLinks,
    /// Everything, including examples.
    #[default]
    Full,
}

impl DetailLevel {
    pub const ALL: [DetailLevel; 4] = [
        Self::Off,
        Self::Minimum,
        Self::NoExamplesNoLinks,
        Self::Full,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Off => "OFF",
            Self::Minimum => "MINIMUM",
            Self::NoExamplesNoLinks => "NO_EXAMPLES_NO_LINKS",
            Self::Full => "FULL",
        }
    }
}

impl fmt::Display for DetailLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a detail level name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown detail level: {0}")]
pub struct ParseLevelError(pub String);

impl FromStr for DetailLevel {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|level| level.as_str() == normalized)
            .ok_or_else(|| ParseLevelError(s.to_string()))
    }
}

fn separator() -> String {
    format!("{LINE_BREAK}{LINE_BREAK}---{LINE_BREAK}{LINE_BREAK}")
}

impl CommandDescription {
    /// Renders this description at `level`.
    ///
    /// Returns `None` only for [`DetailLevel::Off`]. With
    /// `include_signature` unset, the signature block is omitted entirely,
    /// so [`DetailLevel::Minimum`] yields empty text.
    pub fn format(&self, level: DetailLevel, include_signature: bool) -> Option<MarkupText> {
        if level == DetailLevel::Off {
            return None;
        }

        let mut sections: Vec<String> = Vec::new();
        if include_signature {
            sections.push(self.signature_text());
        }

        if level >= DetailLevel::NoExamplesNoLinks {
            if let Some(help) = self.help() {
                sections.push(help.value().to_string());
            }

            let mut lines: Vec<String> = self.parameters().iter().map(format_parameter).collect();
            if let Some(returns) = self.returns() {
                lines.push(format!("Returns: {returns}"));
            }
            sections.push(lines.join(LINE_BREAK));
        }

        if level >= DetailLevel::Full && !self.examples().is_empty() {
            let mut lines = vec!["Examples:".to_string()];
            lines.extend(self.examples().iter().map(|e| e.value().to_string()));
            sections.push(lines.join(LINE_BREAK));
        }

        let body = sections
            .into_iter()
            .filter(|section| !section.is_empty())
            .collect::<Vec<_>>()
            .join(&separator());
        Some(MarkupText::trusted(body))
    }

    /// Signature lines joined with line breaks.
    pub fn signature_text(&self) -> String {
        self.formatted_command()
            .iter()
            .map(MarkupText::value)
            .collect::<Vec<_>>()
            .join(LINE_BREAK)
    }

    /// Signature text with inline-code backticks removed.
    pub fn plain_signature(&self) -> String {
        self.signature_text().replace('`', "")
    }
}

fn format_parameter(param: &ParameterDescription) -> String {
    let mut line = format!("`{}`", param.name);
    if let Some(ty) = param.param_type {
        line.push_str(&format!(" `{ty}`"));
    }
    if !param.help.is_empty() {
        line.push(' ');
        line.push_str(param.help.value());
    }
    line
}
