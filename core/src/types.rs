//! Command description model.
//!
//! This module defines the normalized documentation model for callable
//! commands. A [`CommandDescription`] is built once from a
//! [`CommandDescriptionConfig`] and never mutated afterwards; all defaulting
//! and text normalization happens in [`CommandDescription::new`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::markup::MarkupText;

/// Fence language used for example blocks when none is configured.
pub const DEFAULT_CODE_LANGUAGE: &str = "haskell";

/// Value type accepted by a parameter.
///
/// # Examples
///
/// ```
/// use command_docs_core::ParameterType;
///
/// let ty: ParameterType = "control_pattern".parse().unwrap();
/// assert_eq!(ty, ParameterType::ControlPattern);
/// assert_eq!(ty.to_string(), "ControlPattern");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ParameterType {
    /// Type could not be determined.
    Unknown,
    /// Accepts any value.
    Any,
    /// Pattern of rational numbers.
    RationalPattern,
    /// Pattern of control values.
    ControlPattern,
    /// Pattern of time values.
    TimePattern,
}

impl ParameterType {
    /// Returns the tag rendered next to a parameter name.
    pub fn label(self) -> &'static str {
        match self {
            Self::Unknown => "?",
            Self::Any => "a",
            Self::RationalPattern => "Pattern Rational",
            Self::ControlPattern => "ControlPattern",
            Self::TimePattern => "Pattern Time",
        }
    }
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Error returned when a parameter type name is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown parameter type: {0}")]
pub struct ParseTypeError(pub String);

impl FromStr for ParameterType {
    type Err = ParseTypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace('-', "_").as_str() {
            "UNKNOWN" => Ok(Self::Unknown),
            "ANY" => Ok(Self::Any),
            "RATIONAL_PATTERN" => Ok(Self::RationalPattern),
            "CONTROL_PATTERN" => Ok(Self::ControlPattern),
            "TIME_PATTERN" => Ok(Self::TimePattern),
            _ => Err(ParseTypeError(s.to_string())),
        }
    }
}

/// Documentation for a single command parameter.
///
/// # Examples
///
/// ```
/// use command_docs_core::{ParameterDescription, ParameterType};
///
/// let param = ParameterDescription::new("pattern", "the pattern to play")
///     .with_type(ParameterType::ControlPattern)
///     .editable();
/// assert!(param.editable);
/// assert_eq!(param.help.value(), "the pattern to play");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParameterDescription {
    pub name: String,
    pub help: MarkupText,
    /// Inserted as an editable placeholder on completion.
    pub editable: bool,
    /// Absent renders no type tag.
    #[serde(rename = "type")]
    pub param_type: Option<ParameterType>,
}

impl ParameterDescription {
    pub fn new(name: impl Into<String>, help: &str) -> Self {
        Self {
            name: name.into(),
            help: MarkupText::trusted(help),
            editable: false,
            param_type: None,
        }
    }

    pub fn with_type(mut self, param_type: ParameterType) -> Self {
        self.param_type = Some(param_type);
        self
    }

    /// Marks the parameter as an editable completion placeholder.
    pub fn editable(mut self) -> Self {
        self.editable = true;
        self
    }
}

/// Named inputs for [`CommandDescription::new`].
///
/// Every field is optional; the defaults are applied at construction.
#[derive(Debug, Clone)]
pub struct CommandDescriptionConfig {
    /// Pre-rendered signature lines. When `None` or empty the signature is
    /// synthesized from the command name and parameter names.
    pub formatted_command: Option<Vec<String>>,
    /// Parameters in declaration order. `None` means no parameter list was
    /// given at all, which synthesizes `"<command> ?"`.
    pub parameters: Option<Vec<ParameterDescription>>,
    /// Description of the return value.
    pub returns: Option<String>,
    /// General prose.
    pub help: Option<String>,
    /// Raw example sources, each rendered as a fenced block.
    pub examples: Vec<String>,
    /// Fence language for example blocks.
    pub code_language: String,
}

impl Default for CommandDescriptionConfig {
    fn default() -> Self {
        Self {
            formatted_command: None,
            parameters: None,
            returns: None,
            help: None,
            examples: Vec::new(),
            code_language: DEFAULT_CODE_LANGUAGE.to_string(),
        }
    }
}

/// Normalized, immutable documentation for one command.
///
/// # Examples
///
/// ```
/// use command_docs_core::*;
///
/// let desc = CommandDescription::new(
///     "fast",
///     CommandDescriptionConfig {
///         parameters: Some(vec![
///             ParameterDescription::new("amount", "speed-up factor"),
///             ParameterDescription::new("pattern", "pattern to speed up"),
///         ]),
///         help: Some("Speeds up a pattern.".into()),
///         ..Default::default()
///     },
/// );
///
/// assert_eq!(desc.command(), "fast");
/// assert_eq!(desc.formatted_command()[0].value(), "fast amount pattern");
/// assert_eq!(desc.help().unwrap().value(), "Speeds up a pattern.");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CommandDescription {
    command: String,
    formatted_command: Vec<MarkupText>,
    parameters: Vec<ParameterDescription>,
    returns: Option<MarkupText>,
    help: Option<MarkupText>,
    examples: Vec<MarkupText>,
}

impl CommandDescription {
    /// Builds a description, applying field defaults.
    pub fn new(command: impl Into<String>, config: CommandDescriptionConfig) -> Self {
        let command = command.into();

        let formatted_command = match config.formatted_command {
            Some(lines) if !lines.is_empty() => {
                lines.into_iter().map(MarkupText::trusted).collect()
            }
            _ => vec![MarkupText::trusted(synthesize_signature(
                &command,
                config.parameters.as_deref(),
            ))],
        };

        let examples = config
            .examples
            .iter()
            .map(|example| MarkupText::code_block(&config.code_language, example))
            .collect();

        Self {
            command,
            formatted_command,
            parameters: config.parameters.unwrap_or_default(),
            returns: config.returns.map(MarkupText::trusted),
            help: config.help.map(MarkupText::trusted),
            examples,
        }
    }

    /// Builds a description with no metadata beyond its name.
    ///
    /// # Examples
    ///
    /// ```
    /// use command_docs_core::CommandDescription;
    ///
    /// let desc = CommandDescription::bare("hush");
    /// assert_eq!(desc.formatted_command()[0].value(), "hush ?");
    /// assert!(desc.parameters().is_empty());
    /// ```
    pub fn bare(command: impl Into<String>) -> Self {
        Self::new(command, CommandDescriptionConfig::default())
    }

    /// Registry key and the identifier matched against cursor text.
    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn formatted_command(&self) -> &[MarkupText] {
        &self.formatted_command
    }

    pub fn parameters(&self) -> &[ParameterDescription] {
        &self.parameters
    }

    pub fn returns(&self) -> Option<&MarkupText> {
        self.returns.as_ref()
    }

    pub fn help(&self) -> Option<&MarkupText> {
        self.help.as_ref()
    }

    pub fn examples(&self) -> &[MarkupText] {
        &self.examples
    }

    /// Names of parameters inserted as placeholders on completion.
    pub fn editable_parameters(&self) -> impl Iterator<Item = &str> {
        self.parameters
            .iter()
            .filter(|p| p.editable)
            .map(|p| p.name.as_str())
    }
}

fn synthesize_signature(command: &str, parameters: Option<&[ParameterDescription]>) -> String {
    match parameters {
        Some(params) => {
            let names: Vec<&str> = params.iter().map(|p| p.name.as_str()).collect();
            format!("{command} {}", names.join(" "))
        }
        None => format!("{command} ?"),
    }
}
