//! Configuration for documentation lookups.
//!
//! Defines the YAML-serializable settings that choose which definition
//! sources are loaded and how much detail hover and completion render.
//! Every field has a default, so an empty file is a valid configuration.
//!
//! # Example YAML
//!
//! ```yaml
//! version: "1.0"
//! bundled: true
//! sources:
//!   - docs/extra.yaml
//! hover:
//!   level: FULL
//! completion:
//!   level: NO_EXAMPLES_NO_LINKS
//! comment_marker: "--"
//! code_language: haskell
//! ```

use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};

use command_docs_core::{
    DEFAULT_CODE_LANGUAGE, DEFAULT_COMMENT_MARKER, DetailLevel, WordResolver,
};
use serde::{Deserialize, Serialize};

use crate::error::{DocsError, Result};
use crate::loader::DefinitionSource;
use crate::parser::ParseOptions;

/// Hover rendering settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HoverConfig {
    /// Detail level for hover text; `OFF` disables hover.
    pub level: DetailLevel,
}

impl Default for HoverConfig {
    fn default() -> Self {
        Self {
            level: DetailLevel::Full,
        }
    }
}

/// Completion rendering settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompletionConfig {
    /// Detail level for each suggestion's documentation.
    pub level: DetailLevel,
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            level: DetailLevel::NoExamplesNoLinks,
        }
    }
}

/// Top-level documentation lookup configuration.
///
/// # Examples
///
/// ```
/// use command_docs_core::DetailLevel;
/// use command_docs_db::DocsConfig;
///
/// let config: DocsConfig = serde_yaml::from_str("hover: { level: MINIMUM }").unwrap();
/// assert_eq!(config.hover.level, DetailLevel::Minimum);
/// assert_eq!(config.completion.level, DetailLevel::NoExamplesNoLinks);
/// assert!(config.bundled);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DocsConfig {
    /// Configuration format version (e.g., `"1.0"`).
    pub version: String,
    /// Load the definitions bundled into this crate before `sources`.
    pub bundled: bool,
    /// Extra definition files, loaded in order after the bundled set.
    pub sources: Vec<PathBuf>,
    pub hover: HoverConfig,
    pub completion: CompletionConfig,
    /// Line comment marker stripped before identifier resolution.
    pub comment_marker: String,
    /// Fence language for example blocks.
    pub code_language: String,
}

impl Default for DocsConfig {
    fn default() -> Self {
        Self {
            version: "1.0".to_string(),
            bundled: true,
            sources: Vec::new(),
            hover: HoverConfig::default(),
            completion: CompletionConfig::default(),
            comment_marker: DEFAULT_COMMENT_MARKER.to_string(),
            code_language: DEFAULT_CODE_LANGUAGE.to_string(),
        }
    }
}

impl DocsConfig {
    /// Loads configuration from a YAML file.
    ///
    /// Relative `sources` are resolved against the file's directory.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](DocsError::IoError) if the file cannot be read,
    /// [`YamlError`](DocsError::YamlError) if parsing fails, or
    /// [`InvalidConfig`](DocsError::InvalidConfig) if validation fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path)?;
        let reader = BufReader::new(file);
        let mut config: Self = serde_yaml::from_reader(reader)?;

        if let Some(base) = path.parent() {
            for source in &mut config.sources {
                if source.is_relative() {
                    *source = base.join(&*source);
                }
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](DocsError::IoError) if the file cannot be
    /// written, or [`YamlError`](DocsError::YamlError) if serialization
    /// fails.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let file = std::fs::File::create(path)?;
        let writer = BufWriter::new(file);
        serde_yaml::to_writer(writer, self)?;
        Ok(())
    }

    /// Checks field constraints.
    ///
    /// The comment marker must be empty (no stripping) or exactly two
    /// characters.
    pub fn validate(&self) -> Result<()> {
        let marker_len = self.comment_marker.chars().count();
        if marker_len != 0 && marker_len != 2 {
            return Err(DocsError::InvalidConfig(format!(
                "comment_marker must be two characters, got '{}'",
                self.comment_marker
            )));
        }
        if self.code_language.chars().any(char::is_whitespace) {
            return Err(DocsError::InvalidConfig(format!(
                "code_language must be a single word, got '{}'",
                self.code_language
            )));
        }
        Ok(())
    }

    /// Definition sources in load order: bundled first, then files.
    pub fn definition_sources(&self) -> Vec<DefinitionSource> {
        let mut sources = Vec::with_capacity(self.sources.len() + 1);
        if self.bundled {
            sources.push(DefinitionSource::Bundled);
        }
        sources.extend(self.sources.iter().cloned().map(DefinitionSource::File));
        sources
    }

    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions {
            code_language: self.code_language.clone(),
        }
    }

    pub fn resolver(&self) -> WordResolver {
        WordResolver::new(self.comment_marker.as_str())
    }
}
