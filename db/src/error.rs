//! Error types for definition parsing and registry operations.
//!
//! [`DefinitionError`] covers the structural violations that abort parsing
//! of a single definition source. [`DocsError`] is the unified error for
//! everything else: I/O, YAML decoding, and configuration.

use thiserror::Error;

/// Fatal structural problem in a definitions tree.
///
/// Every other shape mismatch is tolerated by discarding the offending
/// field and recording a warning.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DefinitionError {
    /// Top level is neither a mapping nor empty.
    #[error("{label}: definitions must be a mapping of command names, found {found}")]
    NotAMapping { label: String, found: String },

    /// A top-level key is not a string.
    #[error("{label}: command name must be a string, found {found}")]
    NonStringCommandKey { label: String, found: String },

    /// A command value is neither a string alias, a mapping, nor null.
    #[error("{label}: command '{command}' must be a string or a mapping, found {found}")]
    InvalidCommandValue {
        label: String,
        command: String,
        found: String,
    },

    /// A property key inside a descriptor is not a string.
    #[error("{label}: command '{command}' has a property key that is {found}, expected a string")]
    NonStringPropertyKey {
        label: String,
        command: String,
        found: String,
    },

    /// A parameter name is not a string.
    #[error("{label}: command '{command}' has a parameter name that is {found}, expected a string")]
    NonStringParameterKey {
        label: String,
        command: String,
        found: String,
    },
}

/// Errors that can occur while loading definitions or configuration.
#[derive(Debug, Error)]
pub enum DocsError {
    /// File I/O failure.
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// YAML parsing or serialization failure.
    #[error("YAML error: {0}")]
    YamlError(#[from] serde_yaml::Error),

    /// Structural violation in a definitions tree.
    #[error(transparent)]
    Definition(#[from] DefinitionError),

    /// Configuration failed validation.
    #[error("invalid config: {0}")]
    InvalidConfig(String),
}

/// Convenience alias for results with [`DocsError`].
pub type Result<T> = std::result::Result<T, DocsError>;
