//! Definition parsing, source loading, and the reloadable command registry.
//!
//! This crate turns loosely-typed documentation sources (YAML or JSON
//! mappings of command name → descriptor) into
//! [`CommandDescription`](command_docs_core::CommandDescription)s, keeps them
//! in a process-wide [`Registry`], and answers hover and completion lookups
//! against it.
//!
//! # Quick start
//!
//! ```
//! use command_docs_db::{DocsConfig, DocsProvider};
//!
//! // Bundled definitions only
//! let provider = DocsProvider::new(DocsConfig::default());
//! let report = provider.reload();
//! assert!(report.failures.is_empty());
//!
//! if let Some(hover) = provider.hover("d1 $ fast 2 $ s \"bd\"", 0, 6) {
//!     println!("{}", hover.contents);
//! }
//! for item in provider.complete("d1 $ sl", 7) {
//!     println!("{} -> {}", item.label, item.insert_text);
//! }
//! ```
//!
//! # Failure policy
//!
//! A source that cannot be read, decoded, or parsed contributes no entries
//! to a reload and is reported in the [`ReloadReport`]; the other sources
//! still load. Shape mismatches inside a descriptor never fail a parse:
//! the field is dropped and a warning is recorded.

mod config;
mod error;
mod loader;
mod lookup;
mod parser;
mod registry;

pub use config::{CompletionConfig, DocsConfig, HoverConfig};
pub use error::{DefinitionError, DocsError, Result};
pub use loader::{
    BUNDLED_DEFINITIONS, BUNDLED_LABEL, DefinitionSource, decode_definitions, load_source,
};
pub use lookup::{CompletionItem, DocsProvider, Hover, complete, hover};
pub use parser::{ParseOptions, ParsedDefinitions, parse_definitions};
pub use registry::{Registry, ReloadReport, SourceFailure};
