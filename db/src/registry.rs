//! Reloadable in-memory registry of command descriptions.
//!
//! The [`Registry`] maps command names to [`CommandDescription`]s and is
//! shared between readers (hover, completion) and a single reloading
//! writer. A reload builds the replacement map off to the side and swaps it
//! in under one write lock, so readers see either the old contents or the
//! new contents, never a mix.
//!
//! # Example
//!
//! ```
//! use command_docs_db::{DefinitionSource, ParseOptions, Registry};
//!
//! let registry = Registry::new();
//! let sources = vec![DefinitionSource::inline("a", "play: {}\nplay_pattern: {}\nstop: {}\n")];
//! let report = registry.reload(&sources, &ParseOptions::default());
//! assert_eq!(report.loaded, 3);
//!
//! let names: Vec<String> = registry
//!     .prefix_search("pla")
//!     .iter()
//!     .map(|d| d.command().to_string())
//!     .collect();
//! assert_eq!(names, vec!["play", "play_pattern"]);
//! ```

use std::collections::BTreeMap;
use std::ops::Bound;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard};

use command_docs_core::CommandDescription;
use tracing::{info, warn};

use crate::loader::{DefinitionSource, load_source};
use crate::parser::ParseOptions;

type Entries = BTreeMap<String, Arc<CommandDescription>>;

/// A definition source that failed to load during a reload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFailure {
    /// Origin of the failing source.
    pub label: String,
    /// Human-readable failure description.
    pub message: String,
}

/// Outcome of a [`Registry::reload`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReloadReport {
    /// Number of commands in the registry after the reload.
    pub loaded: usize,
    /// Commands present before the reload and absent after it.
    pub pruned: Vec<String>,
    /// One entry per source that could not be loaded.
    pub failures: Vec<SourceFailure>,
    /// Tolerated-but-discarded fields across all sources.
    pub warnings: Vec<String>,
}

impl ReloadReport {
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }
}

/// Command name → description mapping with atomic replace-and-prune.
///
/// Iteration order is the lexicographic order of command names.
#[derive(Debug, Default)]
pub struct Registry {
    entries: RwLock<Entries>,
}

impl Registry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding `descriptions`.
    pub fn from_descriptions(descriptions: impl IntoIterator<Item = CommandDescription>) -> Self {
        let registry = Self::new();
        registry.load(descriptions);
        registry
    }

    /// Replaces the registry contents with `descriptions`.
    ///
    /// Later descriptions overwrite earlier ones with the same command
    /// name. Returns the names that were pruned, in lexicographic order.
    pub fn load(&self, descriptions: impl IntoIterator<Item = CommandDescription>) -> Vec<String> {
        let next: Entries = descriptions
            .into_iter()
            .map(|desc| (desc.command().to_string(), Arc::new(desc)))
            .collect();
        self.swap(next)
    }

    /// Rebuilds the registry from `sources`, in order.
    ///
    /// A source that fails to load contributes no entries and is recorded
    /// in the report; the remaining sources are still loaded. Commands no
    /// longer present in any source are pruned.
    pub fn reload(&self, sources: &[DefinitionSource], options: &ParseOptions) -> ReloadReport {
        let mut report = ReloadReport::default();
        let mut next = Entries::new();

        for source in sources {
            match load_source(source, options) {
                Ok(parsed) => {
                    report.warnings.extend(parsed.warnings);
                    for desc in parsed.descriptions {
                        next.insert(desc.command().to_string(), Arc::new(desc));
                    }
                }
                Err(err) => {
                    let label = source.label();
                    warn!(source = %label, error = %err, "Failed to load definition source");
                    report.failures.push(SourceFailure {
                        label,
                        message: err.to_string(),
                    });
                }
            }
        }

        report.loaded = next.len();
        report.pruned = self.swap(next);
        info!(
            loaded = report.loaded,
            pruned = report.pruned.len(),
            failed = report.failures.len(),
            "Reloaded command registry"
        );
        report
    }

    fn swap(&self, next: Entries) -> Vec<String> {
        let mut entries = self
            .entries
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let pruned = entries
            .keys()
            .filter(|name| !next.contains_key(*name))
            .cloned()
            .collect();
        *entries = next;
        pruned
    }

    fn read(&self) -> RwLockReadGuard<'_, Entries> {
        self.entries.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Looks up a description by exact command name.
    pub fn get(&self, command: &str) -> Option<Arc<CommandDescription>> {
        self.read().get(command).cloned()
    }

    /// Returns `true` if the registry holds `command`.
    pub fn contains(&self, command: &str) -> bool {
        self.read().contains_key(command)
    }

    /// Returns every description whose name starts with `prefix`.
    ///
    /// Matching is case-sensitive. An empty prefix matches everything.
    pub fn prefix_search(&self, prefix: &str) -> Vec<Arc<CommandDescription>> {
        self.read()
            .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
            .take_while(|(name, _)| name.starts_with(prefix))
            .map(|(_, desc)| Arc::clone(desc))
            .collect()
    }

    /// Returns all command names.
    pub fn commands(&self) -> Vec<String> {
        self.read().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }
}
