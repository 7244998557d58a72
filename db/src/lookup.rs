//! Hover and completion lookups over the registry.
//!
//! Both lookups resolve the identifier under the cursor, consult the
//! [`Registry`], and render through [`CommandDescription::format`]. Neither
//! ever fails: an out-of-bounds cursor, an unknown identifier, or an `OFF`
//! detail level all produce "no result".
//!
//! # Example
//!
//! ```
//! use command_docs_db::{DefinitionSource, DocsConfig, DocsProvider};
//!
//! let config = DocsConfig { bundled: false, ..Default::default() };
//! let provider = DocsProvider::new(config);
//! provider.reload_from(&[DefinitionSource::inline(
//!     "inline",
//!     "fast:\n  help: Speeds up a pattern.\n  params: { amount: factor }\n",
//! )]);
//!
//! let hover = provider.hover("d1 $ fast 2 $ s \"bd\"", 0, 6).unwrap();
//! assert!(hover.contents.value().starts_with("fast amount"));
//! assert_eq!((hover.span.start, hover.span.end), (5, 9));
//!
//! let items = provider.complete("d1 $ fa", 7);
//! assert_eq!(items[0].label, "fast");
//! ```

use std::sync::Arc;

use command_docs_core::{CommandDescription, DetailLevel, MarkupText, Span, WordResolver};
use serde::Serialize;
use tracing::debug;

use crate::config::DocsConfig;
use crate::loader::DefinitionSource;
use crate::registry::{Registry, ReloadReport};

/// Rendered help for the identifier under the cursor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Hover {
    pub contents: MarkupText,
    /// Line the identifier was found on.
    pub line: usize,
    /// Character span of the identifier on that line.
    pub span: Span,
}

/// One completion suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompletionItem {
    /// Full command name.
    pub label: String,
    /// Signature text with backticks stripped.
    pub detail: String,
    /// Description rendered without its signature.
    pub documentation: Option<MarkupText>,
    /// Command name followed by its editable parameter names.
    pub insert_text: String,
    /// Span of the prefix the suggestion replaces.
    pub replace: Span,
}

impl CompletionItem {
    fn from_description(desc: &CommandDescription, level: DetailLevel, replace: Span) -> Self {
        let insert_text = std::iter::once(desc.command())
            .chain(desc.editable_parameters())
            .collect::<Vec<_>>()
            .join(" ");
        Self {
            label: desc.command().to_string(),
            detail: desc.plain_signature(),
            documentation: desc.format(level, false),
            insert_text,
            replace,
        }
    }
}

/// Renders hover text for the identifier at `column` on `line_text`.
///
/// Returns `None` when the cursor is past the end of the line, the
/// identifier is not registered, or `level` is [`DetailLevel::Off`].
pub fn hover(
    registry: &Registry,
    resolver: &WordResolver,
    line_text: &str,
    line: usize,
    column: usize,
    level: DetailLevel,
) -> Option<Hover> {
    let identifier = resolver.locate(line_text, column)?;
    let desc = registry.get(&identifier.text)?;
    let contents = desc.format(level, true)?;
    Some(Hover {
        contents,
        line,
        span: identifier.span,
    })
}

/// Suggests every registered command starting with the identifier at
/// `column`, in registry order.
pub fn complete(
    registry: &Registry,
    resolver: &WordResolver,
    line_text: &str,
    column: usize,
    level: DetailLevel,
) -> Vec<CompletionItem> {
    let Some(identifier) = resolver.locate(line_text, column) else {
        return Vec::new();
    };
    let items: Vec<CompletionItem> = registry
        .prefix_search(&identifier.text)
        .iter()
        .map(|desc| CompletionItem::from_description(desc, level, identifier.span))
        .collect();
    debug!(prefix = %identifier.text, matches = items.len(), "Completed identifier");
    items
}

/// Registry plus the configuration used to load and query it.
///
/// This is the collaborator a host holds for its lifetime: it is built
/// once, reloaded in place, and queried from any thread.
#[derive(Debug)]
pub struct DocsProvider {
    registry: Arc<Registry>,
    config: DocsConfig,
    resolver: WordResolver,
}

impl DocsProvider {
    /// Creates a provider with an empty registry.
    pub fn new(config: DocsConfig) -> Self {
        let resolver = config.resolver();
        Self {
            registry: Arc::new(Registry::new()),
            config,
            resolver,
        }
    }

    /// Reloads from the configured sources.
    pub fn reload(&self) -> ReloadReport {
        self.reload_from(&self.config.definition_sources())
    }

    /// Reloads from explicit `sources` using the configured parse options.
    pub fn reload_from(&self, sources: &[DefinitionSource]) -> ReloadReport {
        self.registry.reload(sources, &self.config.parse_options())
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    pub fn config(&self) -> &DocsConfig {
        &self.config
    }

    /// Hover text at the configured hover level.
    pub fn hover(&self, line_text: &str, line: usize, column: usize) -> Option<Hover> {
        hover(
            &self.registry,
            &self.resolver,
            line_text,
            line,
            column,
            self.config.hover.level,
        )
    }

    /// Completions documented at the configured completion level.
    pub fn complete(&self, line_text: &str, column: usize) -> Vec<CompletionItem> {
        complete(
            &self.registry,
            &self.resolver,
            line_text,
            column,
            self.config.completion.level,
        )
    }
}

#[cfg(test)]
mod tests {
    use command_docs_core::{CommandDescriptionConfig, ParameterDescription};

    use super::*;

    fn registry() -> Registry {
        let every = CommandDescription::new(
            "every",
            CommandDescriptionConfig {
                formatted_command: Some(vec!["`every` *n* *f*".into()]),
                parameters: Some(vec![
                    ParameterDescription::new("n", "interval").editable(),
                    ParameterDescription::new("f", "function"),
                    ParameterDescription::new("pat", "pattern").editable(),
                ]),
                help: Some("Applies f every n cycles.".into()),
                examples: vec!["d1 $ every 2 rev $ s \"bd sn\"".into()],
                ..Default::default()
            },
        );
        Registry::from_descriptions(vec![
            CommandDescription::bare("play"),
            CommandDescription::bare("play_pattern"),
            CommandDescription::bare("stop"),
            every,
        ])
    }

    fn resolver() -> WordResolver {
        WordResolver::default()
    }

    #[test]
    fn test_hover_found() {
        let hover = hover(&registry(), &resolver(), "  every 3 rev", 4, 4, DetailLevel::Full).unwrap();
        assert_eq!(hover.line, 4);
        assert_eq!(hover.span, Span::new(2, 7));
        assert!(hover.contents.value().starts_with("`every` *n* *f*"));
        assert!(hover.contents.value().contains("Examples:"));
        assert!(hover.contents.is_trusted());
    }

    #[test]
    fn test_hover_unknown_identifier() {
        assert!(hover(&registry(), &resolver(), "rev 3", 0, 1, DetailLevel::Full).is_none());
    }

    #[test]
    fn test_hover_past_comment() {
        let line = "play -- every";
        assert!(hover(&registry(), &resolver(), line, 0, 10, DetailLevel::Full).is_none());
    }

    #[test]
    fn test_hover_off_level() {
        assert!(hover(&registry(), &resolver(), "every", 0, 2, DetailLevel::Off).is_none());
    }

    #[test]
    fn test_complete_prefix_match() {
        let items = complete(&registry(), &resolver(), "pla", 3, DetailLevel::Full);
        let labels: Vec<&str> = items.iter().map(|i| i.label.as_str()).collect();
        assert_eq!(labels, vec!["play", "play_pattern"]);
        assert!(items.iter().all(|i| i.replace == Span::new(0, 3)));
    }

    #[test]
    fn test_complete_is_case_sensitive() {
        assert!(complete(&registry(), &resolver(), "PLA", 3, DetailLevel::Full).is_empty());
    }

    #[test]
    fn test_complete_inserts_editable_parameters_only() {
        let items = complete(&registry(), &resolver(), "ev", 2, DetailLevel::Full);
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].insert_text, "every n pat");
        assert_eq!(items[0].detail, "every *n* *f*");
    }

    #[test]
    fn test_complete_without_editable_parameters() {
        let items = complete(&registry(), &resolver(), "st", 2, DetailLevel::Full);
        assert_eq!(items[0].insert_text, "stop");
    }

    #[test]
    fn test_complete_documentation_omits_signature() {
        let items = complete(&registry(), &resolver(), "ev", 2, DetailLevel::NoExamplesNoLinks);
        let docs = items[0].documentation.as_ref().unwrap();
        assert!(docs.value().starts_with("Applies f every n cycles."));
        assert!(!docs.value().contains("Examples:"));

        let items = complete(&registry(), &resolver(), "ev", 2, DetailLevel::Off);
        assert!(items[0].documentation.is_none());
    }

    #[test]
    fn test_complete_out_of_bounds() {
        assert!(complete(&registry(), &resolver(), "pla", 9, DetailLevel::Full).is_empty());
    }

    #[test]
    fn test_provider_uses_configured_levels() {
        let config = DocsConfig {
            bundled: false,
            hover: crate::config::HoverConfig {
                level: DetailLevel::Minimum,
            },
            ..Default::default()
        };
        let provider = DocsProvider::new(config);
        provider.reload_from(&[DefinitionSource::inline(
            "inline",
            "fast:\n  help: speeds up\n  params: { amount: factor }\n",
        )]);
        let hover = provider.hover("fast 2", 0, 1).unwrap();
        assert_eq!(hover.contents.value(), "fast amount");
    }

    #[test]
    fn test_provider_reload_uses_bundled_sources() {
        let provider = DocsProvider::new(DocsConfig::default());
        let report = provider.reload();
        assert!(!report.has_failures());
        assert!(provider.registry().contains("sound"));
        assert!(provider.hover("d1 $ sound \"bd\"", 0, 7).is_some());
    }
}
