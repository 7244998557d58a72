//! Definition sources and per-source loading.
//!
//! A [`DefinitionSource`] names where a definitions tree comes from: a file
//! on disk, inline text, or the definitions bundled into this crate. Loading
//! a source reads its text, decodes it as YAML (JSON is accepted as a YAML
//! subset), and parses the tree.
//!
//! ```
//! use command_docs_db::{DefinitionSource, ParseOptions, load_source};
//!
//! let source = DefinitionSource::inline("scratch", "hush:\n  help: Stops everything.\n");
//! let parsed = load_source(&source, &ParseOptions::default()).unwrap();
//! assert_eq!(parsed.descriptions[0].command(), "hush");
//! ```

use std::fmt;
use std::path::{Path, PathBuf};

use serde::de::{self, Deserialize, Deserializer, EnumAccess, MapAccess, SeqAccess, VariantAccess, Visitor};
use serde_yaml::value::{Tag, TaggedValue};
use serde_yaml::{Mapping, Number, Value};
use tracing::debug;

use crate::error::Result;
use crate::parser::{ParseOptions, ParsedDefinitions, parse_definitions};

/// Definitions compiled into the crate.
pub const BUNDLED_DEFINITIONS: &str = include_str!("../definitions/default.yaml");

/// Label reported for the bundled definitions.
pub const BUNDLED_LABEL: &str = "<bundled>";

/// Describes where a definitions tree is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DefinitionSource {
    /// A YAML or JSON file on disk.
    File(PathBuf),
    /// Text supplied directly, with a label for messages.
    Inline { label: String, text: String },
    /// The definitions compiled into this crate.
    Bundled,
}

impl DefinitionSource {
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File(path.into())
    }

    pub fn inline(label: impl Into<String>, text: impl Into<String>) -> Self {
        Self::Inline {
            label: label.into(),
            text: text.into(),
        }
    }

    /// Names the origin of this source in errors and warnings.
    pub fn label(&self) -> String {
        match self {
            Self::File(path) => path.display().to_string(),
            Self::Inline { label, .. } => label.clone(),
            Self::Bundled => BUNDLED_LABEL.to_string(),
        }
    }

    /// Reads the raw text of this source.
    ///
    /// # Errors
    ///
    /// Returns [`IoError`](crate::DocsError::IoError) if a file source
    /// cannot be read.
    pub fn read(&self) -> Result<String> {
        match self {
            Self::File(path) => read_file(path),
            Self::Inline { text, .. } => Ok(text.clone()),
            Self::Bundled => Ok(BUNDLED_DEFINITIONS.to_string()),
        }
    }
}

fn read_file(path: &Path) -> Result<String> {
    let text = std::fs::read_to_string(path)?;
    debug!(path = %path.display(), bytes = text.len(), "Read definition file");
    Ok(text)
}

/// Decodes definition text into a loosely-typed tree.
///
/// A key repeated within one mapping keeps its last value, at the position
/// of its first occurrence.
///
/// # Errors
///
/// Returns [`YamlError`](crate::DocsError::YamlError) if the text is not
/// valid YAML.
pub fn decode_definitions(text: &str) -> Result<Value> {
    let LastWins(tree) = serde_yaml::from_str(text)?;
    Ok(tree)
}

/// A YAML tree whose mappings overwrite repeated keys instead of rejecting
/// them.
struct LastWins(Value);

impl<'de> Deserialize<'de> for LastWins {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(LastWinsVisitor).map(LastWins)
    }
}

struct LastWinsVisitor;

impl<'de> Visitor<'de> for LastWinsVisitor {
    type Value = Value;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("any YAML value")
    }

    fn visit_bool<E: de::Error>(self, b: bool) -> std::result::Result<Value, E> {
        Ok(Value::Bool(b))
    }

    fn visit_i64<E: de::Error>(self, i: i64) -> std::result::Result<Value, E> {
        Ok(Value::Number(Number::from(i)))
    }

    fn visit_u64<E: de::Error>(self, u: u64) -> std::result::Result<Value, E> {
        Ok(Value::Number(Number::from(u)))
    }

    fn visit_f64<E: de::Error>(self, f: f64) -> std::result::Result<Value, E> {
        Ok(Value::Number(Number::from(f)))
    }

    fn visit_str<E: de::Error>(self, s: &str) -> std::result::Result<Value, E> {
        Ok(Value::String(s.to_owned()))
    }

    fn visit_string<E: de::Error>(self, s: String) -> std::result::Result<Value, E> {
        Ok(Value::String(s))
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_none<E: de::Error>(self) -> std::result::Result<Value, E> {
        Ok(Value::Null)
    }

    fn visit_some<D>(self, deserializer: D) -> std::result::Result<Value, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(self)
    }

    fn visit_seq<A>(self, mut seq: A) -> std::result::Result<Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut items = Vec::with_capacity(seq.size_hint().unwrap_or(0));
        while let Some(LastWins(item)) = seq.next_element()? {
            items.push(item);
        }
        Ok(Value::Sequence(items))
    }

    fn visit_map<A>(self, mut map: A) -> std::result::Result<Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut mapping = Mapping::new();
        while let Some((LastWins(key), LastWins(value))) = map.next_entry()? {
            mapping.insert(key, value);
        }
        Ok(Value::Mapping(mapping))
    }

    fn visit_enum<A>(self, data: A) -> std::result::Result<Value, A::Error>
    where
        A: EnumAccess<'de>,
    {
        let (tag, contents) = data.variant::<String>()?;
        let LastWins(value) = contents.newtype_variant()?;
        Ok(Value::Tagged(Box::new(TaggedValue {
            tag: Tag::new(tag),
            value,
        })))
    }
}

/// Reads, decodes, and parses one definition source.
///
/// # Errors
///
/// Fails if the source cannot be read or decoded, or if the tree has a
/// fatal structural violation (see [`parse_definitions`]).
pub fn load_source(source: &DefinitionSource, options: &ParseOptions) -> Result<ParsedDefinitions> {
    let label = source.label();
    let text = source.read()?;
    let tree = decode_definitions(&text)?;
    Ok(parse_definitions(&tree, &label, options)?)
}
