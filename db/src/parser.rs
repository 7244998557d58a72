//! Tolerant parsing of loosely-typed definition trees.
//!
//! A definitions tree is a mapping from command name to either a string
//! (an alias naming the real command, with no further metadata) or a
//! descriptor mapping. Descriptor properties are case-sensitive and accept
//! synonyms:
//!
//! | meaning           | property names                            |
//! |-------------------|-------------------------------------------|
//! | signature lines   | `cmd`, `formattedCommand`                 |
//! | return value      | `return`, `returns`                       |
//! | help prose        | `help`, `doc`                             |
//! | parameters        | `parm`, `param`, `params`, `parameters`   |
//! | examples          | `example`, `examples`                     |
//!
//! Only non-string keys and non-mapping command values are fatal. Any other
//! shape mismatch drops the field and records a warning.
//!
//! # Example
//!
//! ```
//! use command_docs_db::{ParseOptions, parse_definitions};
//!
//! let yaml = r#"
//! fast:
//!   help: Speeds up a pattern.
//!   params:
//!     amount: speed-up factor
//!     pattern: the pattern
//! hush: {}
//! "#;
//! let tree: serde_yaml::Value = serde_yaml::from_str(yaml).unwrap();
//! let parsed = parse_definitions(&tree, "inline", &ParseOptions::default()).unwrap();
//!
//! assert_eq!(parsed.descriptions.len(), 2);
//! assert_eq!(parsed.descriptions[0].formatted_command()[0].value(), "fast amount pattern");
//! assert_eq!(parsed.descriptions[1].formatted_command()[0].value(), "hush ?");
//! ```

use command_docs_core::{
    CommandDescription, CommandDescriptionConfig, DEFAULT_CODE_LANGUAGE, ParameterDescription,
    ParameterType,
};
use serde_yaml::{Mapping, Value};
use tracing::debug;

use crate::error::DefinitionError;

/// Options applied to every description built by the parser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Fence language for example blocks.
    pub code_language: String,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            code_language: DEFAULT_CODE_LANGUAGE.to_string(),
        }
    }
}

/// Descriptions parsed from one definitions tree.
#[derive(Debug, Clone, Default)]
pub struct ParsedDefinitions {
    /// One description per top-level entry, in source order.
    pub descriptions: Vec<CommandDescription>,
    /// Fields that were tolerated but discarded.
    pub warnings: Vec<String>,
}

/// Parses a decoded definitions tree into command descriptions.
///
/// `label` names the tree's origin in errors and warnings. An empty
/// (`null`) tree yields no descriptions.
///
/// # Errors
///
/// Returns a [`DefinitionError`] when the top level is not a mapping, a
/// command name, property key, or parameter name is not a string, or a
/// command value is not a string, mapping, or null.
pub fn parse_definitions(
    tree: &Value,
    label: &str,
    options: &ParseOptions,
) -> Result<ParsedDefinitions, DefinitionError> {
    let mut parsed = ParsedDefinitions::default();

    let entries = match untagged(tree) {
        Value::Null => return Ok(parsed),
        Value::Mapping(entries) => entries,
        other => {
            return Err(DefinitionError::NotAMapping {
                label: label.to_string(),
                found: describe(other).to_string(),
            });
        }
    };

    for (key, value) in entries {
        let Value::String(name) = untagged(key) else {
            return Err(DefinitionError::NonStringCommandKey {
                label: label.to_string(),
                found: describe(key).to_string(),
            });
        };

        let description = match untagged(value) {
            Value::String(alias) => CommandDescription::bare(alias.as_str()),
            Value::Null => DescriptorParser::new(label, name, &mut parsed.warnings)
                .parse(&Mapping::new(), options)?,
            Value::Mapping(properties) => {
                DescriptorParser::new(label, name, &mut parsed.warnings)
                    .parse(properties, options)?
            }
            other => {
                return Err(DefinitionError::InvalidCommandValue {
                    label: label.to_string(),
                    command: name.clone(),
                    found: describe(other).to_string(),
                });
            }
        };
        parsed.descriptions.push(description);
    }

    debug!(
        source = label,
        commands = parsed.descriptions.len(),
        warnings = parsed.warnings.len(),
        "Parsed definitions"
    );
    Ok(parsed)
}

struct DescriptorParser<'a> {
    label: &'a str,
    command: &'a str,
    warnings: &'a mut Vec<String>,
}

impl<'a> DescriptorParser<'a> {
    fn new(label: &'a str, command: &'a str, warnings: &'a mut Vec<String>) -> Self {
        Self {
            label,
            command,
            warnings,
        }
    }

    fn parse(
        mut self,
        properties: &Mapping,
        options: &ParseOptions,
    ) -> Result<CommandDescription, DefinitionError> {
        let mut config = CommandDescriptionConfig {
            code_language: options.code_language.clone(),
            ..Default::default()
        };

        for (key, value) in properties {
            let Value::String(property) = untagged(key) else {
                return Err(DefinitionError::NonStringPropertyKey {
                    label: self.label.to_string(),
                    command: self.command.to_string(),
                    found: describe(key).to_string(),
                });
            };
            let value = untagged(value);
            if value.is_null() {
                continue;
            }

            match property.as_str() {
                "cmd" | "formattedCommand" => {
                    config.formatted_command = self.string_list(property, value);
                }
                "return" | "returns" => config.returns = self.string(property, value),
                "help" | "doc" => config.help = self.string(property, value),
                "parm" | "param" | "params" | "parameters" => {
                    config.parameters = self.parameters(property, value)?;
                }
                "example" | "examples" => {
                    config.examples = self.string_list(property, value).unwrap_or_default();
                }
                _ => self.warn(format!("ignored unknown property '{property}'")),
            }
        }

        Ok(CommandDescription::new(self.command, config))
    }

    fn string(&mut self, property: &str, value: &Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s.clone()),
            other => {
                self.warn(format!(
                    "discarded '{property}': expected a string, found {}",
                    describe(other)
                ));
                None
            }
        }
    }

    fn string_list(&mut self, property: &str, value: &Value) -> Option<Vec<String>> {
        match value {
            Value::String(s) => Some(vec![s.clone()]),
            Value::Sequence(items) => {
                let mut strings = Vec::with_capacity(items.len());
                for (idx, item) in items.iter().enumerate() {
                    match untagged(item) {
                        Value::String(s) => strings.push(s.clone()),
                        other => self.warn(format!(
                            "dropped '{property}' item {idx}: expected a string, found {}",
                            describe(other)
                        )),
                    }
                }
                Some(strings)
            }
            other => {
                self.warn(format!(
                    "discarded '{property}': expected a string or a sequence, found {}",
                    describe(other)
                ));
                None
            }
        }
    }

    fn parameters(
        &mut self,
        property: &str,
        value: &Value,
    ) -> Result<Option<Vec<ParameterDescription>>, DefinitionError> {
        let Value::Mapping(entries) = value else {
            self.warn(format!(
                "discarded '{property}': expected a mapping, found {}",
                describe(value)
            ));
            return Ok(None);
        };

        let mut params: Vec<ParameterDescription> = Vec::with_capacity(entries.len());
        for (key, value) in entries {
            let Value::String(name) = untagged(key) else {
                return Err(DefinitionError::NonStringParameterKey {
                    label: self.label.to_string(),
                    command: self.command.to_string(),
                    found: describe(key).to_string(),
                });
            };
            let param = self.parameter(name, untagged(value));
            match params.iter_mut().find(|p| p.name == *name) {
                Some(existing) => *existing = param,
                None => params.push(param),
            }
        }
        Ok(Some(params))
    }

    fn parameter(&mut self, name: &str, value: &Value) -> ParameterDescription {
        let Value::Mapping(fields) = value else {
            return ParameterDescription::new(name, &scalar_text(value));
        };

        let mut help = String::new();
        let mut param_type = None;
        let mut editable = false;
        for (key, field) in fields {
            let field = untagged(field);
            match (untagged(key).as_str(), field) {
                (Some("help" | "doc"), Value::String(text)) => help = text.clone(),
                (Some("type"), Value::String(text)) => match text.parse::<ParameterType>() {
                    Ok(ty) => param_type = Some(ty),
                    Err(err) => self.warn(format!("parameter '{name}': {err}")),
                },
                (Some("editable"), Value::Bool(flag)) => editable = *flag,
                (Some(field_name), other) => self.warn(format!(
                    "parameter '{name}': ignored field '{field_name}' ({})",
                    describe(other)
                )),
                (None, _) => self.warn(format!("parameter '{name}': ignored non-string field")),
            }
        }

        let mut param = ParameterDescription::new(name, &help);
        param.param_type = param_type;
        param.editable = editable;
        param
    }

    fn warn(&mut self, message: String) {
        let message = format!("{}: command '{}': {message}", self.label, self.command);
        debug!(warning = %message, "Tolerated definition field");
        self.warnings.push(message);
    }
}

fn untagged(value: &Value) -> &Value {
    match value {
        Value::Tagged(tagged) => untagged(&tagged.value),
        other => other,
    }
}

/// String representation of a plain parameter value.
fn scalar_text(value: &Value) -> String {
    match untagged(value) {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Sequence(items) => items.iter().map(scalar_text).collect::<Vec<_>>().join(","),
        Value::Mapping(_) | Value::Tagged(_) => String::new(),
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Sequence(_) => "a sequence",
        Value::Mapping(_) => "a mapping",
        Value::Tagged(tagged) => describe(&tagged.value),
    }
}

#[cfg(test)]
mod tests {
    use command_docs_core::{DetailLevel, LINE_BREAK};

    use super::*;

    fn parse(yaml: &str) -> Result<ParsedDefinitions, DefinitionError> {
        let tree: Value = serde_yaml::from_str(yaml).unwrap();
        parse_definitions(&tree, "test.yaml", &ParseOptions::default())
    }

    fn signature(desc: &CommandDescription) -> Vec<&str> {
        desc.formatted_command().iter().map(|m| m.value()).collect()
    }

    #[test]
    fn test_preserves_source_order() {
        let parsed = parse("zeta: {}\nalpha: {}\nmid: {}\n").unwrap();
        let names: Vec<&str> = parsed.descriptions.iter().map(|d| d.command()).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_string_value_is_alias() {
        let parsed = parse("s: sound\n").unwrap();
        let desc = &parsed.descriptions[0];
        assert_eq!(desc.command(), "sound");
        assert_eq!(signature(desc), vec!["sound ?"]);
        assert!(desc.help().is_none());
    }

    #[test]
    fn test_null_value_is_empty_descriptor() {
        let parsed = parse("hush:\n").unwrap();
        assert_eq!(parsed.descriptions[0].command(), "hush");
        assert_eq!(signature(&parsed.descriptions[0]), vec!["hush ?"]);
    }

    #[test]
    fn test_empty_document() {
        let parsed = parse("").unwrap();
        assert!(parsed.descriptions.is_empty());
    }

    #[test]
    fn test_property_synonyms() {
        let yaml = r#"
a:
  formattedCommand: "a x"
  returns: "r"
  doc: "d"
  parm: { x: "px" }
  example: "ex"
b:
  cmd: ["b y", "b z"]
  return: "r2"
  help: "h2"
  parameters: { y: "py" }
  examples: ["e1", "e2"]
"#;
        let parsed = parse(yaml).unwrap();
        let a = &parsed.descriptions[0];
        assert_eq!(signature(a), vec!["a x"]);
        assert_eq!(a.returns().unwrap().value(), "r");
        assert_eq!(a.help().unwrap().value(), "d");
        assert_eq!(a.parameters()[0].name, "x");
        assert_eq!(a.examples().len(), 1);

        let b = &parsed.descriptions[1];
        assert_eq!(signature(b), vec!["b y", "b z"]);
        assert_eq!(b.returns().unwrap().value(), "r2");
        assert_eq!(b.help().unwrap().value(), "h2");
        assert_eq!(b.parameters()[0].help.value(), "py");
        assert_eq!(b.examples().len(), 2);
        assert!(parsed.warnings.is_empty());
    }

    #[test]
    fn test_params_synonym() {
        let parsed = parse("f:\n  params:\n    n: count\n").unwrap();
        assert_eq!(signature(&parsed.descriptions[0]), vec!["f n"]);
    }

    #[test]
    fn test_synthesized_signature_keeps_parameter_order() {
        let parsed = parse("every:\n  param:\n    n: a\n    f: b\n    pat: c\n").unwrap();
        assert_eq!(signature(&parsed.descriptions[0]), vec!["every n f pat"]);
    }

    #[test]
    fn test_empty_parameter_mapping() {
        let parsed = parse("hush:\n  params: {}\n").unwrap();
        assert_eq!(signature(&parsed.descriptions[0]), vec!["hush "]);
    }

    #[test]
    fn test_parameter_values_coerced_to_text() {
        let parsed = parse("f:\n  params:\n    n: 3\n    flag: true\n    nothing:\n").unwrap();
        let params = parsed.descriptions[0].parameters();
        assert_eq!(params[0].help.value(), "3");
        assert_eq!(params[1].help.value(), "true");
        assert_eq!(params[2].help.value(), "");
        assert!(params.iter().all(|p| !p.editable && p.param_type.is_none()));
    }

    #[test]
    fn test_tagged_parameter_name_replaces_plain_twin() {
        let parsed = parse("f:\n  params:\n    n: first\n    o: other\n    !name n: second\n").unwrap();
        let params = parsed.descriptions[0].parameters();
        let names: Vec<&str> = params.iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["n", "o"]);
        assert_eq!(params[0].help.value(), "second");
    }

    #[test]
    fn test_structured_parameter() {
        let yaml = r#"
every:
  params:
    n:
      help: cycle interval
      type: rational_pattern
      editable: true
    f: function
"#;
        let parsed = parse(yaml).unwrap();
        let params = parsed.descriptions[0].parameters();
        assert_eq!(params[0].help.value(), "cycle interval");
        assert_eq!(params[0].param_type, Some(ParameterType::RationalPattern));
        assert!(params[0].editable);
        assert!(!params[1].editable);
    }

    #[test]
    fn test_unknown_parameter_type_warns() {
        let parsed = parse("f:\n  params:\n    n: { type: string, help: x }\n").unwrap();
        let param = &parsed.descriptions[0].parameters()[0];
        assert!(param.param_type.is_none());
        assert_eq!(param.help.value(), "x");
        assert_eq!(parsed.warnings.len(), 1);
    }

    #[test]
    fn test_wrong_shapes_are_discarded() {
        let yaml = r#"
f:
  returns: 42
  help: [not, a, string]
  cmd: 7
  params: "n m"
  examples: { a: b }
"#;
        let parsed = parse(yaml).unwrap();
        let desc = &parsed.descriptions[0];
        assert!(desc.returns().is_none());
        assert!(desc.help().is_none());
        assert!(desc.parameters().is_empty());
        assert!(desc.examples().is_empty());
        assert_eq!(signature(desc), vec!["f ?"]);
        assert_eq!(parsed.warnings.len(), 5);
        assert!(parsed.warnings[0].starts_with("test.yaml: command 'f'"));
    }

    #[test]
    fn test_non_strings_dropped_from_sequences() {
        let parsed = parse("f:\n  cmd: [\"f x\", 3, \"f y\"]\n  examples: [1, \"ok\"]\n").unwrap();
        let desc = &parsed.descriptions[0];
        assert_eq!(signature(desc), vec!["f x", "f y"]);
        assert_eq!(desc.examples().len(), 1);
        assert_eq!(parsed.warnings.len(), 2);
    }

    #[test]
    fn test_unknown_property_ignored() {
        let parsed = parse("f:\n  help: h\n  links: [a]\n").unwrap();
        assert_eq!(parsed.descriptions[0].help().unwrap().value(), "h");
        assert_eq!(parsed.warnings.len(), 1);
    }

    #[test]
    fn test_property_names_are_case_sensitive() {
        let parsed = parse("f:\n  Help: h\n").unwrap();
        assert!(parsed.descriptions[0].help().is_none());
    }

    #[test]
    fn test_later_synonym_wins() {
        let parsed = parse("f:\n  help: first\n  doc: second\n").unwrap();
        assert_eq!(parsed.descriptions[0].help().unwrap().value(), "second");
    }

    #[test]
    fn test_examples_normalized() {
        let parsed = parse("f:\n  example: \"line one\\r\\nline two\\n\\n\"\n").unwrap();
        let example = &parsed.descriptions[0].examples()[0];
        let expected = ["```haskell", "line one", "line two", "```"].join(LINE_BREAK);
        assert_eq!(example.value(), expected);
    }

    #[test]
    fn test_code_language_option() {
        let tree: Value = serde_yaml::from_str("f:\n  example: x\n").unwrap();
        let options = ParseOptions {
            code_language: "tidal".into(),
        };
        let parsed = parse_definitions(&tree, "t", &options).unwrap();
        assert!(parsed.descriptions[0].examples()[0].value().starts_with("```tidal"));
    }

    #[test]
    fn test_non_string_command_key_fails() {
        let err = parse("1: {}\n").unwrap_err();
        assert!(matches!(err, DefinitionError::NonStringCommandKey { .. }));
        assert!(err.to_string().contains("test.yaml"));
    }

    #[test]
    fn test_invalid_command_value_fails() {
        let err = parse("f: 3\n").unwrap_err();
        assert_eq!(
            err,
            DefinitionError::InvalidCommandValue {
                label: "test.yaml".into(),
                command: "f".into(),
                found: "a number".into(),
            }
        );
        assert!(matches!(
            parse("f: [a]\n").unwrap_err(),
            DefinitionError::InvalidCommandValue { .. }
        ));
    }

    #[test]
    fn test_non_string_property_key_fails() {
        let err = parse("f:\n  3: x\n").unwrap_err();
        assert!(matches!(err, DefinitionError::NonStringPropertyKey { .. }));
    }

    #[test]
    fn test_non_string_parameter_key_fails() {
        let err = parse("f:\n  params:\n    7: x\n").unwrap_err();
        assert!(matches!(err, DefinitionError::NonStringParameterKey { .. }));
    }

    #[test]
    fn test_top_level_sequence_fails() {
        let err = parse("- a\n- b\n").unwrap_err();
        assert!(matches!(err, DefinitionError::NotAMapping { .. }));
    }

    #[test]
    fn test_parsed_descriptions_format_at_full() {
        let yaml = r#"
fast:
  help: Speeds up a pattern.
  params: { amount: factor }
  returns: a pattern
  examples: ["d1 $ fast 2 $ s \"bd\""]
s: sound
hush:
"#;
        let parsed = parse(yaml).unwrap();
        for desc in &parsed.descriptions {
            let text = desc.format(DetailLevel::Full, true).unwrap();
            assert!(text.value().starts_with(desc.formatted_command()[0].value()));
        }
    }
}
