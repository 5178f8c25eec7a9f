//! JSON definition tables
//!
//! Tables look like
//!
//! ```json
//! { "properties": {
//!     "width": "<length> | <percentage> | auto",
//!     "color": { "syntax": "<color>", "inherited": true }
//! } }
//! ```
//!
//! Entries keep their document order, which decides suggestion ties.
//! Repeated names are kept as separate entries so the table load can
//! report them.

use std::fmt;

use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};

use crate::error::DefinitionLoadError;
use crate::properties::PropertyDefinition;

/// Definitions shipped with the crate
const BUNDLED_PROPERTIES: &str = include_str!("../data/properties.json");

#[derive(Deserialize)]
struct DefinitionsFile {
    #[serde(deserialize_with = "entries_in_order")]
    properties: Vec<(String, RawDefinition)>,
}

/// Collects `name: definition` pairs exactly as written
struct EntriesVisitor;

impl<'de> Visitor<'de> for EntriesVisitor {
    type Value = Vec<(String, RawDefinition)>;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a map of property definitions")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some(entry) = map.next_entry()? {
            entries.push(entry);
        }
        Ok(entries)
    }
}

fn entries_in_order<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<(String, RawDefinition)>, D::Error> {
    deserializer.deserialize_map(EntriesVisitor)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawDefinition {
    Syntax(String),
    Detailed {
        syntax: String,
        #[serde(default)]
        inherited: Option<bool>,
        #[serde(default)]
        description: Option<String>,
    },
}

impl RawDefinition {
    fn into_definition(self, name: String) -> PropertyDefinition {
        match self {
            RawDefinition::Syntax(syntax) => PropertyDefinition::new(name, syntax),
            RawDefinition::Detailed { syntax, inherited, description } => PropertyDefinition {
                name,
                syntax,
                inherited,
                description,
            },
        }
    }
}

/// Read a definitions table from JSON text
pub fn parse_definitions(text: &str) -> Result<Vec<PropertyDefinition>, DefinitionLoadError> {
    let file: DefinitionsFile = serde_json::from_str(text)?;
    Ok(file
        .properties
        .into_iter()
        .map(|(name, raw)| raw.into_definition(name))
        .collect())
}

/// The bundled table of UI style properties
pub fn default_definitions() -> Result<Vec<PropertyDefinition>, DefinitionLoadError> {
    parse_definitions(BUNDLED_PROPERTIES)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MalformedEntry;
    use crate::properties::PropertyInfoCache;

    #[test]
    fn test_both_entry_forms() {
        let definitions = parse_definitions(
            r#"{ "properties": {
                "width": "<length> | auto",
                "color": { "syntax": "<color>", "inherited": true, "description": "Text color" },
                "opacity": { "syntax": "<number>" }
            } }"#,
        )
        .unwrap();

        assert_eq!(
            definitions,
            vec![
                PropertyDefinition::new("width", "<length> | auto"),
                PropertyDefinition::new("color", "<color>").inherited(true).description("Text color"),
                PropertyDefinition::new("opacity", "<number>"),
            ]
        );
    }

    #[test]
    fn test_document_order_kept() {
        let definitions = parse_definitions(r#"{ "properties": { "z": "a", "b": "b", "m": "c" } }"#).unwrap();
        let names: Vec<_> = definitions.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["z", "b", "m"]);
    }

    #[test]
    fn test_duplicate_keys_rejected() {
        let text = r#"{ "properties": { "width": "<length>", "height": "auto", "width": "<nope>" } }"#;
        let definitions = parse_definitions(text).unwrap();
        let names: Vec<_> = definitions.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["width", "height", "width"]);
        assert_eq!(definitions[2].syntax, "<nope>");

        let cache = PropertyInfoCache::new();
        cache.load_definitions(vec![PropertyDefinition::new("opacity", "<number>")]).unwrap();
        match cache.load_definitions(definitions) {
            Err(DefinitionLoadError::MalformedEntries { entries }) => assert_eq!(
                entries,
                vec![MalformedEntry::Duplicate { index: 2, name: "width".to_string() }]
            ),
            other => panic!("expected malformed entries, got {:?}", other),
        }
        assert!(cache.try_get("opacity").is_some());
        assert!(cache.try_get("height").is_none());
    }

    #[test]
    fn test_rejects_bad_json() {
        assert!(matches!(parse_definitions("{"), Err(DefinitionLoadError::Json(_))));
        assert!(matches!(parse_definitions(r#"{ "props": {} }"#), Err(DefinitionLoadError::Json(_))));
        assert!(matches!(
            parse_definitions(r#"{ "properties": { "width": 12 } }"#),
            Err(DefinitionLoadError::Json(_))
        ));
    }

    #[test]
    fn test_bundled_definitions_parse() {
        let definitions = default_definitions().unwrap();
        assert!(definitions.len() > 50);
        assert!(definitions.iter().any(|d| d.name == "width"));
        assert!(definitions.iter().any(|d| d.name == "-unity-font-style" && d.inherited == Some(true)));
    }
}
