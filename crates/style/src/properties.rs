//! Property Definitions
//!
//! The table of known properties and the value grammar each one accepts.
//! A table is loaded wholesale into an immutable [`PropertySnapshot`], and
//! [`PropertyInfoCache`] swaps whole snapshots so readers never observe a
//! partially loaded table.

use std::sync::Arc;

use log::{info, warn};
use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use styleval_syntax::{GrammarResult, SyntaxCache, SyntaxNode, SyntaxParser, SyntaxResolver};

use crate::distance::bounded_levenshtein;
use crate::error::{DefinitionLoadError, MalformedEntry};

/// Whether a property is inherited by default
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Inheritance {
    /// Property is inherited from parent
    Inherited,
    /// Property is not inherited (uses initial value)
    NotInherited,
}

impl From<bool> for Inheritance {
    fn from(inherited: bool) -> Self {
        if inherited {
            Inheritance::Inherited
        } else {
            Inheritance::NotInherited
        }
    }
}

/// One entry of a definitions payload, as handed to
/// [`PropertyInfoCache::load_definitions`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDefinition {
    pub name: String,
    pub syntax: String,
    pub inherited: Option<bool>,
    pub description: Option<String>,
}

impl PropertyDefinition {
    pub fn new(name: impl Into<String>, syntax: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            syntax: syntax.into(),
            inherited: None,
            description: None,
        }
    }

    pub fn inherited(mut self, inherited: bool) -> Self {
        self.inherited = Some(inherited);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// A registered property
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyDescriptor {
    /// The property name, unique within a table
    pub name: String,
    /// Value grammar as authored
    pub syntax: String,
    pub inheritance: Option<Inheritance>,
    pub description: Option<String>,
}

impl From<PropertyDefinition> for PropertyDescriptor {
    fn from(definition: PropertyDefinition) -> Self {
        Self {
            name: definition.name,
            syntax: definition.syntax,
            inheritance: definition.inherited.map(Inheritance::from),
            description: definition.description,
        }
    }
}

/// One immutable version of the property table, with the grammars
/// compiled against it
#[derive(Default)]
pub struct PropertySnapshot {
    version: u64,
    /// Insertion order
    descriptors: Vec<PropertyDescriptor>,
    index: FxHashMap<String, usize>,
    /// ASCII-lowercased names, parallel to `descriptors`
    folded_names: Vec<String>,
    grammars: SyntaxCache,
}

impl PropertySnapshot {
    fn build(
        definitions: Vec<PropertyDefinition>,
        version: u64,
        reserved_prefix: &str,
    ) -> Result<Self, Vec<MalformedEntry>> {
        let mut malformed = Vec::new();
        let mut descriptors = Vec::with_capacity(definitions.len());
        let mut index = FxHashMap::default();

        for (i, definition) in definitions.into_iter().enumerate() {
            if let Some(problem) = check_definition(i, &definition, reserved_prefix) {
                malformed.push(problem);
                continue;
            }
            if index.contains_key(&definition.name) {
                malformed.push(MalformedEntry::Duplicate { index: i, name: definition.name });
                continue;
            }
            index.insert(definition.name.clone(), descriptors.len());
            descriptors.push(PropertyDescriptor::from(definition));
        }

        if !malformed.is_empty() {
            return Err(malformed);
        }

        let folded_names = descriptors.iter().map(|d| d.name.to_ascii_lowercase()).collect();
        Ok(Self {
            version,
            descriptors,
            index,
            folded_names,
            grammars: SyntaxCache::new(),
        })
    }

    /// Number of successful loads that led to this snapshot
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }

    /// Exact, case-sensitive lookup
    pub fn try_get(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.index.get(name).map(|&i| &self.descriptors[i])
    }

    /// Descriptors in the order they were loaded
    pub fn descriptors(&self) -> &[PropertyDescriptor] {
        &self.descriptors
    }

    /// The registered name closest to `name`, ignoring ASCII case, within
    /// `max_distance` edits. Ties go to the name loaded first.
    pub fn find_closest_name(&self, name: &str, max_distance: usize) -> Option<&str> {
        let folded = name.to_ascii_lowercase();
        let mut best: Option<(usize, usize)> = None;

        for (i, candidate) in self.folded_names.iter().enumerate() {
            let limit = best.map_or(max_distance, |(d, _)| d);
            match bounded_levenshtein(&folded, candidate, limit) {
                Some(0) => return Some(&self.descriptors[i].name),
                Some(d) if best.map_or(true, |(b, _)| d < b) => best = Some((d, i)),
                _ => {}
            }
        }

        best.map(|(_, i)| self.descriptors[i].name.as_str())
    }

    /// The compiled grammar of `descriptor`, compiling it on first use
    pub fn compiled(&self, descriptor: &PropertyDescriptor) -> GrammarResult<Arc<SyntaxNode>> {
        self.grammars.get_or_parse(&descriptor.syntax, &SyntaxParser::with_resolver(self))
    }

    /// Grammars compiled against this snapshot so far
    pub fn grammars(&self) -> &SyntaxCache {
        &self.grammars
    }
}

impl SyntaxResolver for PropertySnapshot {
    fn property_syntax(&self, name: &str) -> Option<&str> {
        self.try_get(name).map(|d| d.syntax.as_str())
    }
}

fn check_definition(index: usize, definition: &PropertyDefinition, reserved_prefix: &str) -> Option<MalformedEntry> {
    let name = &definition.name;
    if name.is_empty() {
        return Some(MalformedEntry::EmptyName { index });
    }
    if let Some(character) = name.chars().find(|&c| !(c.is_ascii_alphanumeric() || c == '-' || c == '_')) {
        return Some(MalformedEntry::InvalidName { index, name: name.clone(), character });
    }
    if !reserved_prefix.is_empty() && name.starts_with(reserved_prefix) {
        return Some(MalformedEntry::ReservedPrefix {
            index,
            name: name.clone(),
            prefix: reserved_prefix.to_string(),
        });
    }
    if definition.syntax.trim().is_empty() {
        return Some(MalformedEntry::EmptySyntax { index, name: name.clone() });
    }
    None
}

/// Shared, reloadable property table
pub struct PropertyInfoCache {
    current: RwLock<Arc<PropertySnapshot>>,
    reserved_prefix: String,
}

impl Default for PropertyInfoCache {
    fn default() -> Self {
        Self::new()
    }
}

impl PropertyInfoCache {
    /// An empty table reserving the `--` custom property prefix
    pub fn new() -> Self {
        Self::with_reserved_prefix("--")
    }

    pub fn with_reserved_prefix(prefix: impl Into<String>) -> Self {
        Self {
            current: RwLock::new(Arc::new(PropertySnapshot::default())),
            reserved_prefix: prefix.into(),
        }
    }

    /// Replace the whole table.
    ///
    /// Every malformed entry is reported at once; on failure the previous
    /// table stays active. Returns the new snapshot's version.
    pub fn load_definitions(&self, definitions: Vec<PropertyDefinition>) -> Result<u64, DefinitionLoadError> {
        let mut current = self.current.write();
        let version = current.version + 1;

        let snapshot = PropertySnapshot::build(definitions, version, &self.reserved_prefix).map_err(|entries| {
            for entry in &entries {
                warn!("rejected property definition: {}", entry);
            }
            DefinitionLoadError::MalformedEntries { entries }
        })?;

        info!("loaded {} property definitions (version {})", snapshot.len(), version);
        *current = Arc::new(snapshot);
        Ok(version)
    }

    /// The table as it is right now; later reloads do not affect it
    pub fn snapshot(&self) -> Arc<PropertySnapshot> {
        self.current.read().clone()
    }

    pub fn try_get(&self, name: &str) -> Option<PropertyDescriptor> {
        self.snapshot().try_get(name).cloned()
    }

    pub fn find_closest_name(&self, name: &str, max_distance: usize) -> Option<String> {
        self.snapshot().find_closest_name(name, max_distance).map(str::to_string)
    }

    pub fn version(&self) -> u64 {
        self.current.read().version
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use styleval_syntax::GrammarError;

    fn sample() -> Vec<PropertyDefinition> {
        vec![
            PropertyDefinition::new("width", "<length> | <percentage> | auto"),
            PropertyDefinition::new("height", "<length> | <percentage> | auto"),
            PropertyDefinition::new("color", "<color>").inherited(true),
            PropertyDefinition::new("flex-basis", "<'width'>"),
        ]
    }

    fn loaded() -> PropertyInfoCache {
        let cache = PropertyInfoCache::new();
        cache.load_definitions(sample()).unwrap();
        cache
    }

    #[test]
    fn test_lookup() {
        let cache = loaded();
        let color = cache.try_get("color").unwrap();
        assert_eq!(color.syntax, "<color>");
        assert_eq!(color.inheritance, Some(Inheritance::Inherited));
        assert_eq!(cache.try_get("width").unwrap().inheritance, None);
        assert!(cache.try_get("margin").is_none());
    }

    #[test]
    fn test_lookup_case_sensitive() {
        let cache = loaded();
        assert!(cache.try_get("Width").is_none());
        assert_eq!(cache.find_closest_name("Width", 2).as_deref(), Some("width"));
    }

    #[test]
    fn test_insertion_order() {
        let snapshot = loaded().snapshot();
        let names: Vec<_> = snapshot.descriptors().iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["width", "height", "color", "flex-basis"]);
    }

    #[test]
    fn test_closest_name() {
        let cache = loaded();
        assert_eq!(cache.find_closest_name("wdth", 2).as_deref(), Some("width"));
        assert_eq!(cache.find_closest_name("hieght", 2).as_deref(), Some("height"));
        assert_eq!(cache.find_closest_name("flex-basi", 2).as_deref(), Some("flex-basis"));
        assert_eq!(cache.find_closest_name("border-radius", 2), None);
        assert_eq!(cache.find_closest_name("colr", 0), None);
    }

    #[test]
    fn test_closest_name_tie_prefers_first_loaded() {
        let cache = PropertyInfoCache::new();
        cache
            .load_definitions(vec![
                PropertyDefinition::new("top", "<length>"),
                PropertyDefinition::new("tap", "<length>"),
            ])
            .unwrap();
        assert_eq!(cache.find_closest_name("tip", 2).as_deref(), Some("top"));
    }

    #[test]
    fn test_malformed_entries_reported_together() {
        let cache = loaded();
        let err = cache
            .load_definitions(vec![
                PropertyDefinition::new("", "auto"),
                PropertyDefinition::new("bad name", "auto"),
                PropertyDefinition::new("--custom", "auto"),
                PropertyDefinition::new("empty", "  "),
                PropertyDefinition::new("ok", "auto"),
                PropertyDefinition::new("ok", "none"),
            ])
            .unwrap_err();

        let DefinitionLoadError::MalformedEntries { entries } = err else {
            panic!("expected malformed entries");
        };
        assert_eq!(
            entries,
            vec![
                MalformedEntry::EmptyName { index: 0 },
                MalformedEntry::InvalidName { index: 1, name: "bad name".into(), character: ' ' },
                MalformedEntry::ReservedPrefix { index: 2, name: "--custom".into(), prefix: "--".into() },
                MalformedEntry::EmptySyntax { index: 3, name: "empty".into() },
                MalformedEntry::Duplicate { index: 5, name: "ok".into() },
            ]
        );

        // Previous table is still active
        assert_eq!(cache.version(), 1);
        assert!(cache.try_get("width").is_some());
        assert!(cache.try_get("ok").is_none());
    }

    #[test]
    fn test_reload_replaces_table() {
        let cache = loaded();
        let before = cache.snapshot();
        let version = cache.load_definitions(vec![PropertyDefinition::new("opacity", "<number>")]).unwrap();

        assert_eq!(version, 2);
        assert!(cache.try_get("width").is_none());
        assert!(cache.try_get("opacity").is_some());
        // Snapshots taken earlier are unaffected
        assert!(before.try_get("width").is_some());
        assert_eq!(before.version(), 1);
    }

    #[test]
    fn test_compiled_resolves_references() {
        let snapshot = loaded().snapshot();
        let flex_basis = snapshot.try_get("flex-basis").unwrap();
        let tree = snapshot.compiled(flex_basis).unwrap();
        assert_eq!(tree.to_string(), "<length> | <percentage> | auto");

        let again = snapshot.compiled(flex_basis).unwrap();
        assert!(Arc::ptr_eq(&tree, &again));
        assert_eq!(snapshot.grammars().len(), 1);
    }

    #[test]
    fn test_reload_discards_compiled_grammars() {
        let cache = loaded();
        let first = cache.snapshot();
        first.compiled(first.try_get("width").unwrap()).unwrap();
        assert_eq!(first.grammars().len(), 1);

        cache.load_definitions(sample()).unwrap();
        assert!(cache.snapshot().grammars().is_empty());
    }

    #[test]
    fn test_reference_to_unknown_property() {
        let cache = PropertyInfoCache::new();
        cache.load_definitions(vec![PropertyDefinition::new("inset", "<'offset'>")]).unwrap();
        let snapshot = cache.snapshot();
        let err = snapshot.compiled(snapshot.try_get("inset").unwrap()).unwrap_err();
        assert!(matches!(err, GrammarError::UnknownProperty { .. }));
    }
}
