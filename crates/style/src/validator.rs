//! Property validation
//!
//! Ties the property table, the grammar compiler and the matcher together
//! and turns match outcomes into user facing diagnostics.

use log::{debug, error};

use styleval_css::is_bare_number;
use styleval_syntax::{DataType, MatchErrorKind, StyleMatcher, SyntaxNode};

use crate::config::ValidatorConfig;
use crate::error::DefinitionLoadError;
use crate::json::{default_definitions, parse_definitions};
use crate::properties::{PropertyDefinition, PropertyInfoCache, PropertySnapshot};
use crate::result::{ValidationErrorKind, ValidationResult};

const MISSING_UNIT_HINT: &str = "Property expects a unit. Did you forget to add px or %?";

/// Data types whose bare-number spelling usually means a forgotten unit
const UNIT_TYPES: &[DataType] = &[DataType::Length, DataType::Percentage, DataType::LengthPercentage];

/// Validates property declarations against a reloadable table
pub struct StyleValidator {
    properties: PropertyInfoCache,
    matcher: StyleMatcher,
    config: ValidatorConfig,
}

impl Default for StyleValidator {
    fn default() -> Self {
        Self::new()
    }
}

impl StyleValidator {
    /// A validator with an empty table and the default configuration
    pub fn new() -> Self {
        Self::with_config(ValidatorConfig::default())
    }

    pub fn with_config(config: ValidatorConfig) -> Self {
        Self {
            properties: PropertyInfoCache::with_reserved_prefix(config.custom_property_prefix.clone()),
            matcher: StyleMatcher::with_max_steps(config.max_match_steps),
            config,
        }
    }

    /// A validator loaded with the bundled property table
    pub fn with_default_definitions() -> Result<Self, DefinitionLoadError> {
        let validator = Self::new();
        validator.load_definitions(default_definitions()?)?;
        Ok(validator)
    }

    pub fn config(&self) -> &ValidatorConfig {
        &self.config
    }

    pub fn properties(&self) -> &PropertyInfoCache {
        &self.properties
    }

    /// Replace the property table. Validations already running keep the
    /// table they started with.
    pub fn load_definitions(&self, definitions: Vec<PropertyDefinition>) -> Result<u64, DefinitionLoadError> {
        let version = self.properties.load_definitions(definitions)?;
        if self.config.eager_compile {
            self.compile_all();
        }
        Ok(version)
    }

    /// Replace the property table from JSON text
    pub fn load_json(&self, text: &str) -> Result<u64, DefinitionLoadError> {
        self.load_definitions(parse_definitions(text)?)
    }

    fn compile_all(&self) {
        let snapshot = self.properties.snapshot();
        for descriptor in snapshot.descriptors() {
            if let Err(err) = snapshot.compiled(descriptor) {
                error!(
                    target: "styleval::definitions",
                    "property '{}' has invalid syntax '{}': {}",
                    descriptor.name, descriptor.syntax, err
                );
            }
        }
    }

    /// Validate a single `name: value` declaration
    pub fn validate_property(&self, name: &str, value: &str) -> ValidationResult {
        let snapshot = self.properties.snapshot();
        self.validate_with(&snapshot, name, value)
    }

    /// Validate several declarations against the same table
    pub fn validate_declarations<'a, I>(&self, declarations: I) -> Vec<ValidationResult>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let snapshot = self.properties.snapshot();
        declarations
            .into_iter()
            .map(|(name, value)| self.validate_with(&snapshot, name, value))
            .collect()
    }

    fn validate_with(&self, snapshot: &PropertySnapshot, name: &str, value: &str) -> ValidationResult {
        let result = self.diagnose(snapshot, name, value);
        if !result.is_success() {
            debug!(target: "styleval::validation", "{}: {} -> {}", name, value, result);
        }
        result
    }

    fn diagnose(&self, snapshot: &PropertySnapshot, name: &str, value: &str) -> ValidationResult {
        let prefix = &self.config.custom_property_prefix;
        if !prefix.is_empty() && name.starts_with(prefix.as_str()) {
            return ValidationResult::ok();
        }

        let descriptor = match snapshot.try_get(name) {
            Some(descriptor) => descriptor,
            None => {
                let message = match snapshot.find_closest_name(name, self.config.suggestion_distance) {
                    Some(closest) => format!("Unknown property '{}' (did you mean '{}'?)", name, closest),
                    None => format!("Unknown property '{}'", name),
                };
                return ValidationResult::error(ValidationErrorKind::UnknownProperty, message);
            }
        };

        let syntax = &descriptor.syntax;
        let first_compile = snapshot.grammars().get(syntax).is_none();
        let tree = match snapshot.compiled(descriptor) {
            Ok(tree) => tree,
            Err(err) => {
                if first_compile {
                    error!(
                        target: "styleval::definitions",
                        "property '{}' has invalid syntax '{}': {}",
                        name, syntax, err
                    );
                }
                return ValidationResult::error(
                    ValidationErrorKind::InvalidGrammarDefinition,
                    format!("Invalid '{}' property syntax '{}'", name, syntax),
                );
            }
        };

        let outcome = self.matcher.match_value(&tree, value);
        match outcome.error_kind {
            MatchErrorKind::None => ValidationResult::ok(),
            MatchErrorKind::Syntax => {
                let found = outcome.error_value.as_deref().unwrap_or_default();
                ValidationResult::error(
                    ValidationErrorKind::SyntaxMismatch,
                    format!("Expected ({}) but found '{}'", syntax, found),
                )
                .with_hint(syntax_hint(&tree, value))
                .with_error_value(outcome.error_value)
            }
            MatchErrorKind::EmptyValue => ValidationResult::error(
                ValidationErrorKind::EmptyValue,
                format!("Expected ({}) but found empty value", syntax),
            ),
            MatchErrorKind::ExpectedEndOfValue => {
                let found = outcome.error_value.as_deref().unwrap_or_default();
                ValidationResult::warning(
                    ValidationErrorKind::TrailingContent,
                    format!("Expected end of value but found '{}'", found),
                )
                .with_error_value(outcome.error_value)
            }
        }
    }
}

fn syntax_hint(tree: &SyntaxNode, value: &str) -> Option<String> {
    if is_bare_number(value) && tree.mentions(UNIT_TYPES) {
        Some(MISSING_UNIT_HINT.to_string())
    } else if tree.leading_data_type() == Some(DataType::Color) {
        Some(format!("Unsupported color '{}'.", value.trim()))
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::ValidationStatus;

    fn validator() -> StyleValidator {
        let validator = StyleValidator::new();
        validator
            .load_definitions(vec![
                PropertyDefinition::new("width", "<length> | <percentage> | auto"),
                PropertyDefinition::new("height", "<length> | <percentage> | auto"),
                PropertyDefinition::new("color", "<color>"),
                PropertyDefinition::new("border-color", "<color> | none"),
                PropertyDefinition::new("display", "flex | none"),
                PropertyDefinition::new("broken", "<nope> | auto"),
            ])
            .unwrap();
        validator
    }

    #[test]
    fn test_valid_values() {
        let v = validator();
        for (name, value) in [
            ("width", "10px"),
            ("width", "50%"),
            ("width", "auto"),
            ("width", "0"),
            ("height", " 1.5em "),
            ("color", "#ff0000"),
            ("color", "rgb(0, 128, 255)"),
            ("display", "FLEX"),
            ("width", "inherit"),
        ] {
            let result = v.validate_property(name, value);
            assert!(result.is_success(), "{}: {} gave {}", name, value, result);
            assert_eq!(result.kind, None);
        }
    }

    #[test]
    fn test_missing_unit_hint() {
        let result = validator().validate_property("width", "10");
        assert_eq!(result.status, ValidationStatus::Error);
        assert_eq!(result.kind, Some(ValidationErrorKind::SyntaxMismatch));
        assert_eq!(result.error_value.as_deref(), Some("10"));
        assert_eq!(result.message, "Expected (<length> | <percentage> | auto) but found '10'");
        assert_eq!(result.hint.as_deref(), Some(MISSING_UNIT_HINT));
    }

    #[test]
    fn test_trailing_content_warning() {
        let result = validator().validate_property("width", "10px extra");
        assert_eq!(result.status, ValidationStatus::Warning);
        assert_eq!(result.kind, Some(ValidationErrorKind::TrailingContent));
        assert_eq!(result.error_value.as_deref(), Some("extra"));
        assert_eq!(result.message, "Expected end of value but found 'extra'");
        assert_eq!(result.hint, None);
    }

    #[test]
    fn test_unsupported_color_hint() {
        let result = validator().validate_property("color", "bloo");
        assert_eq!(result.status, ValidationStatus::Error);
        assert_eq!(result.error_value.as_deref(), Some("bloo"));
        assert_eq!(result.message, "Expected (<color>) but found 'bloo'");
        assert_eq!(result.hint.as_deref(), Some("Unsupported color 'bloo'."));

        let result = validator().validate_property("border-color", " bloo ");
        assert_eq!(result.hint.as_deref(), Some("Unsupported color 'bloo'."));
    }

    #[test]
    fn test_no_hint_for_keyword_grammars() {
        let result = validator().validate_property("display", "grid");
        assert_eq!(result.status, ValidationStatus::Error);
        assert_eq!(result.hint, None);
    }

    #[test]
    fn test_unknown_property() {
        let v = validator();
        let result = v.validate_property("wdth", "10px");
        assert_eq!(result.status, ValidationStatus::Error);
        assert_eq!(result.kind, Some(ValidationErrorKind::UnknownProperty));
        assert_eq!(result.message, "Unknown property 'wdth' (did you mean 'width'?)");

        let result = v.validate_property("zzzzzzzz", "10px");
        assert_eq!(result.message, "Unknown property 'zzzzzzzz'");
    }

    #[test]
    fn test_empty_value() {
        let result = validator().validate_property("width", "");
        assert_eq!(result.status, ValidationStatus::Error);
        assert_eq!(result.kind, Some(ValidationErrorKind::EmptyValue));
        assert_eq!(result.message, "Expected (<length> | <percentage> | auto) but found empty value");
        assert_eq!(result.hint, None);
        assert_eq!(result.error_value, None);
    }

    #[test]
    fn test_custom_properties_always_ok() {
        let v = validator();
        assert!(v.validate_property("--accent", "").is_success());
        assert!(v.validate_property("--anything", "!!! not a value").is_success());
    }

    #[test]
    fn test_custom_prefix_configurable() {
        let v = StyleValidator::with_config(ValidatorConfig {
            custom_property_prefix: "--x-".to_string(),
            ..ValidatorConfig::default()
        });
        assert!(v.validate_property("--x-size", "whatever").is_success());
        assert_eq!(v.validate_property("--size", "whatever").kind, Some(ValidationErrorKind::UnknownProperty));
    }

    #[test]
    fn test_invalid_grammar_definition() {
        let v = validator();
        let result = v.validate_property("broken", "auto");
        assert_eq!(result.status, ValidationStatus::Error);
        assert_eq!(result.message, "Invalid 'broken' property syntax '<nope> | auto'");
        assert!(result.kind.is_some_and(ValidationErrorKind::is_definition_error));

        // Cached failure gives the same answer
        assert_eq!(v.validate_property("broken", "auto"), result);
    }

    #[test]
    fn test_eager_compile() {
        let v = StyleValidator::with_config(ValidatorConfig {
            eager_compile: true,
            ..ValidatorConfig::default()
        });
        v.load_definitions(vec![
            PropertyDefinition::new("width", "<length> | auto"),
            PropertyDefinition::new("broken", "<nope>"),
        ])
        .unwrap();
        assert_eq!(v.properties().snapshot().grammars().len(), 2);
    }

    #[test]
    fn test_deterministic() {
        let v = validator();
        for (name, value) in [("width", "10"), ("color", "bloo"), ("wdth", "1px"), ("width", "1px 2px")] {
            assert_eq!(v.validate_property(name, value), v.validate_property(name, value));
        }
    }

    #[test]
    fn test_validate_declarations() {
        let results = validator().validate_declarations([("width", "10px"), ("color", "bloo"), ("hieght", "1px")]);
        let statuses: Vec<_> = results.iter().map(|r| r.status).collect();
        assert_eq!(statuses, vec![ValidationStatus::Ok, ValidationStatus::Error, ValidationStatus::Error]);
        assert_eq!(results[2].message, "Unknown property 'hieght' (did you mean 'height'?)");
    }

    #[test]
    fn test_load_json() {
        let v = StyleValidator::new();
        let version = v.load_json(r#"{ "properties": { "opacity": "<number>" } }"#).unwrap();
        assert_eq!(version, 1);
        assert!(v.validate_property("opacity", "0.5").is_success());
        assert!(v.load_json("not json").is_err());
        assert!(v.validate_property("opacity", "0.5").is_success());
    }

    #[test]
    fn test_default_definitions() {
        let v = StyleValidator::with_default_definitions().unwrap();
        for (name, value) in [
            ("margin", "1px 2px auto 10%"),
            ("flex", "1 0 auto"),
            ("flex", "none"),
            ("flex-basis", "25%"),
            ("transition-duration", "1s, 200ms"),
            ("transition-property", "opacity, all"),
            ("-unity-font-style", "bold-and-italic"),
            ("background-color", "rgba(0, 0, 0, 0.5)"),
            ("background-image", "resource(\"Icons/close\")"),
            ("rotate", "45deg"),
            ("text-shadow", "1px 2px red"),
            ("-unity-text-outline", "red 1px"),
        ] {
            let result = v.validate_property(name, value);
            assert!(result.is_success(), "{}: {} gave {}", name, value, result);
        }

        let result = v.validate_property("margin", "1px 2px 3px 4px 5px");
        assert_eq!(result.status, ValidationStatus::Warning);
        assert_eq!(result.error_value.as_deref(), Some("5px"));
    }

    #[test]
    fn test_every_bundled_grammar_compiles() {
        let v = StyleValidator::with_default_definitions().unwrap();
        let snapshot = v.properties().snapshot();
        for descriptor in snapshot.descriptors() {
            assert!(snapshot.compiled(descriptor).is_ok(), "{} failed", descriptor.name);
        }
    }

    #[test]
    fn test_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<StyleValidator>();
    }

    #[test]
    fn test_validation_during_reload() {
        let v = validator();
        let tables = [
            vec![PropertyDefinition::new("width", "<length> | auto")],
            vec![
                PropertyDefinition::new("width", "<length> | <percentage> | auto"),
                PropertyDefinition::new("color", "<color>"),
            ],
        ];

        std::thread::scope(|s| {
            for _ in 0..4 {
                s.spawn(|| {
                    for _ in 0..200 {
                        assert!(v.validate_property("width", "10px").is_success());
                        let result = v.validate_property("width", "10");
                        assert_eq!(result.hint.as_deref(), Some(MISSING_UNIT_HINT));
                    }
                });
            }
            s.spawn(|| {
                for i in 0..50 {
                    v.load_definitions(tables[i % 2].clone()).unwrap();
                }
            });
        });

        assert_eq!(v.properties().version(), 51);
    }
}
