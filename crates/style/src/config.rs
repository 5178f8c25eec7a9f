//! Validator configuration

use styleval_syntax::DEFAULT_MAX_STEPS;

/// Validator configuration
#[derive(Debug, Clone)]
pub struct ValidatorConfig {
    /// Names starting with this prefix are custom properties and always valid
    pub custom_property_prefix: String,
    /// Largest edit distance at which an unknown name gets a suggestion
    pub suggestion_distance: usize,
    /// Node visits allowed when matching one value
    pub max_match_steps: usize,
    /// Compile every grammar when definitions are loaded
    pub eager_compile: bool,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            custom_property_prefix: String::from("--"),
            suggestion_distance: 2,
            max_match_steps: DEFAULT_MAX_STEPS,
            eager_compile: false,
        }
    }
}
