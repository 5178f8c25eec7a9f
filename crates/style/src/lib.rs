//! Styleval Style
//!
//! Property tables, name suggestions and declaration validation.

pub mod config;
pub mod distance;
pub mod error;
pub mod json;
pub mod properties;
pub mod result;
pub mod validator;

pub use config::ValidatorConfig;
pub use error::{DefinitionLoadError, MalformedEntry};
pub use json::{default_definitions, parse_definitions};
pub use properties::{
    Inheritance, PropertyDefinition, PropertyDescriptor, PropertyInfoCache, PropertySnapshot,
};
pub use result::{ValidationErrorKind, ValidationResult, ValidationStatus};
pub use validator::StyleValidator;
