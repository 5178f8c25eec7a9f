//! Validation results

use std::fmt;

/// Outcome severity of validating one declaration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationStatus {
    Ok,
    Warning,
    Error,
}

/// What went wrong, for results that are not `Ok`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// The property name is not in the table
    UnknownProperty,
    /// The table's grammar for the property does not compile
    InvalidGrammarDefinition,
    /// The value is empty
    EmptyValue,
    /// The value does not match the grammar
    SyntaxMismatch,
    /// A valid value followed by extra content
    TrailingContent,
}

impl ValidationErrorKind {
    /// Whether this points at a broken definitions table rather than at
    /// the validated content
    pub fn is_definition_error(self) -> bool {
        matches!(self, ValidationErrorKind::InvalidGrammarDefinition)
    }
}

/// Diagnostic for one property declaration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationResult {
    pub status: ValidationStatus,
    pub message: String,
    pub error_value: Option<String>,
    pub hint: Option<String>,
    pub kind: Option<ValidationErrorKind>,
}

impl ValidationResult {
    pub fn ok() -> Self {
        Self {
            status: ValidationStatus::Ok,
            message: String::new(),
            error_value: None,
            hint: None,
            kind: None,
        }
    }

    pub(crate) fn error(kind: ValidationErrorKind, message: String) -> Self {
        Self {
            status: ValidationStatus::Error,
            message,
            error_value: None,
            hint: None,
            kind: Some(kind),
        }
    }

    pub(crate) fn warning(kind: ValidationErrorKind, message: String) -> Self {
        Self {
            status: ValidationStatus::Warning,
            ..Self::error(kind, message)
        }
    }

    pub(crate) fn with_error_value(mut self, error_value: Option<String>) -> Self {
        self.error_value = error_value;
        self
    }

    pub(crate) fn with_hint(mut self, hint: Option<String>) -> Self {
        self.hint = hint;
        self
    }

    pub fn is_success(&self) -> bool {
        self.status == ValidationStatus::Ok
    }
}

impl fmt::Display for ValidationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            ValidationStatus::Ok => return f.write_str("ok"),
            ValidationStatus::Warning => write!(f, "warning: {}", self.message)?,
            ValidationStatus::Error => write!(f, "error: {}", self.message)?,
        }
        if let Some(hint) = &self.hint {
            write!(f, " (hint: {})", hint)?;
        }
        Ok(())
    }
}
