//! Grammar compilation errors

use thiserror::Error;

/// Grammar compilation result type
pub type GrammarResult<T> = Result<T, GrammarError>;

/// Why a grammar string could not be compiled.
///
/// Offsets are byte offsets into the grammar text being compiled, which for
/// errors wrapped in [`GrammarError::InvalidReference`] is the referenced
/// property's grammar.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    #[error("empty grammar")]
    Empty,

    #[error("unexpected character '{character}' at offset {offset}")]
    UnexpectedChar { character: char, offset: usize },

    #[error("unterminated data type at offset {offset}")]
    UnterminatedDataType { offset: usize },

    #[error("unknown data type '<{name}>' at offset {offset}")]
    UnknownDataType { name: String, offset: usize },

    #[error("unknown property reference '{name}' at offset {offset}")]
    UnknownProperty { name: String, offset: usize },

    #[error("property reference '{name}' refers back to itself")]
    RecursiveReference { name: String },

    #[error("property references nested deeper than {limit}")]
    ReferenceTooDeep { limit: usize },

    #[error("invalid syntax in referenced property '{name}': {reason}")]
    InvalidReference { name: String, reason: Box<GrammarError> },

    #[error("unexpected '{found}' at offset {offset}")]
    UnexpectedToken { found: String, offset: usize },

    #[error("unexpected end of grammar")]
    UnexpectedEnd,

    #[error("invalid multiplier range '{text}' at offset {offset}")]
    InvalidRange { text: String, offset: usize },

    #[error("grammar nested deeper than {limit} at offset {offset}")]
    NestingTooDeep { limit: usize, offset: usize },

    #[error("more than {limit} multipliers on one term at offset {offset}")]
    TooManyMultipliers { limit: usize, offset: usize },

    #[error("'{combinator}' group has {count} children, limit is {limit}")]
    TooManyChildren {
        combinator: &'static str,
        count: usize,
        limit: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = GrammarError::UnknownDataType { name: "lenght".to_string(), offset: 0 };
        assert_eq!(err.to_string(), "unknown data type '<lenght>' at offset 0");
    }

    #[test]
    fn test_nested_reference_display() {
        let err = GrammarError::InvalidReference {
            name: "flex-basis".to_string(),
            reason: Box::new(GrammarError::UnexpectedEnd),
        };
        assert_eq!(
            err.to_string(),
            "invalid syntax in referenced property 'flex-basis': unexpected end of grammar"
        );
    }
}
