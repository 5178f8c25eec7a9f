//! Styleval Syntax
//!
//! Value grammar compiler and matcher. Grammar strings such as
//! `[ <length> | <percentage> | auto ]{1,4}` compile into [`SyntaxNode`]
//! trees, which [`StyleMatcher`] then matches raw values against.

pub mod cache;
pub mod data_type;
pub mod error;
pub mod lexer;
pub mod matcher;
pub mod node;
pub mod parser;

pub use cache::SyntaxCache;
pub use data_type::DataType;
pub use error::{GrammarError, GrammarResult};
pub use matcher::{MatchErrorKind, MatchOutcome, StyleMatcher, DEFAULT_MAX_STEPS};
pub use node::SyntaxNode;
pub use parser::{SyntaxParser, SyntaxResolver};
