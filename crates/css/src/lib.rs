//! Styleval CSS
//!
//! Value tokenizer, component values and the unit/color tables the value
//! matcher needs.

pub mod component;
pub mod error;
pub mod tokenizer;
pub mod value;

pub use component::{is_bare_number, parse_components, Component, ComponentValue};
pub use error::{CssError, CssResult, SourceLocation};
pub use tokenizer::{Token, Tokenizer};
pub use value::{is_color, AngleUnit, LengthUnit, TimeUnit};
