//! Component values
//!
//! Groups tokens into the component values a value grammar is matched
//! against. Whitespace is dropped, function tokens swallow their arguments
//! up to the matching ')', and every component keeps the byte span it was
//! read from so diagnostics can quote the exact source text.

use std::ops::Range;

use crate::error::CssResult;
use crate::tokenizer::{Token, Tokenizer};

/// A single component value
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentValue {
    Ident(String),
    Number { value: f32, is_integer: bool },
    Percentage(f32),
    Dimension { value: f32, unit: String },
    String(String),
    Url(String),
    Hash(String),
    /// Function call with its (whitespace-free) arguments
    Function { name: String, args: Vec<Component> },
    Comma,
    Delim(char),
}

/// A component value and the byte range it covers in the source
#[derive(Debug, Clone, PartialEq)]
pub struct Component {
    pub value: ComponentValue,
    pub span: Range<usize>,
}

impl Component {
    /// The source text this component was read from
    pub fn text<'s>(&self, source: &'s str) -> &'s str {
        source.get(self.span.clone()).unwrap_or("")
    }

    /// Identifier text, if this is an identifier
    pub fn as_ident(&self) -> Option<&str> {
        match &self.value {
            ComponentValue::Ident(name) => Some(name),
            _ => None,
        }
    }

    /// Whether this is a unitless number
    pub fn is_number(&self) -> bool {
        matches!(self.value, ComponentValue::Number { .. })
    }
}

/// Split a value string into component values
pub fn parse_components(input: &str) -> CssResult<Vec<Component>> {
    let mut tokenizer = Tokenizer::new(input);
    let mut stack: Vec<(String, usize, Vec<Component>)> = Vec::new();
    let mut top = Vec::new();

    loop {
        let (token, span) = tokenizer.next_spanned()?;
        let value = match token {
            Token::Eof => break,
            Token::Whitespace => continue,
            Token::Function(name) => {
                stack.push((name, span.start, Vec::new()));
                continue;
            }
            Token::RightParen => match stack.pop() {
                Some((name, start, args)) => {
                    let component = Component {
                        value: ComponentValue::Function { name, args },
                        span: start..span.end,
                    };
                    push(&mut stack, &mut top, component);
                    continue;
                }
                None => ComponentValue::Delim(')'),
            },
            Token::LeftParen => ComponentValue::Delim('('),
            Token::Ident(name) => ComponentValue::Ident(name),
            Token::Hash(value) => ComponentValue::Hash(value),
            Token::String(value) => ComponentValue::String(value),
            Token::Url(value) => ComponentValue::Url(value),
            Token::Number { value, is_integer } => ComponentValue::Number { value, is_integer },
            Token::Percentage(value) => ComponentValue::Percentage(value),
            Token::Dimension(value, unit) => ComponentValue::Dimension { value, unit },
            Token::Comma => ComponentValue::Comma,
            Token::Delim(c) => ComponentValue::Delim(c),
        };
        push(&mut stack, &mut top, Component { value, span });
    }

    // Unclosed functions are closed at end of input
    let end = tokenizer.position();
    while let Some((name, start, args)) = stack.pop() {
        let component = Component {
            value: ComponentValue::Function { name, args },
            span: start..end,
        };
        push(&mut stack, &mut top, component);
    }

    Ok(top)
}

fn push(stack: &mut [(String, usize, Vec<Component>)], top: &mut Vec<Component>, component: Component) {
    match stack.last_mut() {
        Some((_, _, args)) => args.push(component),
        None => top.push(component),
    }
}

/// Check whether a raw value is a single unitless number
pub fn is_bare_number(input: &str) -> bool {
    matches!(parse_components(input).as_deref(), Ok([only]) if only.is_number())
}
