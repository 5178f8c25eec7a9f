//! Grammar parser
//!
//! Compiles grammar text into a [`SyntaxNode`] tree. Combinators are read by
//! precedence climbing over [`Combinator`]: each level parses operands of the
//! next tighter level and joins them while its own operator follows.

use log::trace;

use crate::data_type::DataType;
use crate::error::{GrammarError, GrammarResult};
use crate::lexer::{GrammarLexer, GrammarToken};
use crate::node::SyntaxNode;

/// Deepest bracket/reference nesting accepted
pub const MAX_NESTING_DEPTH: usize = 32;
/// Most children an `&&` or `||` group may have
pub const MAX_UNORDERED_CHILDREN: usize = 16;
/// Deepest chain of `<'property'>` references accepted
pub const MAX_REFERENCE_DEPTH: usize = 8;
/// Most multipliers one term may carry, as in `<length>#?`
pub const MAX_STACKED_MULTIPLIERS: usize = 2;

/// Supplies the grammar text of other properties for `<'name'>` references
pub trait SyntaxResolver {
    fn property_syntax(&self, name: &str) -> Option<&str>;
}

/// Combinators, loosest first
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Combinator {
    /// `|`
    SingleBar,
    /// `||`
    DoubleBar,
    /// `&&`
    DoubleAmpersand,
    /// whitespace
    Juxtaposition,
}

impl Combinator {
    /// The next tighter-binding combinator
    fn tighter(self) -> Option<Self> {
        match self {
            Combinator::SingleBar => Some(Combinator::DoubleBar),
            Combinator::DoubleBar => Some(Combinator::DoubleAmpersand),
            Combinator::DoubleAmpersand => Some(Combinator::Juxtaposition),
            Combinator::Juxtaposition => None,
        }
    }

    fn symbol(self) -> &'static str {
        match self {
            Combinator::SingleBar => "|",
            Combinator::DoubleBar => "||",
            Combinator::DoubleAmpersand => "&&",
            Combinator::Juxtaposition => " ",
        }
    }

    fn build(self, children: Vec<SyntaxNode>) -> GrammarResult<SyntaxNode> {
        let unordered = matches!(self, Combinator::DoubleBar | Combinator::DoubleAmpersand);
        if unordered && children.len() > MAX_UNORDERED_CHILDREN {
            return Err(GrammarError::TooManyChildren {
                combinator: self.symbol(),
                count: children.len(),
                limit: MAX_UNORDERED_CHILDREN,
            });
        }
        Ok(match self {
            Combinator::SingleBar => SyntaxNode::Alternation(children),
            Combinator::DoubleBar => SyntaxNode::AnyOrder(children),
            Combinator::DoubleAmpersand => SyntaxNode::AllRequired(children),
            Combinator::Juxtaposition => SyntaxNode::Sequence(children),
        })
    }
}

/// Compiles grammar strings into syntax trees
#[derive(Clone, Copy, Default)]
pub struct SyntaxParser<'r> {
    resolver: Option<&'r dyn SyntaxResolver>,
}

impl<'r> SyntaxParser<'r> {
    /// A parser without property references
    pub fn new() -> Self {
        Self { resolver: None }
    }

    /// A parser that expands `<'name'>` through `resolver`
    pub fn with_resolver(resolver: &'r dyn SyntaxResolver) -> Self {
        Self { resolver: Some(resolver) }
    }

    /// Compile a grammar string
    pub fn parse(&self, grammar: &str) -> GrammarResult<SyntaxNode> {
        let mut references = Vec::new();
        self.parse_nested(grammar, 0, &mut references)
    }

    fn parse_nested(&self, grammar: &str, depth: usize, references: &mut Vec<String>) -> GrammarResult<SyntaxNode> {
        let tokens = GrammarLexer::new(grammar).tokenize()?;
        if tokens.is_empty() {
            return Err(GrammarError::Empty);
        }

        let mut state = ParseState {
            parser: self,
            tokens,
            position: 0,
            references,
        };
        let tree = state.parse_combination(Combinator::SingleBar, depth)?;
        match state.tokens.get(state.position) {
            None => {
                trace!("compiled grammar '{}'", grammar);
                Ok(tree)
            }
            Some((token, offset)) => Err(GrammarError::UnexpectedToken {
                found: token.describe(),
                offset: *offset,
            }),
        }
    }
}

struct ParseState<'p, 'r> {
    parser: &'p SyntaxParser<'r>,
    tokens: Vec<(GrammarToken, usize)>,
    position: usize,
    references: &'p mut Vec<String>,
}

impl ParseState<'_, '_> {
    fn peek(&self) -> Option<&GrammarToken> {
        self.tokens.get(self.position).map(|(t, _)| t)
    }

    fn offset(&self) -> usize {
        self.tokens.get(self.position).map_or_else(
            || self.tokens.last().map_or(0, |(_, o)| *o),
            |(_, o)| *o,
        )
    }

    fn advance(&mut self) -> Option<(GrammarToken, usize)> {
        let token = self.tokens.get(self.position).cloned();
        if token.is_some() {
            self.position += 1;
        }
        token
    }

    /// Consume `combinator` if it comes next. Juxtaposition has no token:
    /// it continues whenever the next token starts another term.
    fn eat(&mut self, combinator: Combinator) -> bool {
        let next = self.peek();
        let found = match combinator {
            Combinator::SingleBar => matches!(next, Some(GrammarToken::Bar)),
            Combinator::DoubleBar => matches!(next, Some(GrammarToken::DoubleBar)),
            Combinator::DoubleAmpersand => matches!(next, Some(GrammarToken::DoubleAmpersand)),
            Combinator::Juxtaposition => {
                return matches!(
                    next,
                    Some(
                        GrammarToken::Keyword(_)
                            | GrammarToken::Literal(_)
                            | GrammarToken::DataType(_)
                            | GrammarToken::PropertyRef(_)
                            | GrammarToken::OpenBracket
                    )
                );
            }
        };
        if found {
            self.position += 1;
        }
        found
    }

    fn parse_combination(&mut self, combinator: Combinator, depth: usize) -> GrammarResult<SyntaxNode> {
        let mut children = vec![self.parse_operand(combinator, depth)?];
        while self.eat(combinator) {
            children.push(self.parse_operand(combinator, depth)?);
        }
        if children.len() == 1 {
            return Ok(children.remove(0));
        }
        combinator.build(children)
    }

    fn parse_operand(&mut self, combinator: Combinator, depth: usize) -> GrammarResult<SyntaxNode> {
        match combinator.tighter() {
            Some(tighter) => self.parse_combination(tighter, depth),
            None => self.parse_term(depth),
        }
    }

    fn parse_term(&mut self, depth: usize) -> GrammarResult<SyntaxNode> {
        if depth > MAX_NESTING_DEPTH {
            return Err(GrammarError::NestingTooDeep {
                limit: MAX_NESTING_DEPTH,
                offset: self.offset(),
            });
        }

        let (token, offset) = self.advance().ok_or(GrammarError::UnexpectedEnd)?;
        let primary = match token {
            GrammarToken::Keyword(keyword) => SyntaxNode::Keyword(keyword),
            GrammarToken::Literal(c) => SyntaxNode::Keyword(c.to_string()),
            GrammarToken::DataType(name) => match DataType::from_name(&name) {
                Some(kind) => SyntaxNode::DataType(kind),
                None => return Err(GrammarError::UnknownDataType { name, offset }),
            },
            GrammarToken::PropertyRef(name) => self.expand_reference(name, offset, depth)?,
            GrammarToken::OpenBracket => {
                let inner = self.parse_combination(Combinator::SingleBar, depth + 1)?;
                match self.advance() {
                    Some((GrammarToken::CloseBracket, _)) => inner,
                    Some((other, offset)) => {
                        return Err(GrammarError::UnexpectedToken { found: other.describe(), offset });
                    }
                    None => return Err(GrammarError::UnexpectedEnd),
                }
            }
            other => return Err(GrammarError::UnexpectedToken { found: other.describe(), offset }),
        };

        self.parse_multipliers(primary)
    }

    /// Wrap `term` in every multiplier that follows it
    fn parse_multipliers(&mut self, mut term: SyntaxNode) -> GrammarResult<SyntaxNode> {
        let mut stacked = 0;
        loop {
            if stacked == MAX_STACKED_MULTIPLIERS && self.peek().is_some_and(GrammarToken::is_multiplier) {
                return Err(GrammarError::TooManyMultipliers {
                    limit: MAX_STACKED_MULTIPLIERS,
                    offset: self.offset(),
                });
            }
            stacked += 1;

            let (min, max, comma_separated) = match self.peek() {
                Some(GrammarToken::QuestionMark) => (0, Some(1), false),
                Some(GrammarToken::Asterisk) => (0, None, false),
                Some(GrammarToken::Plus) => (1, None, false),
                Some(GrammarToken::Range { min, max }) => (*min, *max, false),
                Some(GrammarToken::HashMark) => {
                    self.position += 1;
                    match self.peek() {
                        Some(GrammarToken::Range { min, max }) => (*min, *max, true),
                        _ => {
                            term = repeat(term, 1, None, true);
                            continue;
                        }
                    }
                }
                _ => return Ok(term),
            };
            self.position += 1;
            term = repeat(term, min, max, comma_separated);
        }
    }

    fn expand_reference(&mut self, name: String, offset: usize, depth: usize) -> GrammarResult<SyntaxNode> {
        if self.references.contains(&name) {
            return Err(GrammarError::RecursiveReference { name });
        }
        if self.references.len() >= MAX_REFERENCE_DEPTH {
            return Err(GrammarError::ReferenceTooDeep { limit: MAX_REFERENCE_DEPTH });
        }

        let parser = self.parser;
        let syntax = parser
            .resolver
            .and_then(|r| r.property_syntax(&name))
            .ok_or_else(|| GrammarError::UnknownProperty { name: name.clone(), offset })?;

        self.references.push(name);
        let expanded = parser.parse_nested(syntax, depth + 1, self.references);
        let name = self.references.pop().unwrap_or_default();

        expanded.map_err(|reason| match reason {
            // Keep the innermost cycle/depth report instead of wrapping it at every level
            GrammarError::RecursiveReference { .. } | GrammarError::ReferenceTooDeep { .. } => reason,
            _ => GrammarError::InvalidReference { name, reason: Box::new(reason) },
        })
    }
}

fn repeat(child: SyntaxNode, min: u32, max: Option<u32>, comma_separated: bool) -> SyntaxNode {
    SyntaxNode::Repetition {
        child: Box::new(child),
        min,
        max,
        comma_separated,
    }
}
