//! Compiled value grammar

use std::fmt;

use crate::data_type::DataType;

/// A node of a compiled value grammar.
///
/// Trees are immutable once built and never contain cycles; property
/// references are expanded in place while compiling.
#[derive(Debug, Clone, PartialEq)]
pub enum SyntaxNode {
    /// An identifier keyword (ASCII case-insensitive) or a literal `,` / `/`
    Keyword(String),
    /// A data type such as `<length>`
    DataType(DataType),
    /// Juxtaposition: every child, in order
    Sequence(Vec<SyntaxNode>),
    /// `|`: exactly one child, first in declared order wins
    Alternation(Vec<SyntaxNode>),
    /// `||`: one or more children in any order, each at most once
    AnyOrder(Vec<SyntaxNode>),
    /// `&&`: every child in any order
    AllRequired(Vec<SyntaxNode>),
    /// A multiplied term; `max` of `None` is unbounded
    Repetition {
        child: Box<SyntaxNode>,
        min: u32,
        max: Option<u32>,
        /// Occurrences are separated by commas (`#`)
        comma_separated: bool,
    },
}

impl SyntaxNode {
    /// Whether any data type of `kinds` appears anywhere in the tree
    pub fn mentions(&self, kinds: &[DataType]) -> bool {
        match self {
            SyntaxNode::Keyword(_) => false,
            SyntaxNode::DataType(kind) => kinds.contains(kind),
            SyntaxNode::Sequence(children)
            | SyntaxNode::Alternation(children)
            | SyntaxNode::AnyOrder(children)
            | SyntaxNode::AllRequired(children) => children.iter().any(|c| c.mentions(kinds)),
            SyntaxNode::Repetition { child, .. } => child.mentions(kinds),
        }
    }

    /// The data type of the leftmost term, if that term is a data type
    pub fn leading_data_type(&self) -> Option<DataType> {
        match self {
            SyntaxNode::Keyword(_) => None,
            SyntaxNode::DataType(kind) => Some(*kind),
            SyntaxNode::Sequence(children)
            | SyntaxNode::Alternation(children)
            | SyntaxNode::AnyOrder(children)
            | SyntaxNode::AllRequired(children) => children.first()?.leading_data_type(),
            SyntaxNode::Repetition { child, .. } => child.leading_data_type(),
        }
    }

    fn is_group(&self) -> bool {
        matches!(
            self,
            SyntaxNode::Sequence(_)
                | SyntaxNode::Alternation(_)
                | SyntaxNode::AnyOrder(_)
                | SyntaxNode::AllRequired(_)
        )
    }

    fn fmt_operand(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_group() {
            write!(f, "[ {} ]", self)
        } else {
            write!(f, "{}", self)
        }
    }
}

fn fmt_joined(f: &mut fmt::Formatter<'_>, children: &[SyntaxNode], separator: &str) -> fmt::Result {
    for (i, child) in children.iter().enumerate() {
        if i > 0 {
            f.write_str(separator)?;
        }
        child.fmt_operand(f)?;
    }
    Ok(())
}

/// Renders the tree back into grammar text, bracketing every nested group
impl fmt::Display for SyntaxNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyntaxNode::Keyword(literal) => f.write_str(literal),
            SyntaxNode::DataType(kind) => write!(f, "{}", kind),
            SyntaxNode::Sequence(children) => fmt_joined(f, children, " "),
            SyntaxNode::Alternation(children) => fmt_joined(f, children, " | "),
            SyntaxNode::AnyOrder(children) => fmt_joined(f, children, " || "),
            SyntaxNode::AllRequired(children) => fmt_joined(f, children, " && "),
            SyntaxNode::Repetition { child, min, max, comma_separated } => {
                child.fmt_operand(f)?;
                match (*comma_separated, *min, *max) {
                    (true, 1, None) => f.write_str("#"),
                    (true, ..) => {
                        f.write_str("#")?;
                        fmt_range(f, *min, *max)
                    }
                    (false, 0, Some(1)) => f.write_str("?"),
                    (false, 0, None) => f.write_str("*"),
                    (false, 1, None) => f.write_str("+"),
                    (false, ..) => fmt_range(f, *min, *max),
                }
            }
        }
    }
}

fn fmt_range(f: &mut fmt::Formatter<'_>, min: u32, max: Option<u32>) -> fmt::Result {
    match max {
        Some(max) if max == min => write!(f, "{{{}}}", min),
        Some(max) => write!(f, "{{{},{}}}", min, max),
        None => write!(f, "{{{},}}", min),
    }
}
