//! Grammar lexer
//!
//! Splits grammar text such as `[ <length> | auto ]{1,4}` into tokens.

use crate::error::{GrammarError, GrammarResult};

/// A grammar token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrammarToken {
    /// Identifier keyword
    Keyword(String),
    /// Literal separator, `,` or `/`
    Literal(char),
    /// `<name>`
    DataType(String),
    /// `<'property-name'>`
    PropertyRef(String),
    /// `[`
    OpenBracket,
    /// `]`
    CloseBracket,
    /// `|`
    Bar,
    /// `||`
    DoubleBar,
    /// `&&`
    DoubleAmpersand,
    /// `?`
    QuestionMark,
    /// `*`
    Asterisk,
    /// `+`
    Plus,
    /// `#`
    HashMark,
    /// `{a}`, `{a,}` or `{a,b}`
    Range { min: u32, max: Option<u32> },
}

impl GrammarToken {
    /// Source-like rendering used in error messages
    pub fn describe(&self) -> String {
        match self {
            GrammarToken::Keyword(k) => k.clone(),
            GrammarToken::Literal(c) => c.to_string(),
            GrammarToken::DataType(name) => format!("<{}>", name),
            GrammarToken::PropertyRef(name) => format!("<'{}'>", name),
            GrammarToken::OpenBracket => "[".to_string(),
            GrammarToken::CloseBracket => "]".to_string(),
            GrammarToken::Bar => "|".to_string(),
            GrammarToken::DoubleBar => "||".to_string(),
            GrammarToken::DoubleAmpersand => "&&".to_string(),
            GrammarToken::QuestionMark => "?".to_string(),
            GrammarToken::Asterisk => "*".to_string(),
            GrammarToken::Plus => "+".to_string(),
            GrammarToken::HashMark => "#".to_string(),
            GrammarToken::Range { min, max: Some(max) } => format!("{{{},{}}}", min, max),
            GrammarToken::Range { min, max: None } => format!("{{{},}}", min),
        }
    }

    /// `?`, `*`, `+`, `#` or a `{a,b}` range
    pub fn is_multiplier(&self) -> bool {
        matches!(
            self,
            GrammarToken::QuestionMark
                | GrammarToken::Asterisk
                | GrammarToken::Plus
                | GrammarToken::HashMark
                | GrammarToken::Range { .. }
        )
    }
}

/// Grammar lexer
pub struct GrammarLexer<'a> {
    input: &'a str,
    position: usize,
}

impl<'a> GrammarLexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self { input, position: 0 }
    }

    fn peek(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        let mut chars = self.input[self.position..].chars();
        chars.next();
        chars.next()
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.position += c.len_utf8();
        Some(c)
    }

    fn take_while(&mut self, pred: impl Fn(char) -> bool) -> &'a str {
        let input = self.input;
        let start = self.position;
        while self.peek().is_some_and(&pred) {
            self.advance();
        }
        &input[start..self.position]
    }

    /// Tokenize the whole grammar, pairing each token with its byte offset
    pub fn tokenize(mut self) -> GrammarResult<Vec<(GrammarToken, usize)>> {
        let mut tokens = Vec::new();
        loop {
            self.take_while(|c| c.is_whitespace());
            let offset = self.position;
            let c = match self.peek() {
                Some(c) => c,
                None => return Ok(tokens),
            };

            let token = match c {
                '[' => self.single(GrammarToken::OpenBracket),
                ']' => self.single(GrammarToken::CloseBracket),
                '?' => self.single(GrammarToken::QuestionMark),
                '*' => self.single(GrammarToken::Asterisk),
                '+' => self.single(GrammarToken::Plus),
                '#' => self.single(GrammarToken::HashMark),
                ',' | '/' => self.single(GrammarToken::Literal(c)),
                '|' if self.peek_second() == Some('|') => {
                    self.advance();
                    self.single(GrammarToken::DoubleBar)
                }
                '|' => self.single(GrammarToken::Bar),
                '&' if self.peek_second() == Some('&') => {
                    self.advance();
                    self.single(GrammarToken::DoubleAmpersand)
                }
                '{' => self.range(offset)?,
                '<' => self.angle_bracketed(offset)?,
                _ if is_keyword_start(c) => {
                    GrammarToken::Keyword(self.take_while(is_keyword_char).to_string())
                }
                _ => return Err(GrammarError::UnexpectedChar { character: c, offset }),
            };
            tokens.push((token, offset));
        }
    }

    fn single(&mut self, token: GrammarToken) -> GrammarToken {
        self.advance();
        token
    }

    fn range(&mut self, offset: usize) -> GrammarResult<GrammarToken> {
        self.advance(); // '{'
        let body = self.take_while(|c| c != '}');
        let invalid = || GrammarError::InvalidRange { text: format!("{{{}", body), offset };
        if self.advance() != Some('}') {
            return Err(invalid());
        }

        let parse_bound = |s: &str| s.trim().parse::<u32>().ok();
        let (min, max) = match body.split_once(',') {
            None => {
                let n = parse_bound(body).ok_or_else(invalid)?;
                (n, Some(n))
            }
            Some((lo, hi)) if hi.trim().is_empty() => (parse_bound(lo).ok_or_else(invalid)?, None),
            Some((lo, hi)) => (
                parse_bound(lo).ok_or_else(invalid)?,
                Some(parse_bound(hi).ok_or_else(invalid)?),
            ),
        };

        match max {
            Some(max) if max < min || max == 0 => Err(GrammarError::InvalidRange {
                text: format!("{{{}}}", body),
                offset,
            }),
            _ => Ok(GrammarToken::Range { min, max }),
        }
    }

    fn angle_bracketed(&mut self, offset: usize) -> GrammarResult<GrammarToken> {
        self.advance(); // '<'
        let quoted = self.peek() == Some('\'');
        if quoted {
            self.advance();
        }

        let name = self.take_while(is_keyword_char);
        if quoted && self.advance() != Some('\'') {
            return Err(GrammarError::UnterminatedDataType { offset });
        }
        if self.advance() != Some('>') || name.is_empty() {
            return Err(GrammarError::UnterminatedDataType { offset });
        }

        Ok(if quoted {
            GrammarToken::PropertyRef(name.to_string())
        } else {
            GrammarToken::DataType(name.to_string())
        })
    }
}

fn is_keyword_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '-' || c == '_'
}

fn is_keyword_char(c: char) -> bool {
    is_keyword_start(c) || c.is_ascii_digit()
}
