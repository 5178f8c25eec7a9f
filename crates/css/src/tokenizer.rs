//! Value Tokenizer
//!
//! Splits a property value into tokens, following the token rules of
//! CSS Syntax Module Level 3 for the subset that can appear in a value.

use std::ops::Range;

use crate::error::{CssError, CssResult, SourceLocation};

/// Value token types
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// Identifier (e.g., keywords, custom idents)
    Ident(String),
    /// Function token (identifier followed by '(')
    Function(String),
    /// Hash token (e.g., #fff)
    Hash(String),
    /// String token
    String(String),
    /// Unquoted URL token
    Url(String),
    /// Number (without unit)
    Number { value: f32, is_integer: bool },
    /// Percentage
    Percentage(f32),
    /// Dimension (number with unit)
    Dimension(f32, String),
    /// Whitespace
    Whitespace,
    /// Comma ','
    Comma,
    /// Left paren '('
    LeftParen,
    /// Right paren ')'
    RightParen,
    /// Delim (any other single character, including '/')
    Delim(char),
    /// End of input
    Eof,
}

/// Value tokenizer
pub struct Tokenizer<'a> {
    input: &'a str,
    chars: std::iter::Peekable<std::str::CharIndices<'a>>,
    position: usize,
    line: usize,
    column: usize,
    token_start: usize,
}

impl<'a> Tokenizer<'a> {
    /// Create a new tokenizer
    pub fn new(input: &'a str) -> Self {
        Self {
            input,
            chars: input.char_indices().peekable(),
            position: 0,
            line: 1,
            column: 1,
            token_start: 0,
        }
    }

    /// Get the current source location
    pub fn location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column, self.position)
    }

    /// Byte offset just past the most recently returned token
    pub fn position(&self) -> usize {
        self.position
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }

    fn peek_second(&self) -> Option<char> {
        let mut iter = self.input[self.position..].chars();
        iter.next();
        iter.next()
    }

    fn advance(&mut self) -> Option<char> {
        let (pos, c) = self.chars.next()?;
        self.position = pos + c.len_utf8();
        if c == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn consume_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if !c.is_ascii_whitespace() {
                break;
            }
            self.advance();
        }
    }

    fn consume_comment(&mut self) {
        self.advance(); // '/'
        self.advance(); // '*'
        loop {
            match self.advance() {
                Some('*') if self.peek() == Some('/') => {
                    self.advance();
                    return;
                }
                Some(_) => continue,
                None => return, // EOF in comment
            }
        }
    }

    /// Get the next token
    pub fn next_token(&mut self) -> CssResult<Token> {
        // Comments vanish; a whitespace run (with any comments inside) is one token
        let mut saw_whitespace = false;
        self.token_start = self.position;
        while let Some(c) = self.peek() {
            if c.is_ascii_whitespace() {
                saw_whitespace = true;
                self.consume_whitespace();
            } else if c == '/' && self.peek_second() == Some('*') {
                self.consume_comment();
                if !saw_whitespace {
                    self.token_start = self.position;
                }
            } else {
                break;
            }
        }

        if saw_whitespace {
            return Ok(Token::Whitespace);
        }
        self.token_start = self.position;

        let c = match self.peek() {
            Some(c) => c,
            None => return Ok(Token::Eof),
        };

        match c {
            ',' => {
                self.advance();
                Ok(Token::Comma)
            }
            '(' => {
                self.advance();
                Ok(Token::LeftParen)
            }
            ')' => {
                self.advance();
                Ok(Token::RightParen)
            }
            '"' | '\'' => self.consume_string(),
            '#' => self.consume_hash(),
            '.' if self.peek_second().is_some_and(|c| c.is_ascii_digit()) => self.consume_number(),
            '0'..='9' => self.consume_number(),
            '+' | '-' => {
                if self.starts_number() {
                    self.consume_number()
                } else if c == '-' && self.starts_identifier() {
                    self.consume_ident_like()
                } else {
                    self.advance();
                    Ok(Token::Delim(c))
                }
            }
            _ if is_ident_start(c) => self.consume_ident_like(),
            _ => {
                self.advance();
                Ok(Token::Delim(c))
            }
        }
    }

    /// Get the next token together with its byte span
    pub fn next_spanned(&mut self) -> CssResult<(Token, Range<usize>)> {
        let token = self.next_token()?;
        Ok((token, self.token_start..self.position))
    }

    fn starts_number(&self) -> bool {
        let mut chars = self.input[self.position..].chars();
        chars.next(); // sign
        match chars.next() {
            Some(c) if c.is_ascii_digit() => true,
            Some('.') => chars.next().is_some_and(|c| c.is_ascii_digit()),
            _ => false,
        }
    }

    fn starts_identifier(&self) -> bool {
        let mut chars = self.input[self.position..].chars();
        match chars.next() {
            Some('-') => match chars.next() {
                Some(c) if is_ident_start(c) => true,
                Some('-') => true,
                _ => false,
            },
            Some(c) if is_ident_start(c) => true,
            _ => false,
        }
    }

    fn consume_string(&mut self) -> CssResult<Token> {
        let start = self.location();
        let quote = match self.advance() {
            Some(q) => q,
            None => return Err(CssError::UnterminatedString { location: start }),
        };
        let mut value = String::new();

        loop {
            match self.advance() {
                Some(c) if c == quote => return Ok(Token::String(value)),
                Some('\\') => match self.peek() {
                    Some('\n') => {
                        self.advance();
                    }
                    Some(c) => {
                        self.advance();
                        value.push(c);
                    }
                    None => {}
                },
                Some('\n') | None => {
                    return Err(CssError::UnterminatedString { location: start });
                }
                Some(c) => value.push(c),
            }
        }
    }

    fn consume_hash(&mut self) -> CssResult<Token> {
        self.advance(); // '#'
        if !self.peek().is_some_and(is_ident_char) {
            return Ok(Token::Delim('#'));
        }
        Ok(Token::Hash(self.consume_ident_name()))
    }

    fn consume_ident_name(&mut self) -> String {
        let mut name = String::new();
        while let Some(c) = self.peek() {
            if !is_ident_char(c) {
                break;
            }
            name.push(c);
            self.advance();
        }
        name
    }

    /// Consume an identifier-like token (ident, function, or url)
    fn consume_ident_like(&mut self) -> CssResult<Token> {
        let name = self.consume_ident_name();

        if self.peek() != Some('(') {
            return Ok(Token::Ident(name));
        }
        self.advance(); // '('

        if name.eq_ignore_ascii_case("url") {
            let after_paren = self.input[self.position..].trim_start_matches(|c: char| c.is_ascii_whitespace());
            match after_paren.chars().next() {
                // Quoted url: the string becomes the function argument
                Some('"') | Some('\'') => return Ok(Token::Function(name)),
                _ => return self.consume_url(),
            }
        }

        Ok(Token::Function(name))
    }

    fn consume_url(&mut self) -> CssResult<Token> {
        let start = self.location();
        let mut url = String::new();
        self.consume_whitespace();

        loop {
            match self.peek() {
                Some(')') => {
                    self.advance();
                    return Ok(Token::Url(url));
                }
                Some(c) if c.is_ascii_whitespace() => {
                    self.consume_whitespace();
                    if self.peek() == Some(')') {
                        self.advance();
                        return Ok(Token::Url(url));
                    }
                    return Err(CssError::invalid_url("whitespace inside url", start));
                }
                Some('\\') => {
                    self.advance();
                    if let Some(c) = self.advance() {
                        url.push(c);
                    }
                }
                Some('"') | Some('\'') | Some('(') => {
                    return Err(CssError::invalid_url("unexpected character inside url", start));
                }
                Some(c) => {
                    url.push(c);
                    self.advance();
                }
                None => return Err(CssError::invalid_url("unterminated url", start)),
            }
        }
    }

    fn consume_digits(&mut self, into: &mut String) {
        while let Some(c) = self.peek() {
            if !c.is_ascii_digit() {
                break;
            }
            into.push(c);
            self.advance();
        }
    }

    /// Check for `e`, optional sign and a digit at the current position
    fn starts_exponent(&self) -> bool {
        let mut chars = self.input[self.position..].chars();
        if !matches!(chars.next(), Some('e') | Some('E')) {
            return false;
        }
        match chars.next() {
            Some('+') | Some('-') => chars.next().is_some_and(|c| c.is_ascii_digit()),
            Some(c) => c.is_ascii_digit(),
            None => false,
        }
    }

    fn consume_number(&mut self) -> CssResult<Token> {
        let location = self.location();
        let mut num_str = String::new();
        let mut is_integer = true;

        if let Some(c @ ('+' | '-')) = self.peek() {
            num_str.push(c);
            self.advance();
        }

        self.consume_digits(&mut num_str);

        if self.peek() == Some('.') && self.peek_second().is_some_and(|c| c.is_ascii_digit()) {
            is_integer = false;
            num_str.push('.');
            self.advance();
            self.consume_digits(&mut num_str);
        }

        if self.starts_exponent() {
            is_integer = false;
            if let Some(e) = self.advance() {
                num_str.push(e);
            }
            if let Some(sign @ ('+' | '-')) = self.peek() {
                num_str.push(sign);
                self.advance();
            }
            self.consume_digits(&mut num_str);
        }

        let value: f32 = num_str.parse().map_err(|_| CssError::InvalidNumber {
            number: num_str.clone(),
            location,
        })?;

        if self.peek() == Some('%') {
            self.advance();
            return Ok(Token::Percentage(value));
        }

        if self.starts_identifier() {
            let unit = self.consume_ident_name();
            return Ok(Token::Dimension(value, unit));
        }

        Ok(Token::Number { value, is_integer })
    }
}

/// Check if character can start an identifier
fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '-' || c > '\x7F'
}

/// Check if character can be part of an identifier
fn is_ident_char(c: char) -> bool {
    is_ident_start(c) || c.is_ascii_digit()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize_all(input: &str) -> CssResult<Vec<Token>> {
        let mut tokenizer = Tokenizer::new(input);
        let mut tokens = Vec::new();
        loop {
            match tokenizer.next_token()? {
                Token::Eof => return Ok(tokens),
                token => tokens.push(token),
            }
        }
    }

    fn tokenize(input: &str) -> Vec<Token> {
        tokenize_all(input).unwrap()
    }

    #[test]
    fn test_keyword_list() {
        let tokens = tokenize("flex-start auto");
        assert!(matches!(tokens[0], Token::Ident(ref s) if s == "flex-start"));
        assert!(matches!(tokens[1], Token::Whitespace));
        assert!(matches!(tokens[2], Token::Ident(ref s) if s == "auto"));
    }

    #[test]
    fn test_integer_and_float() {
        let tokens = tokenize("42 3.14 1e3");
        assert!(matches!(tokens[0], Token::Number { value, is_integer: true } if (value - 42.0).abs() < 0.001));
        assert!(matches!(tokens[2], Token::Number { value, is_integer: false } if (value - 3.14).abs() < 0.001));
        assert!(matches!(tokens[4], Token::Number { value, is_integer: false } if (value - 1000.0).abs() < 0.001));
    }

    #[test]
    fn test_exponent_needs_digit() {
        // "2em" is a dimension, not an exponent
        let tokens = tokenize("2em");
        assert!(matches!(tokens[0], Token::Dimension(n, ref u) if (n - 2.0).abs() < 0.001 && u == "em"));
    }

    #[test]
    fn test_percentage() {
        let tokens = tokenize("50%");
        assert!(matches!(tokens[0], Token::Percentage(n) if (n - 50.0).abs() < 0.001));
    }

    #[test]
    fn test_dimension_px() {
        let tokens = tokenize("100px");
        assert!(matches!(tokens[0], Token::Dimension(n, ref u) if (n - 100.0).abs() < 0.001 && u == "px"));
    }

    #[test]
    fn test_negative_dimension() {
        let tokens = tokenize("-10px");
        assert!(matches!(tokens[0], Token::Dimension(n, ref u) if (n + 10.0).abs() < 0.001 && u == "px"));
    }

    #[test]
    fn test_leading_dot_number() {
        let tokens = tokenize(".5");
        assert!(matches!(tokens[0], Token::Number { value, is_integer: false } if (value - 0.5).abs() < 0.001));
    }

    #[test]
    fn test_hash() {
        let tokens = tokenize("#ff0000");
        assert!(matches!(tokens[0], Token::Hash(ref s) if s == "ff0000"));
    }

    #[test]
    fn test_lone_hash_is_delim() {
        let tokens = tokenize("# ");
        assert!(matches!(tokens[0], Token::Delim('#')));
    }

    #[test]
    fn test_strings() {
        let tokens = tokenize("\"hello world\" 'hi'");
        assert!(matches!(tokens[0], Token::String(ref s) if s == "hello world"));
        assert!(matches!(tokens[2], Token::String(ref s) if s == "hi"));
    }

    #[test]
    fn test_unterminated_string() {
        let err = tokenize_all("  'abc").unwrap_err();
        assert!(matches!(err, CssError::UnterminatedString { location } if location.offset == 2));
    }

    #[test]
    fn test_function() {
        let tokens = tokenize("rgb(255, 0, 0)");
        assert!(matches!(tokens[0], Token::Function(ref s) if s == "rgb"));
        assert!(matches!(tokens[1], Token::Number { value, .. } if (value - 255.0).abs() < 0.001));
        assert!(matches!(tokens[2], Token::Comma));
        assert!(matches!(tokens.last(), Some(Token::RightParen)));
    }

    #[test]
    fn test_url_bare() {
        let tokens = tokenize("url(images/icon.png)");
        assert!(matches!(tokens[0], Token::Url(ref s) if s == "images/icon.png"));
    }

    #[test]
    fn test_url_quoted() {
        let tokens = tokenize("url( \"icon.png\")");
        assert!(matches!(tokens[0], Token::Function(ref s) if s == "url"));
        assert!(matches!(tokens[1], Token::Whitespace));
        assert!(matches!(tokens[2], Token::String(ref s) if s == "icon.png"));
    }

    #[test]
    fn test_url_with_inner_space_fails() {
        assert!(tokenize_all("url(a b)").is_err());
    }

    #[test]
    fn test_slash_is_delim() {
        let tokens = tokenize("1 / 2");
        assert!(matches!(tokens[2], Token::Delim('/')));
    }

    #[test]
    fn test_comment_is_skipped() {
        let tokens = tokenize("/* note */auto");
        assert_eq!(tokens.len(), 1);
        assert!(matches!(tokens[0], Token::Ident(ref s) if s == "auto"));
    }

    #[test]
    fn test_spans() {
        let mut tokenizer = Tokenizer::new("10px  extra");
        let (token, span) = tokenizer.next_spanned().unwrap();
        assert!(matches!(token, Token::Dimension(..)));
        assert_eq!(span, 0..4);
        let (token, _) = tokenizer.next_spanned().unwrap();
        assert_eq!(token, Token::Whitespace);
        let (_, span) = tokenizer.next_spanned().unwrap();
        assert_eq!(span, 6..11);
        let (token, span) = tokenizer.next_spanned().unwrap();
        assert_eq!(token, Token::Eof);
        assert_eq!(span, 11..11);
        assert_eq!(tokenizer.position(), 11);
    }

    #[test]
    fn test_spans_skip_comments() {
        let mut tokenizer = Tokenizer::new("/* note */auto");
        let (token, span) = tokenizer.next_spanned().unwrap();
        assert!(matches!(token, Token::Ident(ref s) if s == "auto"));
        assert_eq!(span, 10..14);
    }

    #[test]
    fn test_custom_property_ident() {
        let tokens = tokenize("--main-color");
        assert!(matches!(tokens[0], Token::Ident(ref s) if s == "--main-color"));
    }
}
