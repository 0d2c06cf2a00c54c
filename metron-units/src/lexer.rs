//! Tokenizer for unit expressions
//!
//! Splits expression text into tokens with byte positions. Whitespace
//! separates tokens and is otherwise ignored. Once the input is exhausted
//! the lexer keeps returning `End`.

use std::fmt;
use serde::Serialize;
use crate::error::FormatError;

/// Token categories of the unit expression grammar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenKind {
    End,
    /// Decimal digits only
    Integer,
    /// Digits with a fraction part and/or an exponent
    FloatingPoint,
    UnitIdentifier,
    /// Run of superscript digits ¹²³⁴⁵⁶⁷⁸⁹
    SuperscriptInteger,
    Asterisk,
    MiddleDot,
    Solidus,
    Caret,
    Colon,
    Plus,
    Minus,
    OpenParen,
    CloseParen,
    /// Keyword `log`
    Log,
    /// Keyword `ln`
    NatLog,
    /// Keyword `e`
    E,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TokenKind::End => "end of input",
            TokenKind::Integer => "integer",
            TokenKind::FloatingPoint => "floating point number",
            TokenKind::UnitIdentifier => "unit identifier",
            TokenKind::SuperscriptInteger => "superscript integer",
            TokenKind::Asterisk => "'*'",
            TokenKind::MiddleDot => "'·'",
            TokenKind::Solidus => "'/'",
            TokenKind::Caret => "'^'",
            TokenKind::Colon => "':'",
            TokenKind::Plus => "'+'",
            TokenKind::Minus => "'-'",
            TokenKind::OpenParen => "'('",
            TokenKind::CloseParen => "')'",
            TokenKind::Log => "'log'",
            TokenKind::NatLog => "'ln'",
            TokenKind::E => "'e'",
        };
        write!(f, "{}", s)
    }
}

/// A token and where it starts
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: String,
    /// Byte offset into the input
    pub position: usize,
}

impl Token {
    fn new(kind: TokenKind, text: &str, position: usize) -> Self {
        Token { kind, text: text.to_string(), position }
    }
}

/// Value of a superscript digit
pub fn superscript_digit(c: char) -> Option<u32> {
    match c {
        '¹' => Some(1),
        '²' => Some(2),
        '³' => Some(3),
        '⁴' => Some(4),
        '⁵' => Some(5),
        '⁶' => Some(6),
        '⁷' => Some(7),
        '⁸' => Some(8),
        '⁹' => Some(9),
        _ => None,
    }
}

/// Decimal value of a superscript run; `None` on overflow or a foreign char
pub fn superscript_value(text: &str) -> Option<i32> {
    if text.is_empty() {
        return None;
    }
    text.chars().try_fold(0i32, |acc, c| {
        let digit = superscript_digit(c)? as i32;
        acc.checked_mul(10)?.checked_add(digit)
    })
}

fn is_operator(c: char) -> bool {
    matches!(c, '*' | '·' | '/' | '^' | ':' | '+' | '-' | '(' | ')' | '.')
}

fn is_identifier_char(c: char) -> bool {
    if c.is_whitespace() || c.is_control() || is_operator(c) {
        return false;
    }
    // Superscript zero, minus and plus never start or continue a token
    if superscript_digit(c).is_some() || matches!(c, '⁰' | '⁻' | '⁺') {
        return false;
    }
    if c.is_ascii() {
        c.is_ascii_alphabetic() || matches!(c, '_' | '%' | '\'' | '"')
    } else {
        true
    }
}

/// Streaming tokenizer over an expression
pub struct Lexer<'a> {
    input: &'a str,
    position: usize,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self::at(input, 0)
    }

    /// Start tokenizing at a byte offset, keeping positions absolute
    ///
    /// An offset inside a multi-byte character moves on to the next one.
    pub fn at(input: &'a str, position: usize) -> Self {
        let mut position = position.min(input.len());
        while !input.is_char_boundary(position) {
            position += 1;
        }
        Lexer { input, position }
    }

    pub fn input(&self) -> &'a str {
        self.input
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Next token, or a lexical error at the first unrecognized character
    pub fn next_token(&mut self) -> Result<Token, FormatError> {
        self.skip_whitespace();
        let start = self.position;

        let Some(c) = self.peek() else {
            return Ok(Token::new(TokenKind::End, "", start));
        };

        let kind = match c {
            '0'..='9' => return Ok(self.number(start)),
            '.' if self.peek_nth(1).is_some_and(|d| d.is_ascii_digit()) => return Ok(self.number(start)),
            '*' => TokenKind::Asterisk,
            '·' => TokenKind::MiddleDot,
            '/' => TokenKind::Solidus,
            '^' => TokenKind::Caret,
            ':' => TokenKind::Colon,
            '+' => TokenKind::Plus,
            '-' => TokenKind::Minus,
            '(' => TokenKind::OpenParen,
            ')' => TokenKind::CloseParen,
            c if superscript_digit(c).is_some() => return Ok(self.superscript(start)),
            c if is_identifier_char(c) => return Ok(self.identifier(start)),
            other => return Err(FormatError::Lexical { found: other, position: start }),
        };

        self.bump(c);
        Ok(Token::new(kind, &self.input[start..self.position], start))
    }

    // ========== Scanners ==========

    fn number(&mut self, start: usize) -> Token {
        let mut floating = false;
        self.eat_digits();

        if self.peek() == Some('.') {
            floating = true;
            self.bump('.');
            self.eat_digits();
        }

        // An exponent needs at least one digit, otherwise "e" is left alone
        if matches!(self.peek(), Some('e' | 'E')) {
            let signed = matches!(self.peek_nth(1), Some('+' | '-'));
            let digit_at = if signed { 2 } else { 1 };
            if self.peek_nth(digit_at).is_some_and(|d| d.is_ascii_digit()) {
                floating = true;
                self.position += digit_at;
                self.eat_digits();
            }
        }

        let kind = if floating { TokenKind::FloatingPoint } else { TokenKind::Integer };
        Token::new(kind, &self.input[start..self.position], start)
    }

    fn superscript(&mut self, start: usize) -> Token {
        while let Some(c) = self.peek().filter(|&c| superscript_digit(c).is_some()) {
            self.bump(c);
        }
        Token::new(TokenKind::SuperscriptInteger, &self.input[start..self.position], start)
    }

    fn identifier(&mut self, start: usize) -> Token {
        while let Some(c) = self.peek().filter(|&c| is_identifier_char(c)) {
            self.bump(c);
        }
        let text = &self.input[start..self.position];
        let kind = match text {
            "log" => TokenKind::Log,
            "ln" => TokenKind::NatLog,
            "e" => TokenKind::E,
            _ => TokenKind::UnitIdentifier,
        };
        Token::new(kind, text, start)
    }

    // ========== Cursor ==========

    fn peek(&self) -> Option<char> {
        self.input[self.position..].chars().next()
    }

    fn peek_nth(&self, n: usize) -> Option<char> {
        self.input[self.position..].chars().nth(n)
    }

    fn bump(&mut self, c: char) {
        self.position += c.len_utf8();
    }

    fn eat_digits(&mut self) {
        while let Some(c) = self.peek().filter(|c| c.is_ascii_digit()) {
            self.bump(c);
        }
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek().filter(|c| c.is_whitespace()) {
            self.bump(c);
        }
    }
}

/// Tokenize a whole expression; the last token is always `End`
pub fn tokenize(input: &str) -> Result<Vec<Token>, FormatError> {
    let mut lexer = Lexer::new(input);
    let mut tokens = Vec::new();
    loop {
        let token = lexer.next_token()?;
        let done = token.kind == TokenKind::End;
        tokens.push(token);
        if done {
            return Ok(tokens);
        }
    }
}
