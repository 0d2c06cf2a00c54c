//! Unit expression parser
//!
//! Grammar (left-associative binary operators):
//!
//! ```text
//! compound  := add (':' add)*
//! add       := [number sign] mul [sign number]
//! mul       := exponent (('*' | '·' | '/') exponent)*
//! exponent  := (INTEGER | 'e') '^' atomic
//!            | atomic [exp]
//!            | ('log' [INTEGER] | 'ln') '(' add ')'
//! exp       := '^' [sign] INTEGER
//!            | '^' '(' [sign] INTEGER ['/' [sign] INTEGER] ')'
//!            | SUPERSCRIPT
//! atomic    := number | IDENTIFIER | '(' add ')'
//! number    := INTEGER | FLOATING_POINT
//! sign      := '+' | '-'
//! ```
//!
//! Only the first clause of a `:` compound contributes to the result; the
//! rest must still parse.

use std::f64::consts::E as EULER;
use metron_core::Number;
use tracing::{debug, trace};
use crate::error::FormatError;
use crate::lexer::{superscript_value, Lexer, Token, TokenKind};
use crate::{SymbolTable, Unit, UnitConverter};

use TokenKind::*;

/// Tokens pulled from the lexer on demand
///
/// Lookahead may read past the parse cursor; `End` repeats forever.
struct TokenStream<'a> {
    lexer: Lexer<'a>,
    buffer: Vec<Token>,
}

impl<'a> TokenStream<'a> {
    fn get(&mut self, index: usize) -> Result<&Token, FormatError> {
        while self.buffer.len() <= index && !self.ended() {
            let token = self.lexer.next_token()?;
            self.buffer.push(token);
        }
        let last = self.buffer.len().saturating_sub(1);
        Ok(&self.buffer[index.min(last)])
    }

    fn ended(&self) -> bool {
        self.buffer.last().is_some_and(|t| t.kind == End)
    }
}

struct Exponent {
    pow: i32,
    root: i32,
}

/// Recursive-descent parser over one expression
///
/// Each parser is single use; `parse` consumes it.
pub struct UnitParser<'a, S: SymbolTable + ?Sized> {
    symbols: &'a S,
    tokens: TokenStream<'a>,
    cursor: usize,
    /// Token kinds tried and declined at the cursor since the last consumed
    /// token, reported when the parse fails there
    expected: Vec<TokenKind>,
}

impl<'a, S: SymbolTable + ?Sized> UnitParser<'a, S> {
    pub fn new(symbols: &'a S, input: &'a str) -> Self {
        Self::at(symbols, input, 0)
    }

    /// Parse starting at a byte offset; error positions stay absolute
    pub fn at(symbols: &'a S, input: &'a str, position: usize) -> Self {
        UnitParser {
            symbols,
            tokens: TokenStream { lexer: Lexer::at(input, position), buffer: Vec::new() },
            cursor: 0,
            expected: Vec::new(),
        }
    }

    /// Parse a complete expression; trailing tokens are a syntax error
    pub fn parse(mut self) -> Result<Unit, FormatError> {
        let unit = self.compound_expr()?;
        self.expect(End)?;
        debug!(unit = %unit, "parsed unit expression");
        Ok(unit)
    }

    // ========== Grammar ==========

    fn compound_expr(&mut self) -> Result<Unit, FormatError> {
        let unit = self.add_expr()?;
        while self.check(&[Colon])? {
            self.advance()?;
            let ignored = self.add_expr()?;
            trace!(unit = %ignored, "dropping trailing compound clause");
        }
        Ok(unit)
    }

    fn add_expr(&mut self) -> Result<Unit, FormatError> {
        // A leading "<number><sign>" shifts the body; '-' negates the number
        let leading = if self.starts_number_sign(self.cursor)? {
            let n = self.number_expr()?;
            let sign = self.sign()?;
            Some(signed(&n, sign))
        } else {
            None
        };

        let mut unit = self.mul_expr()?;
        if let Some(offset) = leading {
            unit = unit.shift(offset);
        }

        if self.check(&[Plus, Minus])? {
            let sign = self.sign()?;
            let n = self.number_expr()?;
            unit = unit.shift(signed(&n, sign));
        }
        Ok(unit)
    }

    fn mul_expr(&mut self) -> Result<Unit, FormatError> {
        let start = self.tokens.get(self.cursor)?.position;
        let mut unit = self.exponent_expr()?;
        loop {
            if self.check(&[Asterisk, MiddleDot])? {
                self.advance()?;
                let rhs = self.exponent_expr()?;
                unit = unit.multiply(&rhs).ok_or_else(|| self.overflow(start))?;
            } else if self.check(&[Solidus])? {
                self.advance()?;
                let rhs = self.exponent_expr()?;
                unit = unit.divide(&rhs).ok_or_else(|| self.overflow(start))?;
            } else {
                return Ok(unit);
            }
        }
    }

    fn exponent_expr(&mut self) -> Result<Unit, FormatError> {
        if self.starts_exponential(self.cursor)? {
            let base_token = self.advance()?;
            self.expect(Caret)?;
            let unit = self.atomic_expr()?;
            let base = match base_token.kind {
                Integer => number_literal(&base_token)?.to_f64(),
                _ => EULER,
            };
            return Ok(unit.transform(UnitConverter::exp(base)));
        }

        match self.peek()? {
            Integer | FloatingPoint | UnitIdentifier | OpenParen => {
                let start = self.tokens.get(self.cursor)?.position;
                let mut unit = self.atomic_expr()?;
                if self.check(&[Caret, SuperscriptInteger])? {
                    let exponent = self.exponent()?;
                    if exponent.pow != 1 {
                        unit = unit.pow(exponent.pow).ok_or_else(|| self.overflow(start))?;
                    }
                    if exponent.root != 1 {
                        unit = unit.root(exponent.root).ok_or_else(|| self.overflow(start))?;
                    }
                }
                Ok(unit)
            }
            Log | NatLog => {
                let keyword = self.advance()?;
                let mut base = if keyword.kind == NatLog { EULER } else { 10.0 };
                if keyword.kind == Log && self.check(&[Integer])? {
                    let token = self.advance()?;
                    base = number_literal(&token)?.to_f64();
                }
                self.expect(OpenParen)?;
                let unit = self.add_expr()?;
                self.expect(CloseParen)?;
                Ok(unit.transform(UnitConverter::log(base)))
            }
            _ => Err(self.unexpected(&[Integer, E, FloatingPoint, UnitIdentifier, OpenParen, Log, NatLog])),
        }
    }

    fn atomic_expr(&mut self) -> Result<Unit, FormatError> {
        match self.peek()? {
            Integer | FloatingPoint => {
                let n = self.number_expr()?;
                Ok(Unit::One.multiply_by(&n))
            }
            UnitIdentifier => {
                let token = self.advance()?;
                self.resolve(&token)
            }
            OpenParen => {
                self.advance()?;
                let unit = self.add_expr()?;
                self.expect(CloseParen)?;
                Ok(unit)
            }
            _ => Err(self.unexpected(&[Integer, FloatingPoint, UnitIdentifier, OpenParen])),
        }
    }

    fn exponent(&mut self) -> Result<Exponent, FormatError> {
        match self.peek()? {
            Caret => {
                self.advance()?;
                if self.check(&[Plus, Minus, Integer])? {
                    let pow = self.signed_integer()?;
                    Ok(Exponent { pow, root: 1 })
                } else if self.check(&[OpenParen])? {
                    self.advance()?;
                    let pow = self.signed_integer()?;
                    let mut root = 1;
                    if self.check(&[Solidus])? {
                        self.advance()?;
                        root = self.signed_integer()?;
                    }
                    self.expect(CloseParen)?;
                    Ok(Exponent { pow, root })
                } else {
                    Err(self.unexpected(&[]))
                }
            }
            SuperscriptInteger => {
                let token = self.advance()?;
                let pow = superscript_value(&token.text)
                    .ok_or_else(|| FormatError::MalformedNumber { text: token.text.clone() })?;
                Ok(Exponent { pow, root: 1 })
            }
            _ => Err(self.unexpected(&[Caret, SuperscriptInteger])),
        }
    }

    fn number_expr(&mut self) -> Result<Number, FormatError> {
        match self.peek()? {
            Integer | FloatingPoint => {
                let token = self.advance()?;
                number_literal(&token)
            }
            _ => Err(self.unexpected(&[Integer, FloatingPoint])),
        }
    }

    fn sign(&mut self) -> Result<TokenKind, FormatError> {
        match self.peek()? {
            Plus | Minus => Ok(self.advance()?.kind),
            _ => Err(self.unexpected(&[Plus, Minus])),
        }
    }

    fn signed_integer(&mut self) -> Result<i32, FormatError> {
        let negative = if self.check(&[Plus, Minus])? {
            self.sign()? == Minus
        } else {
            false
        };
        let token = self.expect(Integer)?;
        let value: i32 = token.text.parse()
            .map_err(|_| FormatError::MalformedNumber { text: token.text.clone() })?;
        Ok(if negative { -value } else { value })
    }

    // ========== Symbols ==========

    /// Exact symbol first, then the longest prefix whose remainder is a unit
    fn resolve(&self, token: &Token) -> Result<Unit, FormatError> {
        let text = token.text.as_str();
        if let Some(unit) = self.symbols.unit(text) {
            return Ok(unit);
        }

        for (split, _) in text.char_indices().rev().filter(|&(i, _)| i > 0) {
            let (head, tail) = text.split_at(split);
            let Some(prefix) = self.symbols.prefix(head) else {
                continue;
            };
            if let Some(unit) = self.symbols.unit(tail) {
                trace!(prefix = head, unit = tail, "resolved prefixed symbol");
                return Ok(unit.transform(prefix.converter().clone()));
            }
        }

        Err(FormatError::UnknownSymbol { symbol: text.to_string(), position: token.position })
    }

    // ========== Lookahead ==========

    /// `number sign` at `at`
    fn starts_number_sign(&mut self, at: usize) -> Result<bool, FormatError> {
        match self.scan(at, &[Integer, FloatingPoint])? {
            Some(next) => Ok(self.scan(next, &[Plus, Minus])?.is_some()),
            None => Ok(false),
        }
    }

    /// `(INTEGER | 'e') '^'` at `at`
    fn starts_exponential(&mut self, at: usize) -> Result<bool, FormatError> {
        match self.scan(at, &[Integer, E])? {
            Some(next) => Ok(self.scan(next, &[Caret])?.is_some()),
            None => Ok(false),
        }
    }

    /// Index after the token at `at` when its kind is one of `kinds`
    fn scan(&mut self, at: usize, kinds: &[TokenKind]) -> Result<Option<usize>, FormatError> {
        let kind = self.tokens.get(at)?.kind;
        Ok(kinds.contains(&kind).then_some(at + 1))
    }

    // ========== Cursor ==========

    fn peek(&mut self) -> Result<TokenKind, FormatError> {
        Ok(self.tokens.get(self.cursor)?.kind)
    }

    /// True when the next token is one of `kinds`; otherwise remembers them
    /// for error reporting
    fn check(&mut self, kinds: &[TokenKind]) -> Result<bool, FormatError> {
        let kind = self.peek()?;
        if kinds.contains(&kind) {
            return Ok(true);
        }
        self.decline(kinds);
        Ok(false)
    }

    fn advance(&mut self) -> Result<Token, FormatError> {
        let token = self.tokens.get(self.cursor)?.clone();
        self.cursor += 1;
        self.expected.clear();
        Ok(token)
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token, FormatError> {
        if self.peek()? == kind {
            self.advance()
        } else {
            Err(self.unexpected(&[kind]))
        }
    }

    fn decline(&mut self, kinds: &[TokenKind]) {
        for kind in kinds {
            if !self.expected.contains(kind) {
                self.expected.push(*kind);
            }
        }
    }

    /// Exponents of the term from `start` to the cursor left the `i32` range
    fn overflow(&self, start: usize) -> FormatError {
        let end = self.cursor.checked_sub(1)
            .and_then(|i| self.tokens.buffer.get(i))
            .map_or(start, |t| t.position + t.text.len());
        let text = self.tokens.lexer.input().get(start..end).unwrap_or_default();
        FormatError::MalformedNumber { text: text.to_string() }
    }

    fn unexpected(&mut self, kinds: &[TokenKind]) -> FormatError {
        self.decline(kinds);
        let token = match self.tokens.get(self.cursor) {
            Ok(token) => token.clone(),
            Err(e) => return e,
        };
        FormatError::Syntax {
            found: token.kind,
            text: token.text,
            position: token.position,
            expected: std::mem::take(&mut self.expected),
        }
    }
}

fn signed(n: &Number, sign: TokenKind) -> f64 {
    match sign {
        Minus => -n.to_f64(),
        _ => n.to_f64(),
    }
}

fn number_literal(token: &Token) -> Result<Number, FormatError> {
    let parsed = match token.kind {
        FloatingPoint => Number::float_from_str(&token.text),
        _ => Number::from_str(&token.text),
    };
    parsed.map_err(|_| FormatError::MalformedNumber { text: token.text.clone() })
}
