//! Structured errors for unit and quantity text
//!
//! Every failure is terminal for the parse or format call that raised it.
//! Errors carry enough structure (position, offending text, expected token
//! kinds) for callers to report them; nothing here is logged.

use serde::Serialize;
use thiserror::Error;
use crate::lexer::TokenKind;

/// Standard error codes (machine-readable)
pub mod codes {
    pub const LEXICAL_ERROR: &str = "LEXICAL_ERROR";
    pub const SYNTAX_ERROR: &str = "SYNTAX_ERROR";
    pub const UNKNOWN_SYMBOL: &str = "UNKNOWN_SYMBOL";
    pub const MALFORMED_NUMBER: &str = "MALFORMED_NUMBER";
    pub const UNSUPPORTED_VALUE: &str = "UNSUPPORTED_VALUE";
}

/// Failure while parsing or formatting units and quantities
///
/// Positions are byte offsets into the text being parsed.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FormatError {
    #[error("unrecognized character '{found}' at position {position}")]
    Lexical { found: char, position: usize },

    #[error("unexpected {} at position {position}, expected one of: {}", describe(.found, .text), join_kinds(.expected))]
    Syntax {
        found: TokenKind,
        text: String,
        position: usize,
        expected: Vec<TokenKind>,
    },

    #[error("unknown unit symbol '{symbol}' at position {position}")]
    UnknownSymbol { symbol: String, position: usize },

    #[error("malformed number: '{text}'")]
    MalformedNumber { text: String },

    #[error("unsupported value: {value}")]
    UnsupportedValue { value: String },
}

fn describe(found: &TokenKind, text: &str) -> String {
    match found {
        TokenKind::End => found.to_string(),
        _ => format!("{} \"{}\"", found, text),
    }
}

fn join_kinds(kinds: &[TokenKind]) -> String {
    kinds.iter().map(|k| k.to_string()).collect::<Vec<_>>().join(", ")
}

impl FormatError {
    /// Machine-readable error code
    pub fn code(&self) -> &'static str {
        match self {
            FormatError::Lexical { .. } => codes::LEXICAL_ERROR,
            FormatError::Syntax { .. } => codes::SYNTAX_ERROR,
            FormatError::UnknownSymbol { .. } => codes::UNKNOWN_SYMBOL,
            FormatError::MalformedNumber { .. } => codes::MALFORMED_NUMBER,
            FormatError::UnsupportedValue { .. } => codes::UNSUPPORTED_VALUE,
        }
    }

    /// Suggestion for fixing the input
    pub fn suggestion(&self) -> Option<&'static str> {
        match self {
            FormatError::Lexical { .. } => Some("Remove the character or replace it with an operator such as '*' or '/'"),
            FormatError::Syntax { found: TokenKind::End, .. } => Some("The expression ends early; complete the last operand"),
            FormatError::Syntax { .. } => None,
            FormatError::UnknownSymbol { .. } => Some("Check the unit symbol and prefix spelling"),
            FormatError::MalformedNumber { .. } => Some("Start the quantity with a number followed by whitespace"),
            FormatError::UnsupportedValue { .. } => Some("Only finite numbers can be formatted"),
        }
    }

    /// Byte offset of the failure, when it has one
    pub fn position(&self) -> Option<usize> {
        match self {
            FormatError::Lexical { position, .. }
            | FormatError::Syntax { position, .. }
            | FormatError::UnknownSymbol { position, .. } => Some(*position),
            FormatError::MalformedNumber { .. } | FormatError::UnsupportedValue { .. } => None,
        }
    }
}
