//! Tagged numeric values
//!
//! A quantity value is either integral (fits in `i64`) or floating (`f64`).
//! The tag survives parsing and display, so `5` and `5.0` stay distinct
//! while still comparing equal.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error type for number operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NumberError {
    #[error("Invalid number format: {0}")]
    ParseError(String),

    #[error("Non-finite value: {0}")]
    NonFinite(String),
}

/// Numeric value of a quantity
///
/// Integer literals that fit in 64 bits are kept integral; everything else
/// is a double-precision float.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Number {
    Integer(i64),
    Float(f64),
}

impl Number {
    // ========== Construction ==========

    /// Parse a numeric literal
    /// Supports: "123", "-42", "3.14", "1.5e10", ".5"
    ///
    /// Integer literals that overflow `i64` fall back to a float.
    pub fn from_str(s: &str) -> Result<Self, NumberError> {
        let s = s.trim();

        if let Ok(n) = s.parse::<i64>() {
            return Ok(Number::Integer(n));
        }

        Self::float_from_str(s)
    }

    /// Parse a numeric literal, always producing a float
    pub fn float_from_str(s: &str) -> Result<Self, NumberError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(NumberError::ParseError(s.to_string()));
        }

        let f: f64 = s.parse()
            .map_err(|_| NumberError::ParseError(s.to_string()))?;

        if !f.is_finite() {
            return Err(NumberError::NonFinite(s.to_string()));
        }

        Ok(Number::Float(f))
    }

    // ========== Predicates ==========

    /// True when the value carries the integral tag
    pub fn is_integer(&self) -> bool {
        matches!(self, Number::Integer(_))
    }

    /// Integers are always finite
    pub fn is_finite(&self) -> bool {
        match self {
            Number::Integer(_) => true,
            Number::Float(f) => f.is_finite(),
        }
    }

    // ========== Conversion ==========

    pub fn to_f64(&self) -> f64 {
        match self {
            Number::Integer(n) => *n as f64,
            Number::Float(f) => *f,
        }
    }

    // ========== Formatting ==========

    /// Format with at most `places` fraction digits, dropping trailing zeros
    pub fn as_decimal(&self, places: usize) -> String {
        match self {
            Number::Integer(n) => n.to_string(),
            Number::Float(f) => {
                // Shortest round-trip digits first; only round when they
                // exceed the allowed places
                let mut s = f.to_string();
                if s.split_once('.').is_some_and(|(_, frac)| frac.len() > places) {
                    s = format!("{:.prec$}", f, prec = places);
                }
                if s.contains('.') {
                    let trimmed = s.trim_end_matches('0').trim_end_matches('.').len();
                    s.truncate(trimmed);
                }
                if s == "-0" {
                    s = "0".to_string();
                }
                s
            }
        }
    }
}

// ========== Trait Implementations ==========

impl std::fmt::Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Number::Integer(n) => write!(f, "{}", n),
            // Debug keeps a ".0" on integral floats and switches to
            // exponent notation for very large or small magnitudes
            Number::Float(x) => write!(f, "{:?}", x),
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Number::Integer(a), Number::Integer(b)) => a == b,
            _ => self.to_f64() == other.to_f64(),
        }
    }
}

impl From<i64> for Number {
    fn from(n: i64) -> Self {
        Number::Integer(n)
    }
}

impl From<f64> for Number {
    fn from(f: f64) -> Self {
        Number::Float(f)
    }
}
