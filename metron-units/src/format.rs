//! Quantity formatting and parsing
//!
//! A quantity string is a numeric literal, whitespace, then a unit
//! expression; a bare number is dimensionless.

use metron_core::{Number, NumberError};
use tracing::{debug, trace};
use crate::error::FormatError;
use crate::parser::UnitParser;
use crate::{Quantity, SymbolMap, SymbolTable, Unit, SYMBOLS};

/// Maximum fraction digits when the value does not need more
pub const DEFAULT_FRACTION_DIGITS: usize = 3;

/// How the numeric part is written and read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Style {
    /// Fraction digits chosen per value; integer literals stay integral
    #[default]
    NumberSpaceUnit,
    /// The number's plain display form; always read back as floating
    Standard,
}

/// Formats quantities to text and parses them back
///
/// ```ignore
/// let q = QuantityFormat::instance().parse("9.81 m/s²")?;
/// assert_eq!(QuantityFormat::instance().format(&q)?, "9.81 m/s²");
/// ```
pub struct QuantityFormat<'a, S: SymbolTable + ?Sized = SymbolMap> {
    symbols: &'a S,
    style: Style,
    default_fraction_digits: usize,
}

impl QuantityFormat<'static> {
    /// Default style over the built-in symbol table
    pub fn instance() -> Self {
        Self::with_symbols(&*SYMBOLS)
    }

    /// Standard style over the built-in symbol table
    pub fn standard() -> Self {
        Self::instance().with_style(Style::Standard)
    }
}

impl<'a, S: SymbolTable + ?Sized> QuantityFormat<'a, S> {
    /// Default style over a caller-supplied symbol table
    pub fn with_symbols(symbols: &'a S) -> Self {
        QuantityFormat {
            symbols,
            style: Style::default(),
            default_fraction_digits: DEFAULT_FRACTION_DIGITS,
        }
    }

    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    pub fn with_default_fraction_digits(mut self, digits: usize) -> Self {
        self.default_fraction_digits = digits;
        self
    }

    pub fn style(&self) -> Style {
        self.style
    }

    // ========== Formatting ==========

    /// Number, then a space and the unit unless the unit is `One`
    pub fn format(&self, quantity: &Quantity) -> Result<String, FormatError> {
        if !quantity.value.is_finite() {
            return Err(FormatError::UnsupportedValue { value: quantity.value.to_string() });
        }

        let mut text = self.format_number(&quantity.value);
        if !quantity.unit.is_one() {
            text.push(' ');
            text.push_str(&self.symbols.render(&quantity.unit));
        }
        Ok(text)
    }

    fn format_number(&self, value: &Number) -> String {
        match (self.style, value) {
            (Style::Standard, _) | (_, Number::Integer(_)) => value.to_string(),
            (Style::NumberSpaceUnit, Number::Float(f)) => {
                let digits = fraction_digits(*f);
                let places = if digits > 1 { digits + 1 } else { self.default_fraction_digits };
                trace!(value = f, digits, places, "fraction digits");
                value.as_decimal(places)
            }
        }
    }

    // ========== Parsing ==========

    pub fn parse(&self, text: &str) -> Result<Quantity, FormatError> {
        self.parse_with(text, Quantity::new)
    }

    /// Parse with a caller-chosen constructor for the result
    pub fn parse_with<T, F>(&self, text: &str, make: F) -> Result<T, FormatError>
    where
        F: FnOnce(Number, Unit) -> T,
    {
        let start = text.len() - text.trim_start().len();
        let end = text[start..].find(char::is_whitespace).map_or(text.len(), |i| start + i);
        let literal = &text[start..end];

        let parsed = match self.style {
            Style::NumberSpaceUnit => Number::from_str(literal),
            Style::Standard => Number::float_from_str(literal),
        };
        let value = parsed.map_err(|e| match e {
            NumberError::ParseError(_) => FormatError::MalformedNumber { text: literal.to_string() },
            NumberError::NonFinite(_) => FormatError::UnsupportedValue { value: literal.to_string() },
        })?;

        let unit = if text[end..].trim().is_empty() {
            Unit::One
        } else {
            UnitParser::at(self.symbols, text, end).parse()?
        };

        debug!(value = %value, unit = %unit, "parsed quantity");
        Ok(make(value, unit))
    }
}

/// Count of fraction digits needed to write `value` exactly
///
/// Scales the fraction part by ten until nothing is left after the point.
/// Every finite double has a terminating binary expansion, so the loop ends.
pub fn fraction_digits(value: f64) -> usize {
    if !value.is_finite() {
        return 0;
    }
    let mut fraction = value.abs().fract();
    let mut count = 0;
    while fraction != 0.0 {
        fraction = (fraction * 10.0).fract();
        count += 1;
    }
    count
}
