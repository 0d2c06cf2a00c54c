//! Metron Units - unit expressions and quantity text
//!
//! Parses unit expressions such as `kg·m/s²`, `km/h`, `K+273.15` or
//! `log(Hz)` into an algebraic [`Unit`], renders units back to text, and
//! formats and parses quantities (`9.81 m/s²`).
//!
//! Pieces:
//! - `UnitConverter`: composable scale, shift and logarithmic transforms
//! - `Unit`: immutable unit algebra (multiply, divide, pow, root, transform)
//! - `SymbolTable` / `SymbolMap`: unit symbols and prefixes, `SYMBOLS` holds SI
//! - `Lexer` and `UnitParser`: the expression grammar
//! - `QuantityFormat`: number-plus-unit text in two styles
//!
//! ```ignore
//! use metron_units::{parse_unit, format_unit};
//!
//! let force = parse_unit("kg*m/s^2")?;
//! assert_eq!(format_unit(&force), "kg·m/s²");
//! ```

mod converter;
mod dimension;
mod error;
mod format;
mod lexer;
mod parser;
mod quantity;
mod render;
mod symbols;
mod unit;
mod units;

pub use converter::UnitConverter;
pub use dimension::Dimension;
pub use error::{codes, FormatError};
pub use format::{fraction_digits, QuantityFormat, Style, DEFAULT_FRACTION_DIGITS};
pub use lexer::{superscript_value, tokenize, Lexer, Token, TokenKind};
pub use parser::UnitParser;
pub use quantity::Quantity;
pub use symbols::{Prefix, SymbolMap, SymbolTable};
pub use unit::{BaseUnit, ConversionError, Factor, ProductUnit, TransformedUnit, Unit};
pub use units::SYMBOLS;

pub use metron_core::Number;

/// Parse a unit expression against the built-in symbol table
///
/// Blank text is the dimensionless unit.
pub fn parse_unit(text: &str) -> Result<Unit, FormatError> {
    parse_unit_with(&*SYMBOLS, text)
}

/// Parse a unit expression against a caller-supplied symbol table
pub fn parse_unit_with<S: SymbolTable + ?Sized>(symbols: &S, text: &str) -> Result<Unit, FormatError> {
    if text.trim().is_empty() {
        return Ok(Unit::One);
    }
    UnitParser::new(symbols, text).parse()
}

/// Render a unit with the built-in symbol table
pub fn format_unit(unit: &Unit) -> String {
    SYMBOLS.render(unit)
}

/// Parse `"<number> <unit>"` in the default style
pub fn parse_quantity(text: &str) -> Result<Quantity, FormatError> {
    QuantityFormat::instance().parse(text)
}

/// Format a quantity in the default style
pub fn format_quantity(quantity: &Quantity) -> Result<String, FormatError> {
    QuantityFormat::instance().format(quantity)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_unit_examples() {
        let m = parse_unit("m").unwrap();
        assert_eq!(m, SYMBOLS.unit("m").unwrap());

        let km = parse_unit("km").unwrap();
        assert_eq!(km, m.transform(UnitConverter::integer(1000)));

        let force = parse_unit("kg*m/s^2").unwrap();
        assert_eq!(force.dimension(), Some(Dimension::FORCE));

        let hz = SYMBOLS.unit("Hz").unwrap();
        assert_eq!(parse_unit("log(Hz)").unwrap(), hz.transform(UnitConverter::log(10.0)));
        // base-2 rebasing: the inverse of a base-2 logarithm
        assert_eq!(parse_unit("2^(Hz)").unwrap(), hz.transform(UnitConverter::log(2.0).inverse()));

        // power first, then root
        assert_eq!(parse_unit("m^(2/3)").ok(), m.pow(2).and_then(|u| u.root(3)));
    }

    #[test]
    fn test_blank_is_one() {
        assert_eq!(parse_unit("").unwrap(), Unit::One);
        assert_eq!(parse_unit("   ").unwrap(), Unit::One);
        assert_eq!(format_unit(&Unit::One), "");
    }

    #[test]
    fn test_render_round_trip() {
        let inputs = [
            "m", "km", "mg", "kg·m/s²", "m/(s·kg)", "1/s", "m^(2/3)", "m^10",
            "°C", "K+5", "K-1.5", "(m+5)*7", "m*2.5", "log(Hz)", "ln(Hz)",
            "log2(Hz)", "2^Hz", "e^Hz", "km/h", "µm", "L", "%", "kh",
            "5+1", "5-1", "log0(Hz)", "0^Hz", "(m^65536)^32767",
        ];
        for text in inputs {
            let unit = parse_unit(text).unwrap();
            let rendered = format_unit(&unit);
            assert_eq!(parse_unit(&rendered).unwrap(), unit, "{} rendered as {}", text, rendered);
        }
    }

    #[test]
    fn test_identity_neutral_after_parse() {
        for text in ["m", "kg·m/s²", "°C", "log(Hz)"] {
            let unit = parse_unit(text).unwrap();
            assert_eq!(unit.multiply(&Unit::One), Some(unit.clone()));
            assert_eq!(unit.divide(&Unit::One), Some(unit.clone()));
        }
    }

    #[test]
    fn test_quantity_helpers() {
        let q = parse_quantity("5 m").unwrap();
        assert_eq!(format_quantity(&q).unwrap(), "5 m");
        assert_eq!(format_quantity(&Quantity::dimensionless(Number::Float(5.0))).unwrap(), "5");
    }

    #[test]
    fn test_error_codes_surface() {
        let err = parse_unit("kg*").unwrap_err();
        assert_eq!(err.code(), codes::SYNTAX_ERROR);
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["kind"], "syntax");
        assert_eq!(json["found"], "end");
        assert!(json["expected"].as_array().unwrap().iter().any(|k| k == "unit_identifier"));
    }
}
