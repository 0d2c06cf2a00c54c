//! Rendering units as expression text
//!
//! Output uses the same grammar the parser accepts, so rendering a unit and
//! parsing the text back yields an equal unit for everything built from
//! table symbols, prefixes, products, integer or rational scales, shifts and
//! logarithms.

use std::f64::consts::E;
use std::fmt;
use crate::{SymbolTable, Unit, UnitConverter, SYMBOLS};
use crate::lexer::{Lexer, TokenKind};
use crate::unit::{Factor, ProductUnit, TransformedUnit};

/// How tightly a rendered fragment binds; wrapping a fragment in an
/// operator of lower precedence needs parentheses
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum Level {
    Atomic,
    Exponent,
    Multiplicative,
    Additive,
}

struct Rendered {
    text: String,
    level: Level,
}

impl Rendered {
    fn new(text: impl Into<String>, level: Level) -> Self {
        Rendered { text: text.into(), level }
    }

    /// Text usable as an operand that binds at least as tight as `level`
    fn operand(&self, level: Level) -> String {
        if self.level > level {
            format!("({})", self.text)
        } else {
            self.text.clone()
        }
    }
}

/// Render `unit` against a symbol table; `One` renders as the empty string
pub fn render_unit<S: SymbolTable + ?Sized>(symbols: &S, unit: &Unit) -> String {
    if unit.is_one() {
        return String::new();
    }
    render(symbols, unit).text
}

fn render<S: SymbolTable + ?Sized>(symbols: &S, unit: &Unit) -> Rendered {
    if let Some(label) = symbols.label_of(unit) {
        return Rendered::new(label, Level::Atomic);
    }
    match unit {
        Unit::One => Rendered::new("1", Level::Atomic),
        Unit::Base(b) => Rendered::new(b.symbol.clone(), Level::Atomic),
        Unit::Product(p) => render_product(symbols, p),
        Unit::Transformed(t) => match prefixed(symbols, t) {
            Some(text) => Rendered::new(text, Level::Atomic),
            None => wrap(render(symbols, t.parent()), t.converter()),
        },
    }
}

/// Shortest `prefix + symbol` spelling of a rationally scaled unit
///
/// Candidates are table units equal to the parent, or rational scales of
/// it; ties go to the earlier registration.
fn prefixed<S: SymbolTable + ?Sized>(symbols: &S, t: &TransformedUnit) -> Option<String> {
    let ratio = t.converter().ratio()?;
    let mut best: Option<String> = None;

    for (symbol, unit) in symbols.labels() {
        let needed = if unit == t.parent() {
            ratio.clone()
        } else {
            match unit {
                Unit::Transformed(u) if u.parent() == t.parent() => match u.converter().ratio() {
                    Some(base) => ratio / base,
                    None => continue,
                },
                _ => continue,
            }
        };

        let Some(prefix) = symbols.prefix_for(&UnitConverter::Rational(needed)) else {
            continue;
        };
        let candidate = format!("{}{}", symbols.symbol_of(&prefix), symbol);
        let shorter = best.as_ref().map_or(true, |b| candidate.chars().count() < b.chars().count());
        if shorter {
            best = Some(candidate);
        }
    }
    best
}

fn render_product<S: SymbolTable + ?Sized>(symbols: &S, p: &ProductUnit) -> Rendered {
    let mut numerator = Vec::new();
    let mut denominator = Vec::new();

    for f in p.factors() {
        let text = render_factor(symbols, f);
        if f.pow > 0 {
            numerator.push(text);
        } else {
            denominator.push(text);
        }
    }

    let single = numerator.len() + denominator.len() == 1 && denominator.is_empty();
    let top = if numerator.is_empty() { "1".to_string() } else { numerator.join("·") };
    let text = match denominator.len() {
        0 => top,
        1 => format!("{}/{}", top, denominator[0]),
        _ => format!("{}/({})", top, denominator.join("·")),
    };
    let level = if single { Level::Exponent } else { Level::Multiplicative };
    Rendered::new(text, level)
}

/// `unit^(|pow|/root)`; the sign of `pow` decides the side of the solidus
fn render_factor<S: SymbolTable + ?Sized>(symbols: &S, f: &Factor) -> String {
    let base = render(symbols, &f.unit);
    let pow = f.pow.unsigned_abs();

    if pow == 1 && f.root == 1 {
        return base.operand(Level::Exponent);
    }

    let operand = base.operand(Level::Atomic);
    if f.root == 1 {
        match superscript(pow) {
            Some(sup) => format!("{}{}", operand, sup),
            None => format!("{}^{}", operand, pow),
        }
    } else {
        format!("{}^({}/{})", operand, pow, f.root)
    }
}

fn superscript(n: u32) -> Option<String> {
    n.to_string()
        .chars()
        .map(|c| match c {
            '1' => Some('¹'),
            '2' => Some('²'),
            '3' => Some('³'),
            '4' => Some('⁴'),
            '5' => Some('⁵'),
            '6' => Some('⁶'),
            '7' => Some('⁷'),
            '8' => Some('⁸'),
            '9' => Some('⁹'),
            _ => None,
        })
        .collect()
}

/// Apply a converter's steps to rendered parent text, outermost step last
fn wrap(inner: Rendered, converter: &UnitConverter) -> Rendered {
    match converter {
        UnitConverter::Identity => inner,
        UnitConverter::Compound(steps) => steps.iter().rev().fold(inner, wrap),
        UnitConverter::Rational(r) => {
            let operand = inner.operand(Level::Multiplicative);
            let numerator = r.numerator().to_string();
            let denominator = r.denominator().to_string();
            let text = match (numerator.as_str(), denominator.as_str()) {
                (n, "1") => format!("{}*{}", operand, n),
                ("1", d) => format!("{}/{}", operand, d),
                (n, d) => format!("{}*{}/{}", operand, n, d),
            };
            Rendered::new(text, Level::Multiplicative)
        }
        UnitConverter::Multiply { factor, reciprocal } => {
            let op = if *reciprocal { '/' } else { '*' };
            let text = format!("{}{}{:?}", inner.operand(Level::Multiplicative), op, factor);
            Rendered::new(text, Level::Multiplicative)
        }
        UnitConverter::Add(offset) => {
            let sign = if *offset < 0.0 { '-' } else { '+' };
            // "<number><sign>" up front reads back as a leading shift
            let operand = if is_number(&inner.text) {
                format!("({})", inner.text)
            } else {
                inner.operand(Level::Multiplicative)
            };
            let text = format!("{}{}{}", operand, sign, integral_text(offset.abs()));
            Rendered::new(text, Level::Additive)
        }
        UnitConverter::Log(base) => {
            let text = if *base == 10.0 {
                format!("log({})", inner.text)
            } else if *base == E {
                format!("ln({})", inner.text)
            } else {
                format!("log{}({})", integral_text(*base), inner.text)
            };
            Rendered::new(text, Level::Exponent)
        }
        UnitConverter::Exp(base) => {
            let base = if *base == E { "e".to_string() } else { integral_text(*base) };
            let text = format!("{}^{}", base, inner.operand(Level::Atomic));
            Rendered::new(text, Level::Exponent)
        }
    }
}

/// Integral values without a fraction or exponent, so they lex as integers
fn integral_text(value: f64) -> String {
    if value.is_finite() && value.fract() == 0.0 {
        format!("{:.0}", value)
    } else {
        format!("{:?}", value)
    }
}

fn is_number(text: &str) -> bool {
    let mut lexer = Lexer::new(text);
    let first = lexer.next_token().map(|t| t.kind);
    let second = lexer.next_token().map(|t| t.kind);
    matches!(first, Ok(TokenKind::Integer | TokenKind::FloatingPoint)) && matches!(second, Ok(TokenKind::End))
}

impl fmt::Display for Unit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_one() {
            return write!(f, "1");
        }
        write!(f, "{}", SYMBOLS.render(self))
    }
}
