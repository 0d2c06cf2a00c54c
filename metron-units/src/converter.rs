//! Unit converters
//!
//! A converter maps a value stated in one unit onto its parent unit.
//! Converters compose with [`UnitConverter::then`], which merges adjacent
//! steps where the algebra allows it, and invert exactly with
//! [`UnitConverter::inverse`].

use std::f64::consts::E;
use std::fmt;
use dashu_int::{IBig, UBig};
use dashu_ratio::RBig;

/// Composable transform between a unit and its parent unit
#[derive(Debug, Clone, PartialEq)]
pub enum UnitConverter {
    Identity,
    /// Exact scale: `value * ratio`
    Rational(RBig),
    /// Floating-point scale; `reciprocal` divides by `factor` instead
    Multiply { factor: f64, reciprocal: bool },
    /// Affine shift: `value + offset`
    Add(f64),
    /// `log_base(value)`
    Log(f64),
    /// `base^value`
    Exp(f64),
    /// Steps applied first to last
    Compound(Vec<UnitConverter>),
}

/// Largest power raised exactly; beyond it the scale goes through `f64`
const EXACT_POWER_LIMIT: u32 = 64;

fn one() -> RBig {
    RBig::from_parts(IBig::ONE, UBig::ONE)
}

impl UnitConverter {
    // ========== Construction ==========

    /// Exact integer scale; zero has no exact inverse and becomes a float scale
    pub fn integer(n: i64) -> Self {
        match n {
            0 => UnitConverter::Multiply { factor: 0.0, reciprocal: false },
            1 => UnitConverter::Identity,
            _ => UnitConverter::Rational(RBig::from_parts(IBig::from(n), UBig::ONE)),
        }
    }

    /// Exact scale `numerator / denominator`
    pub fn fraction(numerator: u128, denominator: u128) -> Self {
        if numerator == 0 || denominator == 0 {
            return UnitConverter::Multiply { factor: 0.0, reciprocal: denominator == 0 };
        }
        Self::from_ratio(RBig::from_parts(IBig::from(numerator), UBig::from(denominator)))
    }

    /// Exact scale by `10^exponent`
    pub fn power_of_ten(exponent: u32, negative: bool) -> Self {
        let magnitude = 10u128.pow(exponent);
        if negative {
            Self::fraction(1, magnitude)
        } else {
            Self::fraction(magnitude, 1)
        }
    }

    /// Floating-point scale
    pub fn multiply(factor: f64) -> Self {
        if factor == 1.0 {
            UnitConverter::Identity
        } else {
            UnitConverter::Multiply { factor, reciprocal: false }
        }
    }

    /// Additive offset
    pub fn add(offset: f64) -> Self {
        if offset == 0.0 {
            UnitConverter::Identity
        } else {
            UnitConverter::Add(offset)
        }
    }

    /// Logarithm to the given base
    pub fn log(base: f64) -> Self {
        UnitConverter::Log(base)
    }

    /// Exponentiation of the given base
    pub fn exp(base: f64) -> Self {
        UnitConverter::Exp(base)
    }

    fn from_ratio(ratio: RBig) -> Self {
        if ratio == one() {
            UnitConverter::Identity
        } else if ratio.numerator() == &IBig::ZERO {
            UnitConverter::Multiply { factor: 0.0, reciprocal: false }
        } else {
            UnitConverter::Rational(ratio)
        }
    }

    fn from_steps(mut steps: Vec<UnitConverter>) -> Self {
        match steps.len() {
            0 => UnitConverter::Identity,
            1 => steps.remove(0),
            _ => UnitConverter::Compound(steps),
        }
    }

    // ========== Predicates ==========

    pub fn is_identity(&self) -> bool {
        matches!(self, UnitConverter::Identity)
    }

    /// Linear converters preserve zero and scale: `c(a*x + b*y) == a*c(x) + b*c(y)`
    pub fn is_linear(&self) -> bool {
        match self {
            UnitConverter::Identity
            | UnitConverter::Rational(_)
            | UnitConverter::Multiply { .. } => true,
            UnitConverter::Add(_) | UnitConverter::Log(_) | UnitConverter::Exp(_) => false,
            UnitConverter::Compound(steps) => steps.iter().all(|s| s.is_linear()),
        }
    }

    /// The exact ratio of a pure rational scale
    pub fn ratio(&self) -> Option<&RBig> {
        match self {
            UnitConverter::Rational(r) => Some(r),
            _ => None,
        }
    }

    // ========== Algebra ==========

    /// Apply `self`, then `next`
    pub fn then(&self, next: &UnitConverter) -> UnitConverter {
        let mut steps = self.steps();
        for step in next.steps() {
            push_step(&mut steps, step);
        }
        Self::from_steps(steps)
    }

    /// Exact inverse; `c.inverse().inverse() == c`
    pub fn inverse(&self) -> UnitConverter {
        match self {
            UnitConverter::Identity => UnitConverter::Identity,
            UnitConverter::Rational(r) => {
                if r.numerator() == &IBig::ZERO {
                    UnitConverter::Multiply { factor: 0.0, reciprocal: true }
                } else {
                    UnitConverter::Rational(one() / r.clone())
                }
            }
            UnitConverter::Multiply { factor, reciprocal } => UnitConverter::Multiply {
                factor: *factor,
                reciprocal: !reciprocal,
            },
            UnitConverter::Add(offset) => UnitConverter::Add(-offset),
            UnitConverter::Log(base) => UnitConverter::Exp(*base),
            UnitConverter::Exp(base) => UnitConverter::Log(*base),
            UnitConverter::Compound(steps) => {
                UnitConverter::Compound(steps.iter().rev().map(|s| s.inverse()).collect())
            }
        }
    }

    /// `self` applied `n` times in a row, the inverse for negative `n`
    ///
    /// Only affine converters have a closed form; `None` for logarithmic
    /// steps.
    pub fn powi(&self, n: i32) -> Option<UnitConverter> {
        if n < 0 {
            self.inverse().repeat(n.unsigned_abs())
        } else {
            self.repeat(n.unsigned_abs())
        }
    }

    fn repeat(&self, times: u32) -> Option<UnitConverter> {
        if times == 0 {
            return Some(UnitConverter::Identity);
        }
        match self {
            UnitConverter::Identity => Some(UnitConverter::Identity),
            UnitConverter::Rational(r) if times <= EXACT_POWER_LIMIT => {
                Some(Self::from_ratio(r.pow(times as usize)))
            }
            UnitConverter::Rational(r) => {
                Some(UnitConverter::multiply(r.to_f64().value().powf(f64::from(times))))
            }
            UnitConverter::Multiply { factor, reciprocal } => Some(UnitConverter::Multiply {
                factor: factor.powf(f64::from(times)),
                reciprocal: *reciprocal,
            }),
            UnitConverter::Add(offset) => Some(UnitConverter::add(offset * f64::from(times))),
            UnitConverter::Log(_) | UnitConverter::Exp(_) => None,
            // scales commute, so each step is raised on its own
            UnitConverter::Compound(steps) if self.is_linear() => steps
                .iter()
                .try_fold(UnitConverter::Identity, |acc, s| Some(acc.then(&s.repeat(times)?))),
            UnitConverter::Compound(_) => None,
        }
    }

    /// Convert a value stated in the source unit to the parent unit
    pub fn convert(&self, value: f64) -> f64 {
        match self {
            UnitConverter::Identity => value,
            UnitConverter::Rational(r) => value * r.to_f64().value(),
            UnitConverter::Multiply { factor, reciprocal: false } => value * factor,
            UnitConverter::Multiply { factor, reciprocal: true } => value / factor,
            UnitConverter::Add(offset) => value + offset,
            UnitConverter::Log(base) => value.ln() / base.ln(),
            UnitConverter::Exp(base) => base.powf(value),
            UnitConverter::Compound(steps) => steps.iter().fold(value, |v, s| s.convert(v)),
        }
    }

    /// Scale factor of a linear converter as a float
    pub fn factor(&self) -> Option<f64> {
        if self.is_linear() {
            Some(self.convert(1.0))
        } else {
            None
        }
    }

    fn steps(&self) -> Vec<UnitConverter> {
        match self {
            UnitConverter::Identity => Vec::new(),
            UnitConverter::Compound(steps) => steps.clone(),
            other => vec![other.clone()],
        }
    }
}

/// Append a step, merging it into the previous one when possible
fn push_step(steps: &mut Vec<UnitConverter>, step: UnitConverter) {
    let Some(last) = steps.pop() else {
        steps.push(step);
        return;
    };

    match merge(&last, &step) {
        Some(UnitConverter::Identity) => {}
        Some(merged) => steps.push(merged),
        None => {
            steps.push(last);
            steps.push(step);
        }
    }
}

fn merge(first: &UnitConverter, second: &UnitConverter) -> Option<UnitConverter> {
    use UnitConverter::*;

    match (first, second) {
        (Rational(a), Rational(b)) => Some(UnitConverter::from_ratio(a * b)),
        (Multiply { factor: a, reciprocal: ra }, Multiply { factor: b, reciprocal: rb }) => {
            if a == b && ra != rb {
                return Some(Identity);
            }
            Some(UnitConverter::multiply(first.convert(1.0) * second.convert(1.0)))
        }
        (Add(a), Add(b)) => Some(UnitConverter::add(a + b)),
        (Log(a), Exp(b)) | (Exp(a), Log(b)) if a == b => Some(Identity),
        _ => None,
    }
}

impl fmt::Display for UnitConverter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitConverter::Identity => write!(f, "identity"),
            UnitConverter::Rational(r) => write!(f, "×{}", r),
            UnitConverter::Multiply { factor, reciprocal: false } => write!(f, "×{}", factor),
            UnitConverter::Multiply { factor, reciprocal: true } => write!(f, "÷{}", factor),
            UnitConverter::Add(offset) => write!(f, "+{}", offset),
            UnitConverter::Log(base) if *base == E => write!(f, "ln"),
            UnitConverter::Log(base) => write!(f, "log{}", base),
            UnitConverter::Exp(base) if *base == E => write!(f, "exp"),
            UnitConverter::Exp(base) => write!(f, "{}^", base),
            UnitConverter::Compound(steps) => {
                let parts: Vec<String> = steps.iter().map(|s| s.to_string()).collect();
                write!(f, "{}", parts.join(" then "))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn samples() -> Vec<UnitConverter> {
        vec![
            UnitConverter::Identity,
            UnitConverter::integer(1000),
            UnitConverter::fraction(1, 3),
            UnitConverter::multiply(2.5),
            UnitConverter::multiply(0.1),
            UnitConverter::add(273.15),
            UnitConverter::log(10.0),
            UnitConverter::exp(E),
            UnitConverter::integer(1000).then(&UnitConverter::add(5.0)),
            UnitConverter::integer(0),
        ]
    }

    #[test]
    fn test_inverse_is_involution() {
        for c in samples() {
            assert_eq!(c.inverse().inverse(), c, "inverse of {} did not round-trip", c);
        }
    }

    #[test]
    fn test_then_with_inverse_is_identity() {
        for c in samples() {
            if c == UnitConverter::integer(0) {
                continue;
            }
            assert!(c.then(&c.inverse()).is_identity(), "{} then its inverse", c);
        }
    }

    #[test]
    fn test_rational_merge() {
        let kilo = UnitConverter::power_of_ten(3, false);
        let milli = UnitConverter::power_of_ten(3, true);
        assert!(kilo.then(&milli).is_identity());

        let micro = milli.then(&milli);
        assert_eq!(micro, UnitConverter::power_of_ten(6, true));
    }

    #[test]
    fn test_then_is_associative() {
        let a = UnitConverter::integer(60);
        let b = UnitConverter::add(3.0);
        let c = UnitConverter::log(10.0);
        assert_eq!(a.then(&b).then(&c), a.then(&b.then(&c)));
    }

    #[test]
    fn test_convert() {
        assert_eq!(UnitConverter::integer(1000).convert(5.0), 5000.0);
        assert_eq!(UnitConverter::fraction(1, 4).convert(2.0), 0.5);
        assert_eq!(UnitConverter::add(273.15).convert(0.0), 273.15);
        assert!((UnitConverter::log(10.0).convert(1000.0) - 3.0).abs() < 1e-12);
        assert!((UnitConverter::exp(2.0).convert(3.0) - 8.0).abs() < 1e-12);
        assert_eq!(UnitConverter::multiply(2.5).inverse().convert(5.0), 2.0);
    }

    #[test]
    fn test_compound_convert_order() {
        // scale first, then shift
        let c = UnitConverter::integer(2).then(&UnitConverter::add(1.0));
        assert_eq!(c.convert(3.0), 7.0);
        assert_eq!(c.inverse().convert(7.0), 3.0);
    }

    #[test]
    fn test_powi() {
        let kilo = UnitConverter::power_of_ten(3, false);
        assert_eq!(kilo.powi(2), Some(UnitConverter::power_of_ten(6, false)));
        assert_eq!(kilo.powi(-3), Some(UnitConverter::power_of_ten(9, true)));
        assert_eq!(kilo.powi(0), Some(UnitConverter::Identity));
        assert_eq!(UnitConverter::multiply(2.0).powi(3).map(|c| c.convert(1.0)), Some(8.0));
        assert_eq!(UnitConverter::add(1.5).powi(2), Some(UnitConverter::add(3.0)));
        assert_eq!(UnitConverter::log(10.0).powi(2), None);
    }

    #[test]
    fn test_powi_large_exponent_is_immediate() {
        let kilo = UnitConverter::power_of_ten(3, false);
        let huge = kilo.powi(2_000_000).unwrap();
        assert_eq!(huge.convert(1.0), f64::INFINITY);
        let tiny = kilo.powi(i32::MIN).unwrap();
        assert_eq!(tiny.convert(1.0), 0.0);
    }

    #[test]
    fn test_convert_huge_ratio() {
        // numerator and denominator both beyond the f64 range
        let c = UnitConverter::fraction(10u128.pow(30) + 1, 10u128.pow(30)).powi(20).unwrap();
        assert!(c.ratio().is_some());
        assert!((c.convert(1.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_is_linear() {
        assert!(UnitConverter::Identity.is_linear());
        assert!(UnitConverter::integer(3).is_linear());
        assert!(UnitConverter::multiply(1.5).is_linear());
        assert!(!UnitConverter::add(1.0).is_linear());
        assert!(!UnitConverter::log(10.0).is_linear());
        assert!(!UnitConverter::integer(2).then(&UnitConverter::add(1.0)).is_linear());
    }

    #[test]
    fn test_factor() {
        assert_eq!(UnitConverter::power_of_ten(3, true).factor(), Some(0.001));
        assert_eq!(UnitConverter::add(1.0).factor(), None);
    }
}
