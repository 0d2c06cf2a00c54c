//! Unit algebra
//!
//! Units are immutable values. Every operation returns a new `Unit`; the
//! dimensionless `Unit::One` is the neutral element of multiply and divide.

use metron_core::Number;
use thiserror::Error;
use crate::{Dimension, UnitConverter};

/// A unit of measurement
#[derive(Debug, Clone, PartialEq)]
pub enum Unit {
    /// Dimensionless identity unit
    One,
    /// Named unit from a symbol table (e.g. "m", "kg", "N")
    Base(BaseUnit),
    /// Product of units raised to rational exponents (e.g. "kg·m/s²")
    Product(ProductUnit),
    /// Parent unit seen through a converter (e.g. "km", "°C", "log(Hz)")
    Transformed(TransformedUnit),
}

/// Named unit with its dimensional signature
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BaseUnit {
    /// The unit symbol (e.g., "m", "kg", "s")
    pub symbol: String,
    /// The unit name (e.g., "metre", "kilogram", "second")
    pub name: String,
    pub dimension: Dimension,
}

/// One factor of a product: `unit^(pow/root)`, with `root > 0` and the
/// fraction in lowest terms
#[derive(Debug, Clone, PartialEq)]
pub struct Factor {
    pub unit: Unit,
    pub pow: i32,
    pub root: i32,
}

/// Product of factors; equality ignores factor order
#[derive(Debug, Clone)]
pub struct ProductUnit {
    factors: Vec<Factor>,
}

/// A unit defined by a converter to its parent
#[derive(Debug, Clone, PartialEq)]
pub struct TransformedUnit {
    parent: Box<Unit>,
    converter: UnitConverter,
}

/// Errors raised while deriving a unit's converter to its reference units
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConversionError {
    #[error("{unit} is non-linear and cannot be part of a product")]
    NonLinear { unit: String },

    #[error("{unit} is scaled and holds a fractional exponent")]
    FractionalExponent { unit: String },

    #[error("exponents of {unit} overflow when its converters are removed")]
    ExponentOverflow { unit: String },
}

impl Unit {
    /// Create a named unit
    pub fn base(symbol: &str, name: &str, dimension: Dimension) -> Self {
        Unit::Base(BaseUnit {
            symbol: symbol.to_string(),
            name: name.to_string(),
            dimension,
        })
    }

    pub fn is_one(&self) -> bool {
        matches!(self, Unit::One)
    }

    // ========== Algebra ==========
    //
    // Products carry `i32` exponents; the operations that merge them return
    // `None` when a merged exponent leaves that range.

    /// Multiply two units (e.g. kg * m)
    pub fn multiply(&self, other: &Unit) -> Option<Unit> {
        if self.is_one() {
            return Some(other.clone());
        }
        if other.is_one() {
            return Some(self.clone());
        }
        // Dimensionless scales fold into a transform of the other operand
        if let Some(c) = other.scalar_converter() {
            return Some(self.transform(c.clone()));
        }
        if let Some(c) = self.scalar_converter() {
            return Some(other.transform(c.clone()));
        }

        let mut factors = Vec::new();
        collect(&mut factors, self, 1, 1)?;
        collect(&mut factors, other, 1, 1)?;
        Some(finish(factors))
    }

    /// Divide two units (e.g. m / s)
    pub fn divide(&self, other: &Unit) -> Option<Unit> {
        if other.is_one() {
            return Some(self.clone());
        }
        if let Some(c) = other.scalar_converter() {
            return Some(self.transform(c.inverse()));
        }
        self.multiply(&other.inverse()?)
    }

    /// Scale by a number: integers scale exactly, floats by a float factor
    pub fn multiply_by(&self, n: &Number) -> Unit {
        match n {
            Number::Integer(i) => self.transform(UnitConverter::integer(*i)),
            Number::Float(f) => self.transform(UnitConverter::multiply(*f)),
        }
    }

    /// Raise to an integer power; `pow(0)` is `One`
    pub fn pow(&self, n: i32) -> Option<Unit> {
        if n == 0 || self.is_one() {
            return Some(Unit::One);
        }
        if n == 1 {
            return Some(self.clone());
        }
        let mut factors = Vec::new();
        collect(&mut factors, self, i64::from(n), 1)?;
        Some(finish(factors))
    }

    /// Take an integer root; a negative root also inverts, `root(0)` is `One`
    pub fn root(&self, n: i32) -> Option<Unit> {
        if n == 0 || self.is_one() {
            return Some(Unit::One);
        }
        if n == 1 {
            return Some(self.clone());
        }
        let mut factors = Vec::new();
        collect(&mut factors, self, 1, i64::from(n))?;
        Some(finish(factors))
    }

    /// Reciprocal unit (e.g. s -> 1/s)
    pub fn inverse(&self) -> Option<Unit> {
        self.pow(-1)
    }

    /// Affine shift in the parent's scale (e.g. K shifted by 273.15 is °C)
    pub fn shift(&self, offset: f64) -> Unit {
        self.transform(UnitConverter::add(offset))
    }

    /// Compose a converter onto this unit
    ///
    /// The result converts to `self` through `converter`; transforming an
    /// already transformed unit extends its converter instead of nesting.
    pub fn transform(&self, converter: UnitConverter) -> Unit {
        if converter.is_identity() {
            return self.clone();
        }
        match self {
            Unit::Transformed(t) => {
                let combined = converter.then(&t.converter);
                if combined.is_identity() {
                    (*t.parent).clone()
                } else {
                    Unit::Transformed(TransformedUnit { parent: t.parent.clone(), converter: combined })
                }
            }
            _ => Unit::Transformed(TransformedUnit {
                parent: Box::new(self.clone()),
                converter,
            }),
        }
    }

    // ========== Inspection ==========

    /// Dimensional signature; `None` when a root leaves a fractional exponent
    pub fn dimension(&self) -> Option<Dimension> {
        match self {
            Unit::One => Some(Dimension::DIMENSIONLESS),
            Unit::Base(b) => Some(b.dimension),
            Unit::Transformed(t) => t.parent.dimension(),
            Unit::Product(p) => p.factors.iter().try_fold(Dimension::DIMENSIONLESS, |acc, f| {
                let d = f.unit.dimension()?.power(f.pow)?.root(f.root)?;
                acc.multiply(&d)
            }),
        }
    }

    /// Converter from this unit to the named units it is built from
    pub fn system_converter(&self) -> Result<UnitConverter, ConversionError> {
        match self {
            Unit::One | Unit::Base(_) => Ok(UnitConverter::Identity),
            Unit::Transformed(t) => Ok(t.converter.then(&t.parent.system_converter()?)),
            Unit::Product(p) => {
                let mut converter = UnitConverter::Identity;
                for f in &p.factors {
                    let c = f.unit.system_converter()?;
                    if !c.is_linear() {
                        return Err(ConversionError::NonLinear { unit: f.unit.to_string() });
                    }
                    if c.is_identity() {
                        continue;
                    }
                    if f.root != 1 {
                        return Err(ConversionError::FractionalExponent { unit: f.unit.to_string() });
                    }
                    let step = c.powi(f.pow)
                        .ok_or_else(|| ConversionError::NonLinear { unit: f.unit.to_string() })?;
                    converter = converter.then(&step);
                }
                Ok(converter)
            }
        }
    }

    /// The same unit with every converter stripped (km -> m, km/h -> m/s)
    pub fn reference_unit(&self) -> Result<Unit, ConversionError> {
        match self {
            Unit::One | Unit::Base(_) => Ok(self.clone()),
            Unit::Transformed(t) => t.parent.reference_unit(),
            Unit::Product(p) => {
                let mut factors = Vec::new();
                for f in &p.factors {
                    collect(&mut factors, &f.unit.reference_unit()?, i64::from(f.pow), i64::from(f.root))
                        .ok_or_else(|| ConversionError::ExponentOverflow { unit: self.to_string() })?;
                }
                Ok(finish(factors))
            }
        }
    }

    /// Converter of a dimensionless linear scale such as the unit "1000"
    fn scalar_converter(&self) -> Option<&UnitConverter> {
        match self {
            Unit::Transformed(t) if t.parent.is_one() && t.converter.is_linear() => Some(&t.converter),
            _ => None,
        }
    }
}

impl ProductUnit {
    pub fn factors(&self) -> &[Factor] {
        &self.factors
    }
}

impl PartialEq for ProductUnit {
    fn eq(&self, other: &Self) -> bool {
        self.factors.len() == other.factors.len()
            && self.factors.iter().all(|f| other.factors.contains(f))
    }
}

impl TransformedUnit {
    pub fn parent(&self) -> &Unit {
        &self.parent
    }

    /// Converter from this unit to its parent
    pub fn converter(&self) -> &UnitConverter {
        &self.converter
    }
}

fn gcd(a: i64, b: i64) -> i64 {
    let (mut a, mut b) = (a.unsigned_abs(), b.unsigned_abs());
    while b != 0 {
        (a, b) = (b, a % b);
    }
    // operands stay within i32 products, so the gcd fits
    a as i64
}

impl Factor {
    /// Normalize `pow/root`; `None` when the reduced fraction leaves `i32`
    fn new(unit: Unit, pow: i64, root: i64) -> Option<Self> {
        let (mut pow, mut root) = if root < 0 { (-pow, -root) } else { (pow, root) };
        let g = gcd(pow, root);
        if g > 1 {
            pow /= g;
            root /= g;
        }
        Some(Factor {
            unit,
            pow: i32::try_from(pow).ok()?,
            root: i32::try_from(root).ok()?,
        })
    }
}

/// Flatten `unit^(pow/root)` into a factor list, merging repeated units
///
/// `pow` and `root` are products of two `i32` values at most, so the merge
/// arithmetic below cannot overflow `i64`.
fn collect(factors: &mut Vec<Factor>, unit: &Unit, pow: i64, root: i64) -> Option<()> {
    match unit {
        Unit::One => {}
        Unit::Product(p) => {
            for f in &p.factors {
                let incoming = Factor::new(f.unit.clone(), i64::from(f.pow) * pow, i64::from(f.root) * root)?;
                merge(factors, incoming)?;
            }
        }
        other => merge(factors, Factor::new(other.clone(), pow, root)?)?,
    }
    Some(())
}

fn merge(factors: &mut Vec<Factor>, incoming: Factor) -> Option<()> {
    if incoming.pow == 0 {
        return Some(());
    }
    match factors.iter().position(|f| f.unit == incoming.unit) {
        Some(i) => {
            let existing = &factors[i];
            let pow = i64::from(existing.pow) * i64::from(incoming.root)
                + i64::from(incoming.pow) * i64::from(existing.root);
            let root = i64::from(existing.root) * i64::from(incoming.root);
            let merged = Factor::new(incoming.unit, pow, root)?;
            if merged.pow == 0 {
                factors.remove(i);
            } else {
                factors[i] = merged;
            }
        }
        None => factors.push(incoming),
    }
    Some(())
}

fn finish(mut factors: Vec<Factor>) -> Unit {
    match factors.len() {
        0 => Unit::One,
        1 if factors[0].pow == 1 && factors[0].root == 1 => factors.remove(0).unit,
        _ => Unit::Product(ProductUnit { factors }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn metre() -> Unit {
        Unit::base("m", "metre", Dimension::LENGTH)
    }

    fn kilogram() -> Unit {
        Unit::base("kg", "kilogram", Dimension::MASS)
    }

    fn second() -> Unit {
        Unit::base("s", "second", Dimension::TIME)
    }

    fn kilometre() -> Unit {
        metre().transform(UnitConverter::power_of_ten(3, false))
    }

    fn force() -> Unit {
        let acceleration = metre().divide(&second().pow(2).unwrap()).unwrap();
        kilogram().multiply(&acceleration).unwrap()
    }

    fn samples() -> Vec<Unit> {
        vec![
            Unit::One,
            metre(),
            kilometre(),
            force(),
            metre().shift(5.0),
            second().inverse().unwrap().transform(UnitConverter::log(10.0)),
        ]
    }

    #[test]
    fn test_identity_is_neutral() {
        for u in samples() {
            assert_eq!(u.multiply(&Unit::One), Some(u.clone()));
            assert_eq!(Unit::One.multiply(&u), Some(u.clone()));
            assert_eq!(u.divide(&Unit::One), Some(u.clone()));
        }
    }

    #[test]
    fn test_root_undoes_pow() {
        for u in samples() {
            for n in 1..=4 {
                assert_eq!(u.pow(n).and_then(|p| p.root(n)), Some(u.clone()), "root({n}) of pow({n})");
            }
        }
    }

    #[test]
    fn test_pow_zero_is_one() {
        assert_eq!(metre().pow(0), Some(Unit::One));
        assert_eq!(metre().root(0), Some(Unit::One));
    }

    #[test]
    fn test_multiply_merges_exponents() {
        let m2 = metre().multiply(&metre()).unwrap();
        assert_eq!(Some(m2.clone()), metre().pow(2));
        assert_eq!(m2.dimension(), Some(Dimension::AREA));

        let back = m2.divide(&metre()).unwrap();
        assert_eq!(back, metre());

        assert_eq!(metre().divide(&metre()), Some(Unit::One));
    }

    #[test]
    fn test_product_equality_ignores_order() {
        let a = kilogram().multiply(&metre());
        let b = metre().multiply(&kilogram());
        assert_eq!(a, b);
    }

    #[test]
    fn test_force_dimension() {
        assert_eq!(force().dimension(), Some(Dimension::FORCE));
    }

    #[test]
    fn test_pow_then_root_is_not_combined() {
        // m^2 then root 3 keeps the 2/3 exponent
        let u = metre().pow(2).unwrap().root(3).unwrap();
        match &u {
            Unit::Product(p) => {
                assert_eq!(p.factors().len(), 1);
                assert_eq!(p.factors()[0].pow, 2);
                assert_eq!(p.factors()[0].root, 3);
            }
            other => panic!("expected product, got {:?}", other),
        }
        assert_eq!(u.dimension(), None);
    }

    #[test]
    fn test_negative_root_inverts() {
        assert_eq!(metre().pow(2).unwrap().root(-2), metre().inverse());
    }

    #[test]
    fn test_exponent_overflow_is_none() {
        let big = metre().pow(65536).unwrap();
        assert_eq!(big.pow(65536), None);
        assert_eq!(metre().pow(i32::MAX).unwrap().multiply(&metre()), None);
        assert_eq!(metre().pow(i32::MIN).unwrap().divide(&metre()), None);
        assert_eq!(metre().pow(i32::MIN).unwrap().inverse(), None);
        // the reduced fraction fits even though the raw product does not
        let tiny = metre().root(65536).unwrap();
        assert_eq!(tiny.multiply(&tiny), metre().root(32768));
    }

    #[test]
    fn test_dimension_overflow_is_none() {
        let newton = Unit::base("N", "newton", Dimension::FORCE);
        let u = newton.pow(2_000_000_000).unwrap();
        assert_eq!(u.dimension(), None);
        // the exponent itself does not fit once expanded to base units
        assert_eq!(force().pow(2_000_000_000), None);
    }

    #[test]
    fn test_transform_extends_converter() {
        let km = kilometre();
        let back = km.transform(UnitConverter::power_of_ten(3, true));
        assert_eq!(back, metre());
    }

    #[test]
    fn test_scalar_folds_into_transform() {
        let thousand = Unit::One.multiply_by(&Number::Integer(1000));
        assert_eq!(metre().multiply(&thousand), Some(kilometre()));
        assert_eq!(thousand.multiply(&metre()), Some(kilometre()));
        assert_eq!(kilometre().divide(&thousand), Some(metre()));
    }

    #[test]
    fn test_multiply_by_one_is_noop() {
        assert_eq!(metre().multiply_by(&Number::Integer(1)), metre());
        assert_eq!(metre().multiply_by(&Number::Float(1.0)), metre());
    }

    #[test]
    fn test_shift() {
        let kelvin = Unit::base("K", "kelvin", Dimension::TEMPERATURE);
        let celsius = kelvin.shift(273.15);
        let c = celsius.system_converter().unwrap();
        assert_eq!(c.convert(0.0), 273.15);
        assert_eq!(celsius.dimension(), Some(Dimension::TEMPERATURE));
    }

    #[test]
    fn test_system_converter_product() {
        let hour = second().multiply_by(&Number::Integer(3600));
        let kmh = kilometre().divide(&hour).unwrap();
        let c = kmh.system_converter().unwrap();
        assert!((c.convert(36.0) - 10.0).abs() < 1e-12);
    }

    #[test]
    fn test_system_converter_large_exponent() {
        let km2 = kilometre().pow(2).unwrap();
        assert_eq!(km2.system_converter().unwrap(), UnitConverter::power_of_ten(6, false));

        let huge = kilometre().pow(2_000_000).unwrap();
        let c = huge.system_converter().unwrap();
        assert_eq!(c.convert(1.0), f64::INFINITY);
        let c = kilometre().pow(-2_000_000).unwrap().system_converter().unwrap();
        assert_eq!(c.convert(1.0), 0.0);
    }

    #[test]
    fn test_reference_unit() {
        let hour = second().multiply_by(&Number::Integer(3600));
        let kmh = kilometre().divide(&hour).unwrap();
        assert_eq!(kmh.reference_unit(), Ok(metre().divide(&second()).unwrap()));
        assert_eq!(metre().shift(1.0).reference_unit(), Ok(metre()));
        assert_eq!(Unit::One.reference_unit(), Ok(Unit::One));
    }

    #[test]
    fn test_reference_unit_overflow() {
        let u = kilometre().pow(i32::MAX).unwrap().multiply(&metre()).unwrap();
        assert!(matches!(u.reference_unit(), Err(ConversionError::ExponentOverflow { .. })));
    }

    #[test]
    fn test_system_converter_rejects_non_linear_factor() {
        let log_m = metre().transform(UnitConverter::log(10.0));
        let product = log_m.multiply(&second()).unwrap();
        assert!(matches!(product.system_converter(), Err(ConversionError::NonLinear { .. })));
    }

    #[test]
    fn test_system_converter_rejects_fractional_scaled() {
        let u = kilometre().root(2).unwrap();
        assert!(matches!(u.system_converter(), Err(ConversionError::FractionalExponent { .. })));
        assert!(metre().root(2).unwrap().system_converter().unwrap().is_identity());
    }
}
