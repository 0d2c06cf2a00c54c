//! Physical dimensions
//!
//! Each dimension is a vector of exponents over the 7 SI base quantities:
//! [length, mass, time, current, temperature, amount, luminosity]
//!
//! Dimensions are informational: the parser composes them alongside units
//! but never rejects an expression for mixing them.

use std::fmt;
use serde::{Serialize, Deserialize};

const SYMBOLS: [&str; 7] = ["L", "M", "T", "I", "Θ", "N", "J"];

/// Exponents of the 7 SI base dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Dimension {
    /// [length, mass, time, current, temperature, amount, luminosity]
    pub exponents: [i32; 7],
}

impl Dimension {
    pub const DIMENSIONLESS: Dimension = Dimension { exponents: [0, 0, 0, 0, 0, 0, 0] };
    pub const LENGTH: Dimension = Dimension { exponents: [1, 0, 0, 0, 0, 0, 0] };
    pub const MASS: Dimension = Dimension { exponents: [0, 1, 0, 0, 0, 0, 0] };
    pub const TIME: Dimension = Dimension { exponents: [0, 0, 1, 0, 0, 0, 0] };
    pub const CURRENT: Dimension = Dimension { exponents: [0, 0, 0, 1, 0, 0, 0] };
    pub const TEMPERATURE: Dimension = Dimension { exponents: [0, 0, 0, 0, 1, 0, 0] };
    pub const AMOUNT: Dimension = Dimension { exponents: [0, 0, 0, 0, 0, 1, 0] };
    pub const LUMINOSITY: Dimension = Dimension { exponents: [0, 0, 0, 0, 0, 0, 1] };

    /// Area [L^2]
    pub const AREA: Dimension = Dimension { exponents: [2, 0, 0, 0, 0, 0, 0] };
    /// Volume [L^3]
    pub const VOLUME: Dimension = Dimension { exponents: [3, 0, 0, 0, 0, 0, 0] };
    /// Velocity [L T^-1]
    pub const VELOCITY: Dimension = Dimension { exponents: [1, 0, -1, 0, 0, 0, 0] };
    /// Frequency [T^-1]
    pub const FREQUENCY: Dimension = Dimension { exponents: [0, 0, -1, 0, 0, 0, 0] };
    /// Force [M L T^-2]
    pub const FORCE: Dimension = Dimension { exponents: [1, 1, -2, 0, 0, 0, 0] };
    /// Pressure [M L^-1 T^-2]
    pub const PRESSURE: Dimension = Dimension { exponents: [-1, 1, -2, 0, 0, 0, 0] };
    /// Energy [M L^2 T^-2]
    pub const ENERGY: Dimension = Dimension { exponents: [2, 1, -2, 0, 0, 0, 0] };
    /// Power [M L^2 T^-3]
    pub const POWER: Dimension = Dimension { exponents: [2, 1, -3, 0, 0, 0, 0] };
    /// Electric charge [I T]
    pub const CHARGE: Dimension = Dimension { exponents: [0, 0, 1, 1, 0, 0, 0] };
    /// Voltage [M L^2 T^-3 I^-1]
    pub const VOLTAGE: Dimension = Dimension { exponents: [2, 1, -3, -1, 0, 0, 0] };
    /// Capacitance [M^-1 L^-2 T^4 I^2]
    pub const CAPACITANCE: Dimension = Dimension { exponents: [-2, -1, 4, 2, 0, 0, 0] };
    /// Resistance [M L^2 T^-3 I^-2]
    pub const RESISTANCE: Dimension = Dimension { exponents: [2, 1, -3, -2, 0, 0, 0] };
    /// Conductance [M^-1 L^-2 T^3 I^2]
    pub const CONDUCTANCE: Dimension = Dimension { exponents: [-2, -1, 3, 2, 0, 0, 0] };
    /// Magnetic flux [M L^2 T^-2 I^-1]
    pub const MAGNETIC_FLUX: Dimension = Dimension { exponents: [2, 1, -2, -1, 0, 0, 0] };
    /// Magnetic flux density [M T^-2 I^-1]
    pub const MAGNETIC_FLUX_DENSITY: Dimension = Dimension { exponents: [0, 1, -2, -1, 0, 0, 0] };
    /// Inductance [M L^2 T^-2 I^-2]
    pub const INDUCTANCE: Dimension = Dimension { exponents: [2, 1, -2, -2, 0, 0, 0] };
    /// Illuminance [J L^-2]
    pub const ILLUMINANCE: Dimension = Dimension { exponents: [-2, 0, 0, 0, 0, 0, 1] };
    /// Absorbed dose [L^2 T^-2]
    pub const DOSE: Dimension = Dimension { exponents: [2, 0, -2, 0, 0, 0, 0] };
    /// Catalytic activity [N T^-1]
    pub const CATALYTIC_ACTIVITY: Dimension = Dimension { exponents: [0, 0, -1, 0, 0, 1, 0] };

    pub fn new(exponents: [i32; 7]) -> Self {
        Dimension { exponents }
    }

    pub fn is_dimensionless(&self) -> bool {
        self.exponents.iter().all(|&e| e == 0)
    }

    /// Multiply dimensions (add exponents); `None` when an exponent overflows
    pub fn multiply(&self, other: &Dimension) -> Option<Dimension> {
        self.zip_with(other, i32::checked_add)
    }

    /// Divide dimensions (subtract exponents)
    pub fn divide(&self, other: &Dimension) -> Option<Dimension> {
        self.zip_with(other, i32::checked_sub)
    }

    /// Raise to integer power (multiply exponents)
    pub fn power(&self, exp: i32) -> Option<Dimension> {
        self.map(|e| e.checked_mul(exp))
    }

    /// Take the n-th root; `None` when an exponent is not divisible by `n`
    pub fn root(&self, n: i32) -> Option<Dimension> {
        if self.exponents.iter().any(|e| e.checked_rem(n) != Some(0)) {
            return None;
        }
        self.map(|e| e.checked_div(n))
    }

    fn map(&self, op: impl Fn(i32) -> Option<i32>) -> Option<Dimension> {
        let mut exponents = [0i32; 7];
        for (slot, &e) in exponents.iter_mut().zip(&self.exponents) {
            *slot = op(e)?;
        }
        Some(Dimension { exponents })
    }

    fn zip_with(&self, other: &Dimension, op: impl Fn(i32, i32) -> Option<i32>) -> Option<Dimension> {
        let mut exponents = [0i32; 7];
        for (i, slot) in exponents.iter_mut().enumerate() {
            *slot = op(self.exponents[i], other.exponents[i])?;
        }
        Some(Dimension { exponents })
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts: Vec<String> = self.exponents.iter()
            .zip(SYMBOLS)
            .filter(|(exp, _)| **exp != 0)
            .map(|(&exp, sym)| if exp == 1 { sym.to_string() } else { format!("{}^{}", sym, exp) })
            .collect();

        if parts.is_empty() {
            write!(f, "1")
        } else {
            write!(f, "{}", parts.join(" "))
        }
    }
}

impl Default for Dimension {
    fn default() -> Self {
        Self::DIMENSIONLESS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dimensionless() {
        assert!(Dimension::DIMENSIONLESS.is_dimensionless());
        assert!(!Dimension::LENGTH.is_dimensionless());
    }

    #[test]
    fn test_force() {
        let acceleration = Dimension::LENGTH.divide(&Dimension::TIME.power(2).unwrap()).unwrap();
        assert_eq!(Dimension::MASS.multiply(&acceleration), Some(Dimension::FORCE));
    }

    #[test]
    fn test_exponent_overflow() {
        assert_eq!(Dimension::FORCE.power(2_000_000_000), None);
        let big = Dimension::LENGTH.power(i32::MAX).unwrap();
        assert_eq!(big.multiply(&Dimension::LENGTH), None);
        assert_eq!(Dimension::LENGTH.power(i32::MIN).unwrap().divide(&Dimension::LENGTH), None);
        assert_eq!(Dimension::LENGTH.power(i32::MIN).unwrap().root(-1), None);
    }

    #[test]
    fn test_root() {
        assert_eq!(Dimension::AREA.root(2), Some(Dimension::LENGTH));
        assert_eq!(Dimension::LENGTH.root(2), None);
        assert_eq!(Dimension::LENGTH.root(0), None);
        assert_eq!(Dimension::AREA.root(-2), Dimension::LENGTH.power(-1));
    }

    #[test]
    fn test_display() {
        assert_eq!(format!("{}", Dimension::DIMENSIONLESS), "1");
        assert_eq!(format!("{}", Dimension::LENGTH), "L");
        assert_eq!(format!("{}", Dimension::VELOCITY), "L T^-1");
    }
}
