//! Quantity type - a value with an associated unit

use std::fmt;
use metron_core::Number;
use crate::{ConversionError, Dimension, Unit};

/// A physical quantity: a numeric value with an associated unit
#[derive(Debug, Clone, PartialEq)]
pub struct Quantity {
    /// The numeric value
    pub value: Number,
    /// The unit of measurement
    pub unit: Unit,
}

impl Quantity {
    /// Create a new quantity
    pub fn new(value: Number, unit: Unit) -> Self {
        Quantity { value, unit }
    }

    /// Create a dimensionless quantity (pure number)
    pub fn dimensionless(value: Number) -> Self {
        Quantity { value, unit: Unit::One }
    }

    /// True when the unit is the identity unit
    pub fn is_dimensionless(&self) -> bool {
        self.unit.is_one()
    }

    /// Get the dimension of this quantity
    pub fn dimension(&self) -> Option<Dimension> {
        self.unit.dimension()
    }

    /// Convert to the unit's reference units (km/h -> m/s, °C -> K)
    pub fn to_reference(&self) -> Result<Quantity, ConversionError> {
        let converter = self.unit.system_converter()?;
        let value = if converter.is_identity() {
            self.value
        } else {
            Number::from(converter.convert(self.value.to_f64()))
        };
        Ok(Quantity::new(value, self.unit.reference_unit()?))
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_dimensionless() {
            write!(f, "{}", self.value)
        } else {
            write!(f, "{} {}", self.value, self.unit)
        }
    }
}
