//! Default SI symbol table: base units, named derived units, common non-SI
//! units accepted for use with SI, and the decimal prefixes

use std::sync::LazyLock;
use crate::{Dimension, Prefix, SymbolMap, SymbolTable, Unit, UnitConverter};

/// Global default symbol table
pub static SYMBOLS: LazyLock<SymbolMap> = LazyLock::new(SymbolMap::with_si);

impl SymbolMap {
    /// Table with the SI units and prefixes
    pub fn with_si() -> Self {
        let mut map = SymbolMap::new();
        map.register_base_units();
        map.register_derived_units();
        map.register_accepted_units();
        map.register_prefixes();
        map
    }

    fn register_base(&mut self, symbol: &str, name: &str, dimension: Dimension) {
        self.register(symbol, Unit::base(symbol, name, dimension));
    }

    fn lookup(&self, symbol: &str) -> Unit {
        self.unit(symbol).unwrap_or(Unit::One)
    }

    fn register_base_units(&mut self) {
        self.register_base("m", "metre", Dimension::LENGTH);
        self.register_base("kg", "kilogram", Dimension::MASS);
        self.register_base("s", "second", Dimension::TIME);
        self.register_base("A", "ampere", Dimension::CURRENT);
        self.register_base("K", "kelvin", Dimension::TEMPERATURE);
        self.register_base("mol", "mole", Dimension::AMOUNT);
        self.register_base("cd", "candela", Dimension::LUMINOSITY);
    }

    fn register_derived_units(&mut self) {
        self.register_base("rad", "radian", Dimension::DIMENSIONLESS);
        self.register_base("sr", "steradian", Dimension::DIMENSIONLESS);
        self.register_base("Hz", "hertz", Dimension::FREQUENCY);
        self.register_base("N", "newton", Dimension::FORCE);
        self.register_base("Pa", "pascal", Dimension::PRESSURE);
        self.register_base("J", "joule", Dimension::ENERGY);
        self.register_base("W", "watt", Dimension::POWER);
        self.register_base("C", "coulomb", Dimension::CHARGE);
        self.register_base("V", "volt", Dimension::VOLTAGE);
        self.register_base("F", "farad", Dimension::CAPACITANCE);
        self.register_base("Ω", "ohm", Dimension::RESISTANCE);
        self.register_base("S", "siemens", Dimension::CONDUCTANCE);
        self.register_base("Wb", "weber", Dimension::MAGNETIC_FLUX);
        self.register_base("T", "tesla", Dimension::MAGNETIC_FLUX_DENSITY);
        self.register_base("H", "henry", Dimension::INDUCTANCE);
        self.register_base("lm", "lumen", Dimension::LUMINOSITY);
        self.register_base("lx", "lux", Dimension::ILLUMINANCE);
        self.register_base("Bq", "becquerel", Dimension::FREQUENCY);
        self.register_base("Gy", "gray", Dimension::DOSE);
        self.register_base("Sv", "sievert", Dimension::DOSE);
        self.register_base("kat", "katal", Dimension::CATALYTIC_ACTIVITY);
    }

    fn register_accepted_units(&mut self) {
        let kilogram = self.lookup("kg");
        let second = self.lookup("s");
        let metre = self.lookup("m");
        let kelvin = self.lookup("K");

        // Mass
        self.register("g", kilogram.transform(UnitConverter::fraction(1, 1000)));

        // Time
        self.register("min", second.transform(UnitConverter::integer(60)));
        self.register("h", second.transform(UnitConverter::integer(3600)));
        self.register("d", second.transform(UnitConverter::integer(86400)));

        // Volume
        if let Some(cubic_metre) = metre.pow(3) {
            let litre = cubic_metre.transform(UnitConverter::fraction(1, 1000));
            self.register("L", litre.clone());
            self.register("l", litre);
        }

        // Temperature
        self.register("°C", kelvin.shift(273.15));

        // Ratio
        self.register("%", Unit::One.transform(UnitConverter::fraction(1, 100)));
    }

    fn register_prefixes(&mut self) {
        const POSITIVE: [(&str, &str, u32); 12] = [
            ("Q", "quetta", 30),
            ("R", "ronna", 27),
            ("Y", "yotta", 24),
            ("Z", "zetta", 21),
            ("E", "exa", 18),
            ("P", "peta", 15),
            ("T", "tera", 12),
            ("G", "giga", 9),
            ("M", "mega", 6),
            ("k", "kilo", 3),
            ("h", "hecto", 2),
            ("da", "deca", 1),
        ];
        const NEGATIVE: [(&str, &str, u32); 12] = [
            ("d", "deci", 1),
            ("c", "centi", 2),
            ("m", "milli", 3),
            ("µ", "micro", 6),
            ("n", "nano", 9),
            ("p", "pico", 12),
            ("f", "femto", 15),
            ("a", "atto", 18),
            ("z", "zepto", 21),
            ("y", "yocto", 24),
            ("r", "ronto", 27),
            ("q", "quecto", 30),
        ];

        for (symbol, name, exp) in POSITIVE {
            self.register_prefix(Prefix::new(symbol, name, UnitConverter::power_of_ten(exp, false)));
        }
        for (symbol, name, exp) in NEGATIVE {
            self.register_prefix(Prefix::new(symbol, name, UnitConverter::power_of_ten(exp, true)));
        }

        // Greek mu and ASCII stand-ins for the micro sign
        let micro = UnitConverter::power_of_ten(6, true);
        self.register_prefix(Prefix::new("μ", "micro", micro.clone()));
        self.register_prefix(Prefix::new("u", "micro", micro));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_units_present() {
        for symbol in ["m", "kg", "s", "A", "K", "mol", "cd"] {
            assert!(SYMBOLS.unit(symbol).is_some(), "missing {}", symbol);
        }
    }

    #[test]
    fn test_derived_dimensions() {
        assert_eq!(SYMBOLS.unit("N").and_then(|u| u.dimension()), Some(Dimension::FORCE));
        assert_eq!(SYMBOLS.unit("L").and_then(|u| u.dimension()), Some(Dimension::VOLUME));
        assert_eq!(SYMBOLS.unit("°C").and_then(|u| u.dimension()), Some(Dimension::TEMPERATURE));
    }

    #[test]
    fn test_gram_is_thousandth_of_kilogram() {
        let gram = SYMBOLS.unit("g").unwrap();
        let c = gram.system_converter().unwrap();
        assert_eq!(c.factor(), Some(0.001));
    }

    #[test]
    fn test_prefixes() {
        assert_eq!(SYMBOLS.prefix("k").unwrap().converter(), &UnitConverter::integer(1000));
        assert_eq!(SYMBOLS.prefix("da").unwrap().converter(), &UnitConverter::integer(10));
        assert_eq!(SYMBOLS.prefix("u").unwrap().converter(), SYMBOLS.prefix("µ").unwrap().converter());
        // the micro sign wins reverse lookups
        let micro = SYMBOLS.prefix_for(&UnitConverter::power_of_ten(6, true)).unwrap();
        assert_eq!(micro.symbol(), "µ");
    }

    #[test]
    fn test_litre_renders_as_upper_case() {
        let litre = SYMBOLS.unit("l").unwrap();
        assert_eq!(SYMBOLS.label_of(&litre), Some("L".to_string()));
    }
}
