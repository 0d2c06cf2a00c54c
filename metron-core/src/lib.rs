//! Metron Core - Fundamental types
//!
//! This crate provides the value type carried by quantities:
//! - `Number`: integral (`i64`) or floating (`f64`) tagged value
//! - `NumberError`: failures when reading a numeric literal

mod number;

pub use number::{Number, NumberError};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{Number, NumberError};
}

#[cfg(test)]
mod tests {
    use super::*;

    mod number_tests {
        use super::*;

        #[test]
        fn test_from_primitives() {
            assert!(Number::from(42i64).is_integer());
            assert!(!Number::from(4.2).is_integer());
        }

        #[test]
        fn test_from_str_integer() {
            let n = Number::from_str("123").unwrap();
            assert_eq!(n, Number::Integer(123));
            assert!(n.is_integer());

            let n = Number::from_str("-7").unwrap();
            assert_eq!(n, Number::Integer(-7));
        }

        #[test]
        fn test_from_str_decimal() {
            let n = Number::from_str("3.14").unwrap();
            assert!(!n.is_integer());
            assert_eq!(n.to_f64(), 3.14);
        }

        #[test]
        fn test_from_str_scientific() {
            let n = Number::from_str("1.5e2").unwrap();
            assert!(!n.is_integer());
            assert_eq!(n, Number::Integer(150));
        }

        #[test]
        fn test_from_str_integer_overflow_becomes_float() {
            let n = Number::from_str("100000000000000000000").unwrap();
            assert!(!n.is_integer());
            assert_eq!(n.to_f64(), 1e20);
        }

        #[test]
        fn test_float_from_str_keeps_float_tag() {
            let n = Number::float_from_str("5").unwrap();
            assert!(!n.is_integer());
            assert_eq!(n, Number::Integer(5));
        }

        #[test]
        fn test_from_str_rejects_garbage() {
            assert!(matches!(Number::from_str(""), Err(NumberError::ParseError(_))));
            assert!(matches!(Number::from_str("abc"), Err(NumberError::ParseError(_))));
            assert!(matches!(Number::from_str("1.2.3"), Err(NumberError::ParseError(_))));
        }

        #[test]
        fn test_from_str_rejects_non_finite() {
            assert!(matches!(Number::from_str("inf"), Err(NumberError::NonFinite(_))));
            assert!(matches!(Number::from_str("NaN"), Err(NumberError::NonFinite(_))));
            assert!(matches!(Number::from_str("1e400"), Err(NumberError::NonFinite(_))));
        }

        #[test]
        fn test_mixed_equality() {
            assert_eq!(Number::Integer(5), Number::Float(5.0));
            assert_ne!(Number::Integer(5), Number::Float(5.5));
        }

        #[test]
        fn test_as_decimal() {
            assert_eq!(Number::Integer(42).as_decimal(3), "42");
            assert_eq!(Number::Float(5.0).as_decimal(3), "5");
            assert_eq!(Number::Float(1.5).as_decimal(3), "1.5");
            assert_eq!(Number::Float(3.14159).as_decimal(3), "3.142");
            assert_eq!(Number::Float(-0.0001).as_decimal(3), "0");
            assert_eq!(Number::Float(0.12345).as_decimal(6), "0.12345");
        }

        #[test]
        fn test_display_keeps_tag() {
            assert_eq!(Number::Integer(5).to_string(), "5");
            assert_eq!(Number::Float(5.0).to_string(), "5.0");
            assert_eq!(Number::Float(0.25).to_string(), "0.25");
        }

        #[test]
        fn test_serde_untagged() {
            let json = serde_json::to_string(&Number::Integer(7)).unwrap();
            assert_eq!(json, "7");
            let json = serde_json::to_string(&Number::Float(2.5)).unwrap();
            assert_eq!(json, "2.5");

            let back: Number = serde_json::from_str("7").unwrap();
            assert!(back.is_integer());
            let back: Number = serde_json::from_str("2.5").unwrap();
            assert!(!back.is_integer());
        }
    }
}
