//! Exact decimal arithmetic for chain amounts.
//!
//! Amounts arrive as base-unit decimal strings and routinely exceed what an
//! `f64` can carry, so every operation goes through [`BigDecimal`].

use std::str::FromStr;

use bigdecimal::{BigDecimal, Zero};

use crate::error::Error;

pub fn parse(value: &str) -> Result<BigDecimal, Error> {
    let value = BigDecimal::from_str(value.trim())?;
    Ok(value)
}

/// Renders an amount without exponent notation or trailing fractional zeros.
pub fn format(value: &BigDecimal) -> String {
    if value.is_integer() {
        return value.with_scale(0).to_string();
    }

    value.normalized().to_string()
}

pub fn plus(a: &BigDecimal, b: &BigDecimal) -> BigDecimal {
    a + b
}

pub fn minus(a: &BigDecimal, b: &BigDecimal) -> BigDecimal {
    a - b
}

pub fn times(a: &BigDecimal, b: &BigDecimal) -> BigDecimal {
    a * b
}

pub fn div(a: &BigDecimal, b: &BigDecimal) -> Result<BigDecimal, Error> {
    if b.is_zero() {
        return Err(Error::Arithmetic(format!(
            "division by zero: {} / {}",
            format(a),
            format(b)
        )));
    }

    Ok(a / b)
}

pub fn min(a: &BigDecimal, b: &BigDecimal) -> BigDecimal {
    if a <= b {
        a.clone()
    } else {
        b.clone()
    }
}

/// Drops the fractional part, rounding toward zero.
pub fn integer_portion(value: &BigDecimal) -> BigDecimal {
    value.with_scale(0)
}

pub fn floor_at_zero(value: BigDecimal) -> BigDecimal {
    if value < BigDecimal::zero() {
        BigDecimal::zero()
    } else {
        value
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(value: &str) -> BigDecimal {
        parse(value).unwrap()
    }

    #[test]
    fn test_format_strips_scale() {
        assert_eq!(format(&d("980")), "980");
        assert_eq!(format(&d("20.000")), "20");
        assert_eq!(format(&d("0.0020")), "0.002");
        assert_eq!(format(&d("0")), "0");
    }

    #[test]
    fn test_amounts_beyond_f64_precision() {
        let a = d("123456789012345678901234567890");
        let b = d("1");
        assert_eq!(format(&plus(&a, &b)), "123456789012345678901234567891");
        assert_eq!(
            format(&minus(&a, &b)),
            "123456789012345678901234567889"
        );
    }

    #[test]
    fn test_integer_portion_truncates() {
        assert_eq!(format(&integer_portion(&d("20.999"))), "20");
        assert_eq!(format(&integer_portion(&d("0.5"))), "0");
        assert_eq!(
            format(&integer_portion(&times(&d("10001"), &d("0.002")))),
            "20"
        );
    }

    #[test]
    fn test_div_by_zero_fails() {
        let err = div(&d("10"), &d("0")).unwrap_err();
        assert!(matches!(err, Error::Arithmetic(_)));
        assert_eq!(format(&div(&d("10"), &d("4")).unwrap()), "2.5");
    }

    #[test]
    fn test_min_and_floor() {
        assert_eq!(min(&d("20"), &d("1000")), d("20"));
        assert_eq!(min(&d("5000"), &d("1000")), d("1000"));
        assert_eq!(floor_at_zero(d("-20")), d("0"));
        assert_eq!(floor_at_zero(d("75")), d("75"));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse("12abc").is_err());
        assert!(parse("").is_err());
    }
}
