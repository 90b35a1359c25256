use bigdecimal::BigDecimal;

use crate::{error::Error, helpers::math};

/// Splits a `<amount><denom>` string such as `20uusd` or `1.25ukrw`.
pub fn split_denom_and_amount(
    value: &str,
) -> Result<(BigDecimal, String), Error> {
    let value = value.trim();
    let index = value
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .ok_or_else(|| Error::InvalidCoin(value.to_owned()))?;
    let (amount, denom) = value.split_at(index);

    if amount.is_empty() || denom.is_empty() {
        return Err(Error::InvalidCoin(value.to_owned()));
    }

    let amount =
        math::parse(amount).map_err(|_| Error::InvalidCoin(value.to_owned()))?;

    Ok((amount, denom.to_owned()))
}

pub fn join_denom_and_amount(amount: &BigDecimal, denom: &str) -> String {
    format!("{}{}", math::format(amount), denom)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_integer_coin() {
        let (amount, denom) = split_denom_and_amount("20uusd").unwrap();
        assert_eq!(math::format(&amount), "20");
        assert_eq!(denom, "uusd");
    }

    #[test]
    fn test_split_decimal_coin() {
        let (amount, denom) =
            split_denom_and_amount("1.250000000000000000ukrw").unwrap();
        assert_eq!(math::format(&amount), "1.25");
        assert_eq!(denom, "ukrw");
    }

    #[test]
    fn test_split_ibc_denom() {
        let (amount, denom) = split_denom_and_amount(
            "7ibc/27394FB092D2ECCD56123C74F36E4C1F926001CEADA9CA97EA622B25F41E5EB2",
        )
        .unwrap();
        assert_eq!(math::format(&amount), "7");
        assert!(denom.starts_with("ibc/"));
    }

    #[test]
    fn test_split_rejects_malformed() {
        assert!(split_denom_and_amount("uusd").is_err());
        assert!(split_denom_and_amount("100").is_err());
        assert!(split_denom_and_amount("").is_err());
        assert!(split_denom_and_amount("1.2.3uusd").is_err());
    }

    #[test]
    fn test_join() {
        let amount = math::parse("20.0").unwrap();
        assert_eq!(join_denom_and_amount(&amount, "uusd"), "20uusd");
    }
}
