//! Prices

use rust_decimal::{
    Decimal, RoundingStrategy,
    prelude::{FromPrimitive, ToPrimitive},
};
use rusty_money::{
    Money,
    iso::{self, Currency},
};
use serde::Serializer;
use thiserror::Error;

/// Currency used when none is configured; the stores priced are Canadian.
pub const DEFAULT_CURRENCY: &str = "CAD";

/// Errors raised while converting catalog prices into money.
#[derive(Debug, Error, PartialEq)]
pub enum PriceError {
    /// Price is NaN or infinite.
    #[error("price is not a finite number: {0}")]
    NotFinite(f64),

    /// Price is below zero.
    #[error("price must not be negative: {0}")]
    Negative(f64),

    /// Price cannot be represented in minor units.
    #[error("price is out of range: {0}")]
    OutOfRange(f64),

    /// Unknown ISO-4217 currency code.
    #[error("unknown currency code: {0}")]
    UnknownCurrency(String),
}

/// Look up an ISO-4217 currency by its alpha code (case-insensitive).
///
/// # Errors
///
/// Returns [`PriceError::UnknownCurrency`] if the code is not recognised.
pub fn currency_from_code(code: &str) -> Result<&'static Currency, PriceError> {
    iso::find(&code.trim().to_ascii_uppercase())
        .ok_or_else(|| PriceError::UnknownCurrency(code.to_string()))
}

/// Parse a catalog price given in major units (e.g. `1.99`) into money.
///
/// The amount is scaled by the currency's exponent and rounded
/// half-away-from-zero to whole minor units, so `1000.0` yen and `1.5` dinar
/// come out as 1000 and 1500 minor units.
///
/// # Errors
///
/// - [`PriceError::NotFinite`]: the value is NaN or infinite.
/// - [`PriceError::Negative`]: the value is below zero.
/// - [`PriceError::OutOfRange`]: the value does not fit in minor units.
pub fn parse_price(
    value: f64,
    currency: &'static Currency,
) -> Result<Money<'static, Currency>, PriceError> {
    if !value.is_finite() {
        return Err(PriceError::NotFinite(value));
    }

    if value < 0.0 {
        return Err(PriceError::Negative(value));
    }

    let scale = 10_i64
        .checked_pow(currency.exponent)
        .map(Decimal::from)
        .ok_or(PriceError::OutOfRange(value))?;

    let minor_units = Decimal::from_f64(value)
        .and_then(|amount| amount.checked_mul(scale))
        .and_then(|amount| {
            amount
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                .to_i64()
        })
        .ok_or(PriceError::OutOfRange(value))?;

    Ok(Money::from_minor(minor_units, currency))
}

/// Serialize money as a plain JSON number in major units.
///
/// # Errors
///
/// Returns the serializer's error if the number cannot be written.
pub fn serialize_money<S>(money: &Money<'_, Currency>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_f64(money.amount().to_f64().unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use rusty_money::iso::{BHD, CAD, GBP, JPY};
    use testresult::TestResult;

    use super::*;

    #[test]
    fn parse_price_rounds_to_minor_units() -> TestResult {
        assert_eq!(parse_price(1.99, CAD)?, Money::from_minor(199, CAD));
        assert_eq!(parse_price(3.999, CAD)?.to_minor_units(), 400);
        assert_eq!(parse_price(0.0, CAD)?, Money::from_minor(0, CAD));

        Ok(())
    }

    #[test]
    fn parse_price_follows_the_currency_exponent() -> TestResult {
        assert_eq!(parse_price(1000.0, JPY)?, Money::from_major(1000, JPY));
        assert_eq!(parse_price(99.5, JPY)?.to_minor_units(), 100);
        assert_eq!(parse_price(1.5, BHD)?.to_minor_units(), 1500);

        Ok(())
    }

    #[test]
    fn parse_price_rejects_negative_values() {
        assert_eq!(parse_price(-0.5, CAD), Err(PriceError::Negative(-0.5)));
    }

    #[test]
    fn parse_price_rejects_non_finite_values() {
        assert!(matches!(
            parse_price(f64::NAN, CAD),
            Err(PriceError::NotFinite(_))
        ));
        assert!(matches!(
            parse_price(f64::INFINITY, CAD),
            Err(PriceError::NotFinite(_))
        ));
    }

    #[test]
    fn parse_price_rejects_values_beyond_minor_units() {
        assert!(matches!(
            parse_price(1e300, CAD),
            Err(PriceError::OutOfRange(_))
        ));
    }

    #[test]
    fn currency_lookup_is_case_insensitive() -> TestResult {
        assert_eq!(currency_from_code("gbp")?, GBP);
        assert_eq!(currency_from_code(DEFAULT_CURRENCY)?, CAD);

        Ok(())
    }

    #[test]
    fn currency_lookup_rejects_unknown_codes() {
        assert_eq!(
            currency_from_code("XYZ"),
            Err(PriceError::UnknownCurrency("XYZ".to_string()))
        );
    }

    #[test]
    fn serialize_money_writes_major_units() -> TestResult {
        let mut out = Vec::new();
        let mut serializer = serde_json::Serializer::new(&mut out);

        serialize_money(&Money::from_minor(350, CAD), &mut serializer)?;

        assert_eq!(String::from_utf8(out)?, "3.5");

        Ok(())
    }
}
