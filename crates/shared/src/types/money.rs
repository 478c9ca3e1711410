//! Money amount type with two-digit decimal precision.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! This type wraps `rust_decimal::Decimal` for exact arithmetic.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Number of fractional digits carried by every stored amount.
pub const MONEY_SCALE: u32 = 2;

/// Reasons a decimal cannot be used as a movement amount.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AmountError {
    /// Zero or negative.
    #[error("amount must be positive, got {0}")]
    NotPositive(Decimal),

    /// More than two fractional digits.
    #[error("amount {0} has more than {MONEY_SCALE} decimal places")]
    TooPrecise(Decimal),
}

/// A strictly positive monetary amount with at most two decimal places.
///
/// The smallest representable amount is `0.01`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    /// Validates and wraps a decimal.
    ///
    /// # Errors
    ///
    /// Returns `AmountError` if the value is not positive or carries
    /// sub-cent precision.
    pub fn new(value: Decimal) -> Result<Self, AmountError> {
        if value <= Decimal::ZERO {
            return Err(AmountError::NotPositive(value));
        }
        let normalized = value.normalize();
        if normalized.scale() > MONEY_SCALE {
            return Err(AmountError::TooPrecise(value));
        }
        let mut scaled = normalized;
        scaled.rescale(MONEY_SCALE);
        Ok(Self(scaled))
    }

    /// Returns the inner decimal, always carrying two fractional digits.
    #[must_use]
    pub const fn value(self) -> Decimal {
        self.0
    }

    /// Returns the amount as a negative decimal (sender side of a transfer).
    #[must_use]
    pub fn negated(self) -> Decimal {
        -self.0
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = AmountError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl std::fmt::Display for Amount {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(dec!(0.01))]
    #[case(dec!(1))]
    #[case(dec!(25.5))]
    #[case(dec!(1000.00))]
    #[case(dec!(12.3400))]
    fn test_accepts_valid_amounts(#[case] value: Decimal) {
        let amount = Amount::new(value).unwrap();
        assert_eq!(amount.value(), value);
        assert_eq!(amount.value().scale(), MONEY_SCALE);
    }

    #[rstest]
    #[case(dec!(0))]
    #[case(dec!(-0.01))]
    #[case(dec!(-100))]
    fn test_rejects_non_positive(#[case] value: Decimal) {
        assert_eq!(Amount::new(value), Err(AmountError::NotPositive(value)));
    }

    #[rstest]
    #[case(dec!(0.001))]
    #[case(dec!(10.005))]
    fn test_rejects_sub_cent_precision(#[case] value: Decimal) {
        assert_eq!(Amount::new(value), Err(AmountError::TooPrecise(value)));
    }

    #[test]
    fn test_negated() {
        let amount = Amount::new(dec!(30)).unwrap();
        assert_eq!(amount.negated(), dec!(-30.00));
    }

    #[test]
    fn test_display_keeps_two_digits() {
        assert_eq!(Amount::new(dec!(5)).unwrap().to_string(), "5.00");
    }

    #[test]
    fn test_deserialize_validates() {
        let ok: Amount = serde_json::from_str("\"10.50\"").unwrap();
        assert_eq!(ok.value(), dec!(10.50));

        assert!(serde_json::from_str::<Amount>("\"0\"").is_err());
        assert!(serde_json::from_str::<Amount>("\"1.234\"").is_err());
    }
}
