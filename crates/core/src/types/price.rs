//! Type-safe price representation using decimal arithmetic.
//!
//! Prices are stored in a `DECIMAL(10,2)` column, so a [`Price`] always
//! carries exactly two decimal places and never exceeds
//! [`Price::MAX`]. Parsing rounds extra fractional digits half-to-even.
//!
//! In JSON a price is a plain number (`25.9`), matching what API clients
//! already consume; the fixed scale only shows in [`Price`]'s `Display`.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input is not a decimal number.
    #[error("price must be a valid number")]
    NotANumber,
    /// The amount is below zero.
    #[error("price cannot be negative")]
    Negative,
    /// The amount does not fit the storage column.
    #[error("price must be at most {max}")]
    TooLarge {
        /// Largest storable price.
        max: Decimal,
    },
}

/// A non-negative price with two decimal places.
///
/// ## Examples
///
/// ```
/// use pantry_core::Price;
///
/// assert_eq!(Price::parse("19.99").unwrap().to_string(), "19.99");
/// assert_eq!(Price::parse("0").unwrap().to_string(), "0.00");
/// assert!(Price::parse("-1").is_err());
/// assert!(Price::parse("abc").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Price(#[serde(with = "rust_decimal::serde::float")] Decimal);

impl Price {
    /// Number of fractional digits kept.
    pub const SCALE: u32 = 2;

    /// Largest storable price (`DECIMAL(10,2)`).
    pub const MAX: Decimal = Decimal::from_parts(1_410_065_407, 2, 0, false, 2);

    /// Parse a `Price` from user input.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::NotANumber` if the input is not a decimal number,
    /// `PriceError::Negative` if it is below zero, and
    /// `PriceError::TooLarge` if it exceeds [`Self::MAX`].
    pub fn parse(s: &str) -> Result<Self, PriceError> {
        let amount = Decimal::from_str(s.trim()).map_err(|_| PriceError::NotANumber)?;
        Self::from_decimal(amount)
    }

    /// Build a `Price` from a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Negative` or `PriceError::TooLarge` when the
    /// amount is out of range.
    pub fn from_decimal(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }

        let mut rounded = amount.round_dp(Self::SCALE);
        if rounded > Self::MAX {
            return Err(PriceError::TooLarge { max: Self::MAX });
        }
        rounded.rescale(Self::SCALE);
        // "-0" parses as a negative zero; normalise it.
        rounded.set_sign_positive(true);

        Ok(Self(rounded))
    }

    /// Returns the amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }
}

impl core::fmt::Display for Price {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// SQLx support (with sqlite feature)
//
// SQLite has no decimal type; a DECIMAL(10,2) column has NUMERIC affinity and
// stores prices as REAL. Two decimal places below 10^8 survive the f64 trip,
// and decoding rounds back to the fixed scale.
#[cfg(feature = "sqlite")]
impl sqlx::Type<sqlx::Sqlite> for Price {
    fn type_info() -> <sqlx::Sqlite as sqlx::Database>::TypeInfo {
        <f64 as sqlx::Type<sqlx::Sqlite>>::type_info()
    }

    fn compatible(ty: &<sqlx::Sqlite as sqlx::Database>::TypeInfo) -> bool {
        <f64 as sqlx::Type<sqlx::Sqlite>>::compatible(ty)
            || <i64 as sqlx::Type<sqlx::Sqlite>>::compatible(ty)
    }
}

#[cfg(feature = "sqlite")]
impl<'r> sqlx::Decode<'r, sqlx::Sqlite> for Price {
    fn decode(
        value: <sqlx::Sqlite as sqlx::Database>::ValueRef<'r>,
    ) -> Result<Self, sqlx::error::BoxDynError> {
        use rust_decimal::prelude::FromPrimitive;

        let raw = <f64 as sqlx::Decode<sqlx::Sqlite>>::decode(value)?;
        let amount = Decimal::from_f64(raw).ok_or("price is not a finite number")?;
        Ok(Self::from_decimal(amount)?)
    }
}

#[cfg(feature = "sqlite")]
impl<'q> sqlx::Encode<'q, sqlx::Sqlite> for Price {
    fn encode_by_ref(
        &self,
        buf: &mut <sqlx::Sqlite as sqlx::Database>::ArgumentBuffer<'q>,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        use rust_decimal::prelude::ToPrimitive;

        let raw = self.0.to_f64().ok_or("price does not fit in f64")?;
        <f64 as sqlx::Encode<'q, sqlx::Sqlite>>::encode(raw, buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_accepts_zero_and_decimals() {
        assert_eq!(Price::parse("0").unwrap().to_string(), "0.00");
        assert_eq!(Price::parse("19.99").unwrap().to_string(), "19.99");
        assert_eq!(Price::parse("12.5").unwrap().to_string(), "12.50");
        assert_eq!(Price::parse(" 8.90 ").unwrap().to_string(), "8.90");
    }

    #[test]
    fn test_parse_rejects_negative() {
        assert_eq!(Price::parse("-1"), Err(PriceError::Negative));
        assert_eq!(Price::parse("-0.01"), Err(PriceError::Negative));
    }

    #[test]
    fn test_parse_negative_zero_is_zero() {
        let price = Price::parse("-0").unwrap();
        assert_eq!(price, Price::parse("0").unwrap());
        assert!(!price.amount().is_sign_negative());
    }

    #[test]
    fn test_parse_rejects_non_numbers() {
        assert_eq!(Price::parse("abc"), Err(PriceError::NotANumber));
        assert_eq!(Price::parse("12,50"), Err(PriceError::NotANumber));
        assert_eq!(Price::parse(""), Err(PriceError::NotANumber));
    }

    #[test]
    fn test_parse_rounds_to_two_places() {
        assert_eq!(Price::parse("1.005").unwrap().to_string(), "1.00");
        assert_eq!(Price::parse("1.015").unwrap().to_string(), "1.02");
    }

    #[test]
    fn test_max_is_column_limit() {
        assert_eq!(Price::MAX.to_string(), "99999999.99");
        assert!(Price::parse("99999999.99").is_ok());
        assert!(matches!(
            Price::parse("100000000"),
            Err(PriceError::TooLarge { .. })
        ));
    }

    #[test]
    fn test_serializes_as_number() {
        let price = Price::parse("25.90").unwrap();
        assert_eq!(serde_json::to_string(&price).unwrap(), "25.9");
        assert_eq!(serde_json::to_value(Price::parse("0").unwrap()).unwrap(), 0.0);
    }

    #[test]
    fn test_deserializes_from_number() {
        let price: Price = serde_json::from_str("12.5").unwrap();
        assert_eq!(price, Price::parse("12.50").unwrap());
    }
}
