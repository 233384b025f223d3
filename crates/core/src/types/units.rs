//! Units-per-box quantity type.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when parsing a [`UnitsPerBox`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum UnitsPerBoxError {
    /// The input is not an integer.
    #[error("units per box must be a valid whole number")]
    NotANumber,
    /// The value is zero or negative.
    #[error("units per box must be greater than zero")]
    NotPositive,
}

/// Number of units packed in one box. Always greater than zero.
///
/// ## Examples
///
/// ```
/// use pantry_core::UnitsPerBox;
///
/// assert_eq!(UnitsPerBox::parse("12").unwrap().get(), 12);
/// assert!(UnitsPerBox::parse("0").is_err());
/// assert!(UnitsPerBox::parse("abc").is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub struct UnitsPerBox(i64);

impl UnitsPerBox {
    /// Parse a `UnitsPerBox` from user input.
    ///
    /// # Errors
    ///
    /// Returns `UnitsPerBoxError::NotANumber` if the input is not an integer
    /// and `UnitsPerBoxError::NotPositive` if it is zero or negative.
    pub fn parse(s: &str) -> Result<Self, UnitsPerBoxError> {
        let value = s
            .trim()
            .parse::<i64>()
            .map_err(|_| UnitsPerBoxError::NotANumber)?;
        Self::new(value)
    }

    /// Build a `UnitsPerBox` from an integer.
    ///
    /// # Errors
    ///
    /// Returns `UnitsPerBoxError::NotPositive` if `value <= 0`.
    pub const fn new(value: i64) -> Result<Self, UnitsPerBoxError> {
        if value <= 0 {
            return Err(UnitsPerBoxError::NotPositive);
        }
        Ok(Self(value))
    }

    /// Returns the quantity.
    #[must_use]
    pub const fn get(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for UnitsPerBox {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<i64> for UnitsPerBox {
    type Error = UnitsPerBoxError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<UnitsPerBox> for i64 {
    fn from(units: UnitsPerBox) -> Self {
        units.0
    }
}

// SQLx support (with sqlite feature)
#[cfg(feature = "sqlite")]
impl sqlx::Type<sqlx::Sqlite> for UnitsPerBox {
    fn type_info() -> <sqlx::Sqlite as sqlx::Database>::TypeInfo {
        <i64 as sqlx::Type<sqlx::Sqlite>>::type_info()
    }

    fn compatible(ty: &<sqlx::Sqlite as sqlx::Database>::TypeInfo) -> bool {
        <i64 as sqlx::Type<sqlx::Sqlite>>::compatible(ty)
    }
}

#[cfg(feature = "sqlite")]
impl<'r> sqlx::Decode<'r, sqlx::Sqlite> for UnitsPerBox {
    fn decode(
        value: <sqlx::Sqlite as sqlx::Database>::ValueRef<'r>,
    ) -> Result<Self, sqlx::error::BoxDynError> {
        let raw = <i64 as sqlx::Decode<sqlx::Sqlite>>::decode(value)?;
        Ok(Self::new(raw)?)
    }
}

#[cfg(feature = "sqlite")]
impl<'q> sqlx::Encode<'q, sqlx::Sqlite> for UnitsPerBox {
    fn encode_by_ref(
        &self,
        buf: &mut <sqlx::Sqlite as sqlx::Database>::ArgumentBuffer<'q>,
    ) -> Result<sqlx::encode::IsNull, sqlx::error::BoxDynError> {
        <i64 as sqlx::Encode<'q, sqlx::Sqlite>>::encode_by_ref(&self.0, buf)
    }
}
