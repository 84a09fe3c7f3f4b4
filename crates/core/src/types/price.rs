//! Catalog price, a non-negative decimal amount.
//!
//! Amounts are kept exactly as given (`9.999` stays `9.999`); the `NUMERIC`
//! column has no fixed scale, so nothing is rounded on the way in or out.

use core::fmt;
use core::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Errors that can occur when building a [`Price`].
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The input is not a decimal number.
    #[error("price must be a number")]
    NotANumber,
    /// The amount is below zero.
    #[error("price cannot be negative")]
    Negative,
    /// The amount is above the catalog's upper bound.
    #[error("price must be less than {max}")]
    TooLarge {
        /// Exclusive upper bound.
        max: Decimal,
    },
}

/// A product price in the shop's currency.
///
/// Serializes as a plain JSON number (`9.99`) and deserializes from either a
/// number or a numeric string (`"9.99"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "Decimal")]
pub struct Price(#[serde(serialize_with = "rust_decimal::serde::float::serialize")] Decimal);

impl Price {
    /// Zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Exclusive upper bound, mirrored by the column's `CHECK` constraint.
    #[must_use]
    pub fn max() -> Decimal {
        Decimal::new(10_000_000_000, 0)
    }

    /// Validate a decimal amount.
    ///
    /// # Errors
    ///
    /// Returns `PriceError::Negative` or `PriceError::TooLarge` when the
    /// amount is out of range.
    pub fn new(amount: Decimal) -> Result<Self, PriceError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(PriceError::Negative);
        }
        if amount >= Self::max() {
            return Err(PriceError::TooLarge { max: Self::max() });
        }
        Ok(Self(amount.abs()))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Price of `quantity` units.
    #[must_use]
    pub fn times(&self, quantity: i32) -> Decimal {
        self.0 * Decimal::from(quantity)
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(amount: Decimal) -> Result<Self, Self::Error> {
        Self::new(amount)
    }
}

impl FromStr for Price {
    type Err = PriceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let amount = Decimal::from_str(s.trim()).map_err(|_| PriceError::NotANumber)?;
        Self::new(amount)
    }
}

/// At least two decimal places, more when the amount carries them.
impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.scale() <= 2 {
            write!(f, "{:.2}", self.0)
        } else {
            write!(f, "{}", self.0)
        }
    }
}
