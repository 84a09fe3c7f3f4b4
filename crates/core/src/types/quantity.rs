//! Cart line quantity.

use core::fmt;

use serde::{Deserialize, Serialize};

/// Errors that can occur when building a [`Quantity`].
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityError {
    /// Zero or negative.
    #[error("quantity must be at least 1")]
    NotPositive,
}

/// A strictly positive item count.
///
/// Defaults to 1, which is what an add-to-cart request without an explicit
/// quantity means.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct Quantity(i32);

impl Quantity {
    /// A single unit.
    pub const ONE: Self = Self(1);

    /// Validate a raw count.
    ///
    /// # Errors
    ///
    /// Returns `QuantityError::NotPositive` for values below 1.
    pub const fn new(value: i32) -> Result<Self, QuantityError> {
        if value < 1 {
            return Err(QuantityError::NotPositive);
        }
        Ok(Self(value))
    }

    /// Get the underlying i32 value.
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl Default for Quantity {
    fn default() -> Self {
        Self::ONE
    }
}

impl TryFrom<i32> for Quantity {
    type Error = QuantityError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Quantity> for i32 {
    fn from(quantity: Quantity) -> Self {
        quantity.0
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds() {
        assert_eq!(Quantity::new(1).unwrap().get(), 1);
        assert_eq!(Quantity::new(0), Err(QuantityError::NotPositive));
        assert_eq!(Quantity::new(-3), Err(QuantityError::NotPositive));
        assert_eq!(Quantity::default(), Quantity::ONE);
    }

    #[test]
    fn test_deserialize_validates() {
        let q: Quantity = serde_json::from_str("4").unwrap();
        assert_eq!(q.get(), 4);
        assert!(serde_json::from_str::<Quantity>("0").is_err());
    }
}
