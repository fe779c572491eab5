//! Money value object for course prices and purchase amounts.
//!
//! Amounts are stored as integer minor units (cents) to keep discount
//! arithmetic exact. The currency itself is configuration, not part of
//! the value: every amount in the system is in the one configured
//! currency, so values only carry magnitude.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::{Percentage, ValidationError};

/// A non-negative monetary amount in minor units (cents).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Zero amount.
    pub const ZERO: Self = Self(0);

    /// Creates an amount from minor units (cents), rejecting negatives.
    pub fn from_cents(cents: i64) -> Result<Self, ValidationError> {
        if cents < 0 {
            return Err(ValidationError::out_of_range(
                "amount_cents",
                0,
                i64::MAX,
                cents,
            ));
        }
        Ok(Self(cents))
    }

    /// Creates an amount from whole major units (e.g. `from_major(100)` is 100.00).
    pub fn from_major(units: i64) -> Result<Self, ValidationError> {
        Self::from_cents(units.saturating_mul(100))
    }

    /// Returns the amount in minor units.
    pub fn as_cents(&self) -> i64 {
        self.0
    }

    /// Applies a percentage discount, rounding to the nearest cent.
    ///
    /// `100.00` with a 20% discount yields `80.00`. Half-cent results
    /// round up.
    pub fn apply_discount(&self, discount: Percentage) -> Self {
        let remaining = 100 - i64::from(discount.value());
        Self((self.0 * remaining + 50) / 100)
    }

    /// Sums an iterator of amounts, saturating at `i64::MAX`.
    pub fn total(amounts: impl IntoIterator<Item = Money>) -> Self {
        Self(
            amounts
                .into_iter()
                .fold(0i64, |acc, m| acc.saturating_add(m.0)),
        )
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}
