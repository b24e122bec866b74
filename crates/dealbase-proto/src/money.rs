//! Fixed-point monetary amounts.

use std::fmt;

use rkyv::{Archive, Deserialize, Serialize};
use serde::de::Error as _;
use serde::{Deserialize as SerdeDeserialize, Serialize as SerdeSerialize};

/// Largest representable amount in minor units. Matches a numeric(15,2)
/// column: 13 integer digits plus 2 fractional digits.
const MAX_MINOR_UNITS: i64 = 10_i64.pow(15) - 1;

/// A monetary amount with exactly two decimal places, stored as minor units
/// (cents) in an `i64`.
///
/// Amounts cross the JSON boundary as plain numbers; the two-decimal scale
/// means every valid amount converts to and from `f64` without drift.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Archive, Serialize, Deserialize,
)]
pub struct Money(i64);

impl Money {
    /// Create an amount from minor units (cents).
    pub const fn from_minor_units(minor: i64) -> Self {
        Self(minor)
    }

    /// Get the amount in minor units (cents).
    pub const fn minor_units(&self) -> i64 {
        self.0
    }

    /// Parse an amount from a floating-point value.
    ///
    /// Fails if the value is not finite, carries more than two decimal
    /// places, or overflows the supported range.
    pub fn try_from_f64(value: f64) -> Result<Self, MoneyError> {
        if !value.is_finite() {
            return Err(MoneyError::NotFinite);
        }

        let scaled = value * 100.0;
        let rounded = scaled.round();
        if (scaled - rounded).abs() > 1e-6 {
            return Err(MoneyError::TooPrecise);
        }
        if rounded.abs() > MAX_MINOR_UNITS as f64 {
            return Err(MoneyError::OutOfRange);
        }

        Ok(Self(rounded as i64))
    }

    /// The amount as a floating-point value.
    pub fn to_f64(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Whether the amount is strictly greater than zero.
    pub fn is_positive(&self) -> bool {
        self.0 > 0
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}

/// Errors from parsing a monetary amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MoneyError {
    /// The value was NaN or infinite.
    #[error("amount must be a finite number")]
    NotFinite,

    /// The value carried more than two decimal places.
    #[error("amount must have at most two decimal places")]
    TooPrecise,

    /// The value does not fit the supported range.
    #[error("amount out of range")]
    OutOfRange,
}

impl SerdeSerialize for Money {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_f64(self.to_f64())
    }
}

impl<'de> SerdeDeserialize<'de> for Money {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let value = f64::deserialize(deserializer)?;
        Money::try_from_f64(value).map_err(D::Error::custom)
    }
}
