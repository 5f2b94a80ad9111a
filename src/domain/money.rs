//! Minor-unit amounts.
//!
//! Financial values are carried as integer hundredths so that nothing in the
//! pipeline touches floating point. Upstream decimal strings are scaled by 100
//! and rounded half away from zero.

use std::fmt;
use std::str::FromStr;

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::error::RecordError;

/// Scale factor between a major unit and its minor units.
pub const MINOR_UNITS_PER_MAJOR: u32 = 100;

/// A non-negative amount in minor units (hundredths).
///
/// Serialized as a decimal string (`"5000"`), deserialized from a string or
/// an integer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MinorUnits(u64);

impl MinorUnits {
    /// Zero.
    pub const ZERO: Self = Self(0);

    /// Wrap a raw minor-unit count.
    #[must_use]
    pub const fn new(units: u64) -> Self {
        Self(units)
    }

    /// The raw minor-unit count.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Scale a major-unit decimal to minor units.
    ///
    /// Rounds half away from zero at the cent boundary, so `12.345` becomes
    /// `1235`. Negative values are rejected.
    pub fn from_major(value: Decimal) -> Result<Self, RecordError> {
        if value.is_zero() {
            return Ok(Self::ZERO);
        }
        if value.is_sign_negative() {
            return Err(RecordError::NegativeAmount {
                value: value.to_string(),
            });
        }

        let scaled = value
            .checked_mul(Decimal::from(MINOR_UNITS_PER_MAJOR))
            .ok_or_else(|| RecordError::InvalidAmount {
                value: value.to_string(),
                reason: "overflow while scaling".into(),
            })?
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);

        scaled
            .to_u64()
            .map(Self)
            .ok_or_else(|| RecordError::InvalidAmount {
                value: value.to_string(),
                reason: "out of range".into(),
            })
    }

    /// Parse a major-unit decimal string and scale it to minor units.
    pub fn parse_major(raw: &str) -> Result<Self, RecordError> {
        Self::from_major(parse_decimal(raw)?)
    }
}

/// Parse an upstream decimal string, tolerating surrounding whitespace.
pub fn parse_decimal(raw: &str) -> Result<Decimal, RecordError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(RecordError::InvalidAmount {
            value: raw.to_string(),
            reason: "empty".into(),
        });
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|e| RecordError::InvalidAmount {
            value: raw.to_string(),
            reason: e.to_string(),
        })
}

impl fmt::Display for MinorUnits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for MinorUnits {
    fn from(units: u64) -> Self {
        Self(units)
    }
}

impl FromStr for MinorUnits {
    type Err = RecordError;

    /// Parse an integer minor-unit string such as `"5000"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.starts_with('-') {
            return Err(RecordError::NegativeAmount {
                value: s.to_string(),
            });
        }
        trimmed
            .parse::<u64>()
            .map(Self)
            .map_err(|e| RecordError::InvalidAmount {
                value: s.to_string(),
                reason: e.to_string(),
            })
    }
}

impl Serialize for MinorUnits {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for MinorUnits {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct MinorUnitsVisitor;

        impl Visitor<'_> for MinorUnitsVisitor {
            type Value = MinorUnits;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a non-negative integer or integer string")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                Ok(MinorUnits(v))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                u64::try_from(v)
                    .map(MinorUnits)
                    .map_err(|_| E::custom(format!("amount must not be negative, got {v}")))
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(MinorUnitsVisitor)
    }
}
