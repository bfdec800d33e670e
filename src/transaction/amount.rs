//! Fixed-point ledger amounts.
//!
//! The ledger speaks decimal JSON numbers (`0.0001`). Inside the client
//! every amount is an integer count of 10^-8 units so change arithmetic
//! never accumulates float error.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Number of fractional digits carried by an [`Amount`].
pub const DECIMALS: u32 = 8;

/// Base units per whole coin.
pub const UNITS_PER_COIN: u64 = 10u64.pow(DECIMALS);

/// A non-negative amount in the smallest ledger unit (10^-8).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount(u64);

/// Error returned when a decimal amount cannot be represented.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid amount '{input}': {reason}")]
pub struct ParseAmountError {
    input: String,
    reason: &'static str,
}

impl ParseAmountError {
    fn new(input: impl Into<String>, reason: &'static str) -> Self {
        Self {
            input: input.into(),
            reason,
        }
    }
}

impl Amount {
    pub const ZERO: Amount = Amount(0);

    /// Creates an amount from base units.
    pub const fn from_units(units: u64) -> Self {
        Self(units)
    }

    /// Returns the amount in base units.
    pub const fn units(&self) -> u64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_add(rhs.0).map(Amount)
    }

    pub fn checked_sub(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_sub(rhs.0).map(Amount)
    }

    /// Sums amounts, returning `None` on overflow.
    pub fn checked_sum<I>(amounts: I) -> Option<Amount>
    where
        I: IntoIterator<Item = Amount>,
    {
        amounts
            .into_iter()
            .try_fold(Amount::ZERO, |acc, a| acc.checked_add(a))
    }

    /// Converts a JSON float into an amount, rounding to the nearest unit.
    pub fn from_coins_f64(value: f64) -> Result<Self, ParseAmountError> {
        if !value.is_finite() {
            return Err(ParseAmountError::new(value.to_string(), "not a finite number"));
        }
        if value < 0.0 {
            return Err(ParseAmountError::new(value.to_string(), "negative"));
        }
        let scaled = (value * UNITS_PER_COIN as f64).round();
        if scaled > u64::MAX as f64 {
            return Err(ParseAmountError::new(value.to_string(), "too large"));
        }
        Ok(Self(scaled as u64))
    }

    /// Wire representation as a JSON float.
    pub fn as_coins_f64(&self) -> f64 {
        self.0 as f64 / UNITS_PER_COIN as f64
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / UNITS_PER_COIN;
        let frac = self.0 % UNITS_PER_COIN;
        if frac == 0 {
            return write!(f, "{}", whole);
        }
        let digits = format!("{:0width$}", frac, width = DECIMALS as usize);
        write!(f, "{}.{}", whole, digits.trim_end_matches('0'))
    }
}

impl FromStr for Amount {
    type Err = ParseAmountError;

    /// Parses an exact decimal string such as `"7"`, `"0.1"` or `"2.90000000"`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Err(ParseAmountError::new(s, "empty"));
        }
        if trimmed.starts_with('-') {
            return Err(ParseAmountError::new(s, "negative"));
        }

        let (whole, frac) = match trimmed.split_once('.') {
            Some((w, f)) => (w, f),
            None => (trimmed, ""),
        };
        if whole.is_empty() && frac.is_empty() {
            return Err(ParseAmountError::new(s, "no digits"));
        }
        if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
            return Err(ParseAmountError::new(s, "not a decimal number"));
        }
        if frac.len() > DECIMALS as usize {
            return Err(ParseAmountError::new(s, "more than 8 fractional digits"));
        }

        let whole_units = if whole.is_empty() {
            0
        } else {
            whole
                .parse::<u64>()
                .ok()
                .and_then(|w| w.checked_mul(UNITS_PER_COIN))
                .ok_or_else(|| ParseAmountError::new(s, "too large"))?
        };
        let frac_units = if frac.is_empty() {
            0
        } else {
            let padded = format!("{:0<width$}", frac, width = DECIMALS as usize);
            padded
                .parse::<u64>()
                .map_err(|_| ParseAmountError::new(s, "not a decimal number"))?
        };

        whole_units
            .checked_add(frac_units)
            .map(Amount)
            .ok_or_else(|| ParseAmountError::new(s, "too large"))
    }
}

impl Serialize for Amount {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(self.as_coins_f64())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct AmountVisitor;

        impl<'de> Visitor<'de> for AmountVisitor {
            type Value = Amount;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a non-negative decimal amount")
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Amount, E> {
                v.checked_mul(UNITS_PER_COIN)
                    .map(Amount)
                    .ok_or_else(|| E::custom(ParseAmountError::new(v.to_string(), "too large")))
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Amount, E> {
                if v < 0 {
                    return Err(E::custom(ParseAmountError::new(v.to_string(), "negative")));
                }
                self.visit_u64(v as u64)
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Amount, E> {
                Amount::from_coins_f64(v).map_err(E::custom)
            }

            fn visit_str<E: de::Error>(self, v: &str) -> Result<Amount, E> {
                v.parse().map_err(E::custom)
            }
        }

        deserializer.deserialize_any(AmountVisitor)
    }
}
