// Amount - native-asset quantities in base units
//
// One whole unit is 10^18 base units, so "1.0" and "0.5" parse the same way a
// wallet would render them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Number of decimal places in one whole unit
pub const DECIMALS: u32 = 18;

const UNIT: u128 = 10u128.pow(DECIMALS);

#[derive(Error, Debug, PartialEq, Eq)]
pub enum AmountError {
    #[error("Amount cannot be empty")]
    Empty,

    #[error("Invalid amount '{0}': expected digits with an optional fractional part")]
    Malformed(String),

    #[error("Too many decimal places: at most {max}, got {got}")]
    TooManyDecimals { max: u32, got: usize },

    #[error("Amount too large")]
    Overflow,
}

/// A non-negative quantity of the native asset, counted in base units
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Amount(u128);

impl Amount {
    pub const ZERO: Amount = Amount(0);

    /// Exactly one whole unit
    pub const ONE: Amount = Amount(UNIT);

    /// Create from base units
    pub const fn from_base_units(units: u128) -> Self {
        Self(units)
    }

    /// Create from a count of whole units
    pub fn from_units(units: u64) -> Self {
        Self(units as u128 * UNIT)
    }

    /// Get the raw base-unit value
    pub const fn base_units(&self) -> u128 {
        self.0
    }

    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_add(rhs.0).map(Amount)
    }

    pub fn checked_sub(self, rhs: Amount) -> Option<Amount> {
        self.0.checked_sub(rhs.0).map(Amount)
    }

    /// Parse a decimal string of whole units, e.g. "1", "1.0", "0.5"
    pub fn parse(s: &str) -> Result<Self, AmountError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(AmountError::Empty);
        }

        let (whole, fraction) = match s.split_once('.') {
            Some((whole, fraction)) => (whole, Some(fraction)),
            None => (s, None),
        };

        if !is_digits(whole) {
            return Err(AmountError::Malformed(s.to_string()));
        }

        let whole_units: u128 = whole.parse().map_err(|_| AmountError::Overflow)?;
        let mut total = whole_units.checked_mul(UNIT).ok_or(AmountError::Overflow)?;

        if let Some(fraction) = fraction {
            if !is_digits(fraction) {
                return Err(AmountError::Malformed(s.to_string()));
            }
            if fraction.len() > DECIMALS as usize {
                return Err(AmountError::TooManyDecimals {
                    max: DECIMALS,
                    got: fraction.len(),
                });
            }

            let padded = format!("{:0<width$}", fraction, width = DECIMALS as usize);
            let fraction_units: u128 = padded
                .parse()
                .map_err(|_| AmountError::Malformed(s.to_string()))?;
            total = total.checked_add(fraction_units).ok_or(AmountError::Overflow)?;
        }

        Ok(Self(total))
    }
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit())
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / UNIT;
        let fraction = self.0 % UNIT;
        let digits = format!("{:0>width$}", fraction, width = DECIMALS as usize);
        let trimmed = digits.trim_end_matches('0');
        if trimmed.is_empty() {
            write!(f, "{}.0", whole)
        } else {
            write!(f, "{}.{}", whole, trimmed)
        }
    }
}
