//! Token amounts
//!
//! Amounts are fixed-point decimals with [`DECIMALS`] fractional digits,
//! stored as integer base units so arithmetic never loses precision.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// Fractional digits carried by every amount
pub const DECIMALS: u32 = 18;

const UNIT: u128 = 10u128.pow(DECIMALS);

/// A non-negative token amount
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(try_from = "String", into = "String")]
pub struct Amount(u128);

impl Amount {
    /// The zero amount
    pub const ZERO: Self = Self(0);

    /// Build from raw base units
    #[must_use]
    pub const fn from_base_units(units: u128) -> Self {
        Self(units)
    }

    /// Build from a whole number of tokens
    pub fn from_tokens(tokens: u64) -> Result<Self, LedgerError> {
        u128::from(tokens).checked_mul(UNIT).map(Self).ok_or(LedgerError::Overflow)
    }

    /// Raw base units
    #[must_use]
    pub const fn base_units(self) -> u128 {
        self.0
    }

    /// Whether this is zero
    #[must_use]
    pub const fn is_zero(self) -> bool {
        self.0 == 0
    }

    /// Checked addition
    #[must_use]
    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    /// Checked subtraction; `None` if the result would be negative
    #[must_use]
    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    /// Parse a decimal string such as `"12"` or `"0.5"`
    pub fn parse(s: &str) -> Result<Self, LedgerError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(LedgerError::InvalidAmount("empty amount".to_string()));
        }

        let (whole, frac) = match s.split_once('.') {
            Some((w, f)) => (w, f),
            None => (s, ""),
        };

        if whole.is_empty() && frac.is_empty() {
            return Err(LedgerError::InvalidAmount(s.to_string()));
        }
        if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit())
        {
            return Err(LedgerError::InvalidAmount(format!("{s} (not a decimal number)")));
        }
        if frac.len() > DECIMALS as usize {
            return Err(LedgerError::InvalidAmount(format!(
                "{s} (more than {DECIMALS} decimal places)"
            )));
        }

        let whole_units = if whole.is_empty() {
            0
        } else {
            whole
                .parse::<u128>()
                .map_err(|_| LedgerError::InvalidAmount(format!("{s} (too large)")))?
        };

        let frac_units = if frac.is_empty() {
            0
        } else {
            // frac has at most DECIMALS digits so the shift cannot overflow
            let padded = format!("{frac:0<width$}", width = DECIMALS as usize);
            padded
                .parse::<u128>()
                .map_err(|_| LedgerError::InvalidAmount(s.to_string()))?
        };

        whole_units
            .checked_mul(UNIT)
            .and_then(|w| w.checked_add(frac_units))
            .map(Self)
            .ok_or_else(|| LedgerError::InvalidAmount(format!("{s} (too large)")))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / UNIT;
        let frac = self.0 % UNIT;
        if frac == 0 {
            return write!(f, "{whole}");
        }
        let frac = format!("{frac:0width$}", width = DECIMALS as usize);
        write!(f, "{whole}.{}", frac.trim_end_matches('0'))
    }
}

impl FromStr for Amount {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Amount {
    type Error = LedgerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Amount> for String {
    fn from(amount: Amount) -> Self {
        amount.to_string()
    }
}
