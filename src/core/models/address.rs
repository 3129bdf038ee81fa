//! Wallet address model

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::LedgerError;

/// Number of raw bytes behind an address
const ADDRESS_BYTES: usize = 20;

/// A wallet address: `0x` followed by 40 lowercase hex digits
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Address(String);

impl Address {
    /// Parse and normalise an address
    pub fn parse(s: &str) -> Result<Self, LedgerError> {
        let trimmed = s.trim();
        let hex = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .ok_or_else(|| LedgerError::InvalidAddress(format!("{s} (missing 0x prefix)")))?;

        if hex.len() != ADDRESS_BYTES * 2 {
            return Err(LedgerError::InvalidAddress(format!(
                "{s} (expected {} hex digits, got {})",
                ADDRESS_BYTES * 2,
                hex.len()
            )));
        }
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(LedgerError::InvalidAddress(format!("{s} (non-hex character)")));
        }

        Ok(Self(format!("0x{}", hex.to_ascii_lowercase())))
    }

    /// Generate a fresh random address
    #[must_use]
    pub fn random() -> Self {
        let mut bytes = [0u8; ADDRESS_BYTES];
        rand::thread_rng().fill(&mut bytes);
        let hex: String = bytes.iter().map(|b| format!("{b:02x}")).collect();
        Self(format!("0x{hex}"))
    }

    /// The address as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Shortened form for display (`0x1234…abcd`)
    #[must_use]
    pub fn short(&self) -> String {
        format!("{}…{}", &self.0[..6], &self.0[self.0.len() - 4..])
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Address {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Address {
    type Error = LedgerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Address> for String {
    fn from(address: Address) -> Self {
        address.0
    }
}
