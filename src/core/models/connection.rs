//! Session connection state
//!
//! The session's local view of the wallet connection and of the data last
//! fetched from the ledger. Transient: held for one session, reset on disconnect.

use serde::{Deserialize, Serialize};

use super::{Address, Amount, BountyRecord, DeveloperProfile};

/// Connection flags, address and balance
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConnectionState {
    /// Whether a wallet is connected
    pub is_connected: bool,
    /// Whether a connect is in flight
    pub is_initializing: bool,
    /// Connected wallet address
    pub wallet_address: Option<Address>,
    /// Wallet balance as a decimal string (`"0"` when disconnected)
    pub balance: String,
    /// Whether any other operation is in flight
    pub is_loading: bool,
}

impl Default for ConnectionState {
    fn default() -> Self {
        Self {
            is_connected: false,
            is_initializing: false,
            wallet_address: None,
            balance: Amount::ZERO.to_string(),
            is_loading: false,
        }
    }
}

impl ConnectionState {
    /// Whether an operation is in flight
    #[must_use]
    pub const fn is_busy(&self) -> bool {
        self.is_initializing || self.is_loading
    }
}

/// Everything a front-end renders from a session
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SessionState {
    /// Connection flags, address and balance
    pub connection: ConnectionState,
    /// Bounties opened by the connected wallet
    pub issued_bounties: Vec<BountyRecord>,
    /// Bounties assigned to the connected wallet
    pub assigned_bounties: Vec<BountyRecord>,
    /// Aggregate reputation of the connected wallet
    pub reputation_score: u64,
    /// Developer profile of the connected wallet, if registered
    pub developer_profile: Option<DeveloperProfile>,
}
