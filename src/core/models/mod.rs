//! Domain models for bountyledger
//!
//! Pure data structures with no I/O dependencies.
//!
//! - [`Address`] - A wallet address
//! - [`Amount`] - A fixed-point token amount
//! - [`BountyRecord`] - "This issue pays this much"
//! - [`DeveloperProfile`] - Reputation and skills of a participant
//! - [`Rating`] - An issuer's scores for a completed bounty
//! - [`SessionState`] - What a front-end renders from a session

mod address;
mod amount;
mod bounty;
mod connection;
mod profile;
mod rating;

pub use address::Address;
pub use amount::{Amount, DECIMALS};
pub use bounty::{BountyDraft, BountyId, BountyRecord, BountyStatus};
pub use connection::{ConnectionState, SessionState};
pub use profile::DeveloperProfile;
pub use rating::{MAX_SCORE, Rating, RatingScores};

/// Wallet details returned by a successful connect
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WalletInfo {
    /// Connected wallet
    pub address: Address,
    /// Current balance
    pub balance: Amount,
}
