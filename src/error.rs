//! Ledger error type
//!
//! Every ledger and session operation reports failure through [`LedgerError`].
//! A failed operation leaves session and ledger state exactly as it was.

use std::time::Duration;

use thiserror::Error;

use crate::core::models::{Address, Amount, BountyId, BountyStatus};

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Errors reported by the wallet/ledger collaborator
#[derive(Debug, Error)]
pub enum LedgerError {
    /// The session has no wallet to connect with
    #[error("no wallet configured; create one first")]
    NoWallet,

    /// The operation needs a connected wallet
    #[error("wallet is not connected")]
    NotConnected,

    /// The ledger does not know this wallet
    #[error("wallet not found: {0}")]
    WalletNotFound(Address),

    /// The ledger could not be reached
    #[error("ledger unavailable: {0}")]
    Unavailable(String),

    /// The ledger did not answer in time
    #[error("ledger call timed out after {0:?}")]
    Timeout(Duration),

    /// Malformed wallet address
    #[error("invalid address: {0}")]
    InvalidAddress(String),

    /// Malformed or out-of-range amount
    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    /// Deadline is not in the future
    #[error("invalid deadline: {0}")]
    InvalidDeadline(String),

    /// Repository reference is not `owner/name`
    #[error("invalid repository: {0}")]
    InvalidRepository(String),

    /// Issue reference is empty or malformed
    #[error("invalid issue reference: {0}")]
    InvalidIssue(String),

    /// Pull-request number is zero
    #[error("invalid pull request number: {0}")]
    InvalidPullRequest(u64),

    /// Rating score or feedback out of range
    #[error("invalid rating: {0}")]
    InvalidRating(String),

    /// Skill name is empty or malformed
    #[error("invalid skill: {0}")]
    InvalidSkill(String),

    /// Balance too low to escrow the bounty amount
    #[error("insufficient funds: needed {needed}, available {available}")]
    InsufficientFunds {
        /// Amount the operation needs
        needed: Amount,
        /// Amount the wallet holds
        available: Amount,
    },

    /// No bounty with this id
    #[error("bounty not found: #{0}")]
    BountyNotFound(BountyId),

    /// The bounty's status does not allow this action
    #[error("bounty #{id} is {status}; cannot {action}")]
    InvalidTransition {
        /// Bounty id
        id: BountyId,
        /// Current status
        status: BountyStatus,
        /// Attempted action
        action: &'static str,
    },

    /// Only the issuer may perform this action
    #[error("only the issuer of bounty #{0} may do this")]
    NotIssuer(BountyId),

    /// Only the assignee may perform this action
    #[error("only the assignee of bounty #{0} may do this")]
    NotAssignee(BountyId),

    /// Issuers cannot take their own bounty
    #[error("issuer cannot be assigned to their own bounty #{0}")]
    IssuerCannotAssignSelf(BountyId),

    /// The bounty's deadline has passed
    #[error("bounty #{0} has expired")]
    BountyExpired(BountyId),

    /// A developer profile already exists for this wallet
    #[error("developer already registered: {0}")]
    AlreadyRegistered(Address),

    /// No developer profile exists for this wallet
    #[error("developer not registered: {0}")]
    NotRegistered(Address),

    /// The bounty has already been rated
    #[error("bounty #{0} has already been rated")]
    AlreadyRated(BountyId),

    /// Developers cannot rate themselves
    #[error("cannot rate yourself")]
    SelfRating,

    /// Developers cannot endorse themselves
    #[error("cannot endorse your own skills")]
    SelfEndorsement,

    /// Amount arithmetic overflowed
    #[error("amount overflow")]
    Overflow,

    /// Ledger state file could not be read or written
    #[error("ledger storage error: {0}")]
    Io(#[from] std::io::Error),

    /// Ledger state file could not be parsed or encoded
    #[error("ledger state is corrupt: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl LedgerError {
    /// Whether retrying the same call could succeed without any other change
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Timeout(_) | Self::Io(_))
    }
}
