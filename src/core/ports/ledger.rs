//! Ledger port
//!
//! Defines the interface of the external wallet/ledger collaborator.

use async_trait::async_trait;

use crate::core::models::{
    Address, Amount, BountyDraft, BountyId, BountyRecord, DeveloperProfile, RatingScores,
    WalletInfo,
};
use crate::error::Result;

/// Wallet/ledger collaborator
///
/// Implementations hold custody of funds and the authoritative bounty and
/// reputation state. Calls that change state carry the acting wallet
/// explicitly. Every call either succeeds or fails with no effect.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Ledger: Send + Sync {
    /// Open a new wallet funded with the ledger's starting balance
    async fn create_wallet(&self) -> Result<Address>;

    /// Look up a wallet to start a session with
    async fn connect(&self, address: &Address) -> Result<WalletInfo>;

    /// Spendable balance of a wallet
    async fn balance(&self, address: &Address) -> Result<Amount>;

    /// Open a bounty, escrowing its amount from the issuer
    ///
    /// Returns the new bounty's id.
    async fn create_bounty(&self, issuer: &Address, draft: &BountyDraft) -> Result<BountyId>;

    /// Assign an open bounty (`caller == assignee` for self-assignment)
    async fn assign_bounty(
        &self,
        caller: &Address,
        id: BountyId,
        assignee: &Address,
    ) -> Result<BountyRecord>;

    /// Record the pull request resolving an assigned bounty
    async fn submit_pull_request(
        &self,
        caller: &Address,
        id: BountyId,
        pr_number: u64,
    ) -> Result<BountyRecord>;

    /// Approve a bounty in review and pay the assignee
    async fn approve_bounty(&self, caller: &Address, id: BountyId) -> Result<BountyRecord>;

    /// Create a developer profile for a wallet
    async fn register_developer(
        &self,
        address: &Address,
        skills: &[String],
    ) -> Result<DeveloperProfile>;

    /// Rate the developer who completed a bounty
    async fn submit_rating(
        &self,
        rater: &Address,
        developer: &Address,
        id: BountyId,
        scores: &RatingScores,
    ) -> Result<DeveloperProfile>;

    /// Add a skill to another developer's profile
    ///
    /// Returns `true` if the skill was new.
    async fn endorse_skill(&self, endorser: &Address, developer: &Address, skill: &str)
    -> Result<bool>;

    /// Look up a bounty
    async fn bounty(&self, id: BountyId) -> Result<BountyRecord>;

    /// Bounties opened by a wallet, ordered by id
    async fn bounties_issued_by(&self, address: &Address) -> Result<Vec<BountyRecord>>;

    /// Bounties assigned to a wallet, ordered by id
    async fn bounties_assigned_to(&self, address: &Address) -> Result<Vec<BountyRecord>>;

    /// Look up a developer profile
    async fn developer_profile(&self, address: &Address) -> Result<Option<DeveloperProfile>>;

    /// Aggregate reputation of a wallet (0 when unregistered)
    async fn reputation(&self, address: &Address) -> Result<u64>;
}
