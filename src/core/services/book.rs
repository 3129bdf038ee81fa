//! Ledger book - the authoritative bounty and reputation state
//!
//! Holds wallet balances, bounties, developer profiles and ratings, and
//! applies every ledger operation as a synchronous state transition.
//! Each operation validates everything first and mutates last, so a failed
//! operation never leaves partial changes behind.
//!
//! Time is passed in explicitly (`now`) so transitions are deterministic.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{reputation, validation};
use crate::core::models::{
    Address, Amount, BountyDraft, BountyId, BountyRecord, BountyStatus, DeveloperProfile, Rating,
    RatingScores, WalletInfo,
};
use crate::error::{LedgerError, Result};

/// Token denomination used when none is configured
pub const DEFAULT_TOKEN: &str = "ETH";

/// Whole tokens credited to every new wallet when none is configured
pub const DEFAULT_STARTING_TOKENS: u64 = 100;

/// Bounty and reputation state for every wallet
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerBook {
    /// Token denomination of every bounty
    token: String,
    /// Balance credited to new wallets
    starting_balance: Amount,
    /// Id handed to the next bounty
    next_bounty_id: u64,
    /// Spendable balance per wallet
    #[serde(default)]
    wallets: BTreeMap<Address, Amount>,
    /// Every bounty ever opened
    #[serde(default)]
    bounties: BTreeMap<BountyId, BountyRecord>,
    /// Registered developers
    #[serde(default)]
    profiles: BTreeMap<Address, DeveloperProfile>,
    /// Submitted ratings, in submission order
    #[serde(default)]
    ratings: Vec<Rating>,
}

impl Default for LedgerBook {
    fn default() -> Self {
        Self::new(
            DEFAULT_TOKEN,
            Amount::from_base_units(
                u128::from(DEFAULT_STARTING_TOKENS) * 10u128.pow(crate::core::models::DECIMALS),
            ),
        )
    }
}

impl LedgerBook {
    /// Create an empty book
    #[must_use]
    pub fn new(token: impl Into<String>, starting_balance: Amount) -> Self {
        Self {
            token: token.into(),
            starting_balance,
            next_bounty_id: 1,
            wallets: BTreeMap::new(),
            bounties: BTreeMap::new(),
            profiles: BTreeMap::new(),
            ratings: Vec::new(),
        }
    }

    // === Wallets ===

    /// Open a new wallet funded with the starting balance
    pub fn create_wallet(&mut self) -> Address {
        let mut address = Address::random();
        while self.wallets.contains_key(&address) {
            address = Address::random();
        }
        self.wallets.insert(address.clone(), self.starting_balance);
        address
    }

    /// Look up a wallet for a new session
    pub fn connect(&self, address: &Address) -> Result<WalletInfo> {
        Ok(WalletInfo {
            address: address.clone(),
            balance: self.balance(address)?,
        })
    }

    /// Spendable balance of a wallet
    pub fn balance(&self, address: &Address) -> Result<Amount> {
        self.wallets
            .get(address)
            .copied()
            .ok_or_else(|| LedgerError::WalletNotFound(address.clone()))
    }

    // === Bounties ===

    /// Open a bounty, escrowing its amount from the issuer
    pub fn create_bounty(
        &mut self,
        issuer: &Address,
        draft: &BountyDraft,
        now: DateTime<Utc>,
    ) -> Result<BountyId> {
        let balance = self.balance(issuer)?;
        validation::validate_amount(draft.amount)?;
        validation::validate_deadline(draft.deadline, now)?;
        let repository = validation::normalize_repository(&draft.repository)?;
        validation::validate_issue(&draft.issue_url)?;

        let remaining = balance.checked_sub(draft.amount).ok_or(LedgerError::InsufficientFunds {
            needed: draft.amount,
            available: balance,
        })?;

        let id = BountyId(self.next_bounty_id);
        self.next_bounty_id += 1;
        self.wallets.insert(issuer.clone(), remaining);
        self.bounties.insert(
            id,
            BountyRecord {
                id,
                issuer: issuer.clone(),
                assignee: None,
                amount: draft.amount,
                token: self.token.clone(),
                repository,
                issue_url: draft.issue_url.trim().to_string(),
                pr_number: None,
                status: BountyStatus::Open,
                created_at: now,
                deadline: draft.deadline,
                requires_approval: draft.requires_approval,
            },
        );

        Ok(id)
    }

    /// Assign an open bounty
    ///
    /// The issuer may assign anyone but themselves. Anyone but the issuer may
    /// assign themselves (`caller == assignee`).
    pub fn assign_bounty(
        &mut self,
        caller: &Address,
        id: BountyId,
        assignee: &Address,
        now: DateTime<Utc>,
    ) -> Result<BountyRecord> {
        self.balance(caller)?;
        self.balance(assignee)?;
        let bounty = self.get(id)?;

        if assignee == &bounty.issuer {
            return Err(LedgerError::IssuerCannotAssignSelf(id));
        }
        if caller != &bounty.issuer && caller != assignee {
            return Err(LedgerError::NotIssuer(id));
        }
        if bounty.status != BountyStatus::Open {
            return Err(LedgerError::InvalidTransition {
                id,
                status: bounty.status,
                action: "assign",
            });
        }
        if bounty.is_expired(now) {
            return Err(LedgerError::BountyExpired(id));
        }

        self.touch(assignee, now);
        let bounty = self.get_mut(id)?;
        bounty.assignee = Some(assignee.clone());
        bounty.status = BountyStatus::Assigned;
        Ok(bounty.clone())
    }

    /// Record the pull request resolving an assigned bounty
    ///
    /// Completes the bounty right away unless it requires approval.
    pub fn submit_pull_request(
        &mut self,
        caller: &Address,
        id: BountyId,
        pr_number: u64,
        now: DateTime<Utc>,
    ) -> Result<BountyRecord> {
        let bounty = self.get(id)?;

        if !bounty.is_assigned_to(caller) {
            return Err(LedgerError::NotAssignee(id));
        }
        if bounty.status != BountyStatus::Assigned {
            return Err(LedgerError::InvalidTransition {
                id,
                status: bounty.status,
                action: "submit a pull request for",
            });
        }
        if pr_number == 0 {
            return Err(LedgerError::InvalidPullRequest(pr_number));
        }

        if bounty.requires_approval {
            self.touch(caller, now);
            let bounty = self.get_mut(id)?;
            bounty.pr_number = Some(pr_number);
            bounty.status = BountyStatus::InReview;
            return Ok(bounty.clone());
        }

        self.complete(id, Some(pr_number), now)
    }

    /// Approve a bounty in review and pay the assignee
    pub fn approve_bounty(
        &mut self,
        caller: &Address,
        id: BountyId,
        now: DateTime<Utc>,
    ) -> Result<BountyRecord> {
        let bounty = self.get(id)?;

        if caller != &bounty.issuer {
            return Err(LedgerError::NotIssuer(id));
        }
        if bounty.status != BountyStatus::InReview {
            return Err(LedgerError::InvalidTransition {
                id,
                status: bounty.status,
                action: "approve",
            });
        }

        let pr_number = bounty.pr_number;
        self.complete(id, pr_number, now)
    }

    /// Pay out a bounty to its assignee
    fn complete(
        &mut self,
        id: BountyId,
        pr_number: Option<u64>,
        now: DateTime<Utc>,
    ) -> Result<BountyRecord> {
        let bounty = self.get(id)?;
        let assignee = bounty.assignee.clone().ok_or(LedgerError::InvalidTransition {
            id,
            status: bounty.status,
            action: "complete",
        })?;

        let balance = self.balance(&assignee)?;
        let credited = balance.checked_add(bounty.amount).ok_or(LedgerError::Overflow)?;
        let earnings = match self.profiles.get(&assignee) {
            Some(profile) => {
                Some(profile.total_earnings.checked_add(bounty.amount).ok_or(LedgerError::Overflow)?)
            },
            None => None,
        };

        self.wallets.insert(assignee.clone(), credited);
        if let (Some(profile), Some(earnings)) = (self.profiles.get_mut(&assignee), earnings) {
            profile.completed_bounties += 1;
            profile.total_earnings = earnings;
            profile.last_active_at = now;
            reputation::recompute(profile);
        }

        let bounty = self.get_mut(id)?;
        bounty.pr_number = pr_number;
        bounty.status = BountyStatus::Completed;
        Ok(bounty.clone())
    }

    /// Look up a bounty
    pub fn bounty(&self, id: BountyId) -> Result<BountyRecord> {
        self.get(id).cloned()
    }

    /// Bounties opened by a wallet, ordered by id
    #[must_use]
    pub fn bounties_issued_by(&self, address: &Address) -> Vec<BountyRecord> {
        self.bounties.values().filter(|b| &b.issuer == address).cloned().collect()
    }

    /// Bounties assigned to a wallet, ordered by id
    #[must_use]
    pub fn bounties_assigned_to(&self, address: &Address) -> Vec<BountyRecord> {
        self.bounties.values().filter(|b| b.is_assigned_to(address)).cloned().collect()
    }

    fn get(&self, id: BountyId) -> Result<&BountyRecord> {
        self.bounties.get(&id).ok_or(LedgerError::BountyNotFound(id))
    }

    fn get_mut(&mut self, id: BountyId) -> Result<&mut BountyRecord> {
        self.bounties.get_mut(&id).ok_or(LedgerError::BountyNotFound(id))
    }

    // === Developers ===

    /// Create a developer profile for a wallet
    pub fn register_developer<S: AsRef<str>>(
        &mut self,
        address: &Address,
        skills: &[S],
        now: DateTime<Utc>,
    ) -> Result<DeveloperProfile> {
        self.balance(address)?;
        if self.profiles.contains_key(address) {
            return Err(LedgerError::AlreadyRegistered(address.clone()));
        }
        let skills = validation::normalize_skills(skills)?;

        let profile = DeveloperProfile::new(address.clone(), skills, now);
        self.profiles.insert(address.clone(), profile.clone());
        Ok(profile)
    }

    /// Rate the developer who completed a bounty
    pub fn submit_rating(
        &mut self,
        rater: &Address,
        developer: &Address,
        id: BountyId,
        scores: RatingScores,
        now: DateTime<Utc>,
    ) -> Result<DeveloperProfile> {
        self.balance(rater)?;
        if rater == developer {
            return Err(LedgerError::SelfRating);
        }
        validation::validate_scores(&scores)?;

        let bounty = self.get(id)?;
        if &bounty.issuer != rater {
            return Err(LedgerError::NotIssuer(id));
        }
        if !bounty.is_assigned_to(developer) {
            return Err(LedgerError::NotAssignee(id));
        }
        if bounty.status != BountyStatus::Completed {
            return Err(LedgerError::InvalidTransition {
                id,
                status: bounty.status,
                action: "rate",
            });
        }
        if self.ratings.iter().any(|r| r.bounty_id == id) {
            return Err(LedgerError::AlreadyRated(id));
        }

        let points = scores.points();
        let profile = self
            .profiles
            .get_mut(developer)
            .ok_or_else(|| LedgerError::NotRegistered(developer.clone()))?;
        profile.total_ratings += 1;
        profile.rating_points += points;
        reputation::recompute(profile);
        let updated = profile.clone();

        self.ratings.push(Rating {
            bounty_id: id,
            rater: rater.clone(),
            developer: developer.clone(),
            scores,
            created_at: now,
        });

        Ok(updated)
    }

    /// Add a skill to another developer's profile
    ///
    /// Returns `true` if the skill was new, `false` if it was already listed.
    pub fn endorse_skill(
        &mut self,
        endorser: &Address,
        developer: &Address,
        skill: &str,
    ) -> Result<bool> {
        self.balance(endorser)?;
        if endorser == developer {
            return Err(LedgerError::SelfEndorsement);
        }
        let skill = validation::normalize_skill(skill)?;
        let profile = self
            .profiles
            .get_mut(developer)
            .ok_or_else(|| LedgerError::NotRegistered(developer.clone()))?;

        if !profile.skills.insert(skill) {
            return Ok(false);
        }
        profile.endorsements += 1;
        reputation::recompute(profile);
        Ok(true)
    }

    /// Look up a developer profile
    #[must_use]
    pub fn developer_profile(&self, address: &Address) -> Option<DeveloperProfile> {
        self.profiles.get(address).cloned()
    }

    /// Aggregate reputation of a wallet (0 when unregistered)
    #[must_use]
    pub fn reputation(&self, address: &Address) -> u64 {
        self.profiles.get(address).map_or(0, |p| p.total_score)
    }

    /// Ratings received by a developer, oldest first
    #[must_use]
    pub fn ratings_for(&self, developer: &Address) -> Vec<Rating> {
        self.ratings.iter().filter(|r| &r.developer == developer).cloned().collect()
    }

    fn touch(&mut self, address: &Address, now: DateTime<Utc>) {
        if let Some(profile) = self.profiles.get_mut(address) {
            profile.last_active_at = now;
        }
    }
}
