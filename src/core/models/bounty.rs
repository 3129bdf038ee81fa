//! Bounty model
//!
//! A bounty is a monetary reward attached to a source-code issue. It is
//! opened by an issuer, taken by an assignee, and paid out on completion.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Address, Amount};

/// Bounty identifier (sequential, starting at 1)
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct BountyId(pub u64);

impl fmt::Display for BountyId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for BountyId {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .trim_start_matches('#')
            .parse::<u64>()
            .map(Self)
            .map_err(|_| format!("Invalid bounty id: {s}"))
    }
}

/// Bounty lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BountyStatus {
    /// Waiting for someone to take it
    #[default]
    Open,
    /// Taken by an assignee, work in progress
    Assigned,
    /// Pull request submitted, waiting for issuer approval
    InReview,
    /// Paid out
    Completed,
}

impl BountyStatus {
    /// Stable numeric status code
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Open => 0,
            Self::Assigned => 1,
            Self::InReview => 2,
            Self::Completed => 3,
        }
    }

    /// Status for a numeric code
    #[must_use]
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Self::Open),
            1 => Some(Self::Assigned),
            2 => Some(Self::InReview),
            3 => Some(Self::Completed),
            _ => None,
        }
    }
}

impl fmt::Display for BountyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Open => write!(f, "open"),
            Self::Assigned => write!(f, "assigned"),
            Self::InReview => write!(f, "in_review"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

impl FromStr for BountyStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(status) = s.parse::<u8>().ok().and_then(Self::from_code) {
            return Ok(status);
        }
        match s.to_lowercase().replace('-', "_").as_str() {
            "open" => Ok(Self::Open),
            "assigned" => Ok(Self::Assigned),
            "in_review" | "review" | "inreview" => Ok(Self::InReview),
            "completed" | "complete" | "done" => Ok(Self::Completed),
            _ => Err(format!("Invalid status: {s}. Use: open, assigned, in_review, completed")),
        }
    }
}

/// Parameters for opening a bounty
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BountyDraft {
    /// Reward amount, escrowed from the issuer
    pub amount: Amount,
    /// Source repository, `owner/name`
    pub repository: String,
    /// Issue URL or reference
    pub issue_url: String,
    /// When the bounty stops accepting assignees
    pub deadline: DateTime<Utc>,
    /// Whether completion waits for issuer approval
    #[serde(default)]
    pub requires_approval: bool,
}

impl BountyDraft {
    /// Create a draft that completes without approval
    #[must_use]
    pub fn new(
        amount: Amount,
        repository: impl Into<String>,
        issue_url: impl Into<String>,
        deadline: DateTime<Utc>,
    ) -> Self {
        Self {
            amount,
            repository: repository.into(),
            issue_url: issue_url.into(),
            deadline,
            requires_approval: false,
        }
    }

    /// Require issuer approval before payout
    #[must_use]
    pub fn with_approval(mut self) -> Self {
        self.requires_approval = true;
        self
    }
}

/// A bounty as recorded by the ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BountyRecord {
    /// Bounty identifier
    pub id: BountyId,
    /// Wallet that opened and funded the bounty
    pub issuer: Address,
    /// Wallet working on the bounty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee: Option<Address>,
    /// Escrowed reward
    pub amount: Amount,
    /// Token denomination
    pub token: String,
    /// Source repository, `owner/name`
    pub repository: String,
    /// Issue URL or reference
    pub issue_url: String,
    /// Pull request that resolves the issue
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pr_number: Option<u64>,
    /// Lifecycle status
    pub status: BountyStatus,
    /// When the bounty was opened
    pub created_at: DateTime<Utc>,
    /// When the bounty stops accepting assignees
    pub deadline: DateTime<Utc>,
    /// Whether completion waits for issuer approval
    pub requires_approval: bool,
}

impl BountyRecord {
    /// Whether the deadline has passed at `now`
    #[must_use]
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now >= self.deadline
    }

    /// Whether `address` is the assignee
    #[must_use]
    pub fn is_assigned_to(&self, address: &Address) -> bool {
        self.assignee.as_ref() == Some(address)
    }
}
