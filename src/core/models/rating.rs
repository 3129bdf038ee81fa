//! Rating model
//!
//! An issuer rates the developer who completed their bounty.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Address, BountyId};

/// Highest score a rating category accepts
pub const MAX_SCORE: u8 = 5;

/// Scores submitted for one completed bounty
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RatingScores {
    /// Quality of the delivered code
    pub code_quality: u8,
    /// Responsiveness and clarity
    pub communication: u8,
    /// Delivery against the deadline
    pub timeliness: u8,
    /// Follow-through on commitments
    pub reliability: u8,
    /// Free-text feedback
    #[serde(default)]
    pub feedback: String,
}

impl RatingScores {
    /// The four numeric scores in a fixed order
    #[must_use]
    pub const fn scores(&self) -> [u8; 4] {
        [self.code_quality, self.communication, self.timeliness, self.reliability]
    }

    /// Sum of the four numeric scores
    #[must_use]
    pub fn points(&self) -> u32 {
        self.scores().iter().map(|&s| u32::from(s)).sum()
    }
}

/// A rating as recorded by the ledger
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rating {
    /// The bounty being rated
    pub bounty_id: BountyId,
    /// Wallet that submitted the rating (the issuer)
    pub rater: Address,
    /// Wallet being rated (the assignee)
    pub developer: Address,
    /// Submitted scores
    pub scores: RatingScores,
    /// When the rating was submitted
    pub created_at: DateTime<Utc>,
}
