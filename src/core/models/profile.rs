//! Developer profile model
//!
//! Aggregate reputation and skill record for a participant. Created at
//! registration, updated by completions, ratings and endorsements.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Address, Amount};

/// Reputation record for a registered developer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeveloperProfile {
    /// Wallet the profile belongs to
    pub address: Address,
    /// Aggregate reputation score
    pub total_score: u64,
    /// Bounties paid out to this developer
    pub completed_bounties: u32,
    /// Sum of all payouts
    pub total_earnings: Amount,
    /// Mean of every submitted score (0.0 to 5.0)
    pub average_rating: f64,
    /// Number of ratings received
    pub total_ratings: u32,
    /// Skill set (normalised, no duplicates)
    pub skills: BTreeSet<String>,
    /// Skills added through endorsement by others
    #[serde(default)]
    pub endorsements: u32,
    /// Whether the developer meets the verification bar
    pub is_verified: bool,
    /// When the developer registered
    pub joined_at: DateTime<Utc>,
    /// Last time the developer acted on a bounty
    pub last_active_at: DateTime<Utc>,
    /// Sum of every individual score received
    #[serde(default)]
    pub rating_points: u32,
}

impl DeveloperProfile {
    /// Create an empty profile
    #[must_use]
    pub fn new(address: Address, skills: BTreeSet<String>, now: DateTime<Utc>) -> Self {
        Self {
            address,
            total_score: 0,
            completed_bounties: 0,
            total_earnings: Amount::ZERO,
            average_rating: 0.0,
            total_ratings: 0,
            skills,
            endorsements: 0,
            is_verified: false,
            joined_at: now,
            last_active_at: now,
            rating_points: 0,
        }
    }
}
