//! Reputation scoring
//!
//! Derives the average rating, aggregate score and verified flag of a
//! developer profile from its counters. Pure functions, no I/O.

use crate::core::models::DeveloperProfile;

/// Score granted per completed bounty
pub const COMPLETION_WEIGHT: u64 = 10;

/// Score granted per rating, scaled by the rating's average
pub const RATING_WEIGHT: f64 = 2.0;

/// Completed bounties needed for verification
pub const VERIFIED_MIN_COMPLETED: u32 = 3;

/// Ratings needed for verification
pub const VERIFIED_MIN_RATINGS: u32 = 3;

/// Average rating needed for verification
pub const VERIFIED_MIN_AVERAGE: f64 = 4.0;

/// Mean score across every category of every rating
#[must_use]
pub fn average_rating(rating_points: u32, total_ratings: u32) -> f64 {
    if total_ratings == 0 {
        return 0.0;
    }
    f64::from(rating_points) / (4.0 * f64::from(total_ratings))
}

/// Aggregate score for a profile
///
/// Completions dominate; ratings add up to `RATING_WEIGHT * 5` each;
/// each endorsed skill adds one point.
#[must_use]
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn total_score(profile: &DeveloperProfile) -> u64 {
    let completions = u64::from(profile.completed_bounties) * COMPLETION_WEIGHT;
    let ratings =
        (profile.average_rating * f64::from(profile.total_ratings) * RATING_WEIGHT).round();
    // average_rating is never negative, so the cast only drops the (zero) fraction
    completions + ratings.max(0.0) as u64 + u64::from(profile.endorsements)
}

/// Whether a profile meets the verification bar
#[must_use]
pub fn is_verified(profile: &DeveloperProfile) -> bool {
    profile.completed_bounties >= VERIFIED_MIN_COMPLETED
        && profile.total_ratings >= VERIFIED_MIN_RATINGS
        && profile.average_rating >= VERIFIED_MIN_AVERAGE
}

/// Recompute every derived field of a profile from its counters
pub fn recompute(profile: &mut DeveloperProfile) {
    profile.average_rating = average_rating(profile.rating_points, profile.total_ratings);
    profile.total_score = total_score(profile);
    profile.is_verified = is_verified(profile);
}
