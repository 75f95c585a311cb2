//! Vote feedback rule for quote weights
//!
//! The weight of a quote drifts toward a value implied by its votes:
//! `base + rating + like_pct / 10`, floored at 1. A single update may raise
//! the weight by at most 1.8x, which smooths out bursts of likes.

/// Weight of a quote with no votes, and the default weight on creation
pub const BASE_WEIGHT: f64 = 10.0;

/// Floor for any vote-derived weight
pub const MIN_WEIGHT: f64 = 1.0;

/// Largest factor one update may raise the weight by
pub const MAX_GROWTH_FACTOR: f64 = 1.8;

/// Changes at or below this are not written back
pub const WRITE_TOLERANCE: f64 = 0.1;

/// Compute the new weight for a quote from its counters
pub fn next_weight(current_weight: f64, likes: i64, dislikes: i64) -> f64 {
    let total_votes = likes + dislikes;
    if total_votes <= 0 {
        return BASE_WEIGHT;
    }

    let rating = (likes - dislikes) as f64;
    let like_pct = likes as f64 / total_votes as f64 * 100.0;
    let raw = (BASE_WEIGHT + rating + like_pct / 10.0).max(MIN_WEIGHT);

    raw.min(current_weight * MAX_GROWTH_FACTOR)
}

/// Whether the new weight differs enough to be persisted
pub fn should_persist(current_weight: f64, new_weight: f64) -> bool {
    (new_weight - current_weight).abs() > WRITE_TOLERANCE
}
