//! Weighted random quote selection
//!
//! Each quote is picked with probability `weight / total_weight`. The scan
//! order of the input does not affect the distribution; callers pass quotes
//! heaviest first so the common case terminates early.

use crate::db::models::WeightedQuote;
use rand::Rng;

/// Pick one quote id with probability proportional to its weight.
///
/// Returns `None` for an empty slice or a non-positive total weight.
/// Quotes with a non-positive weight are never picked.
pub fn select<R: Rng + ?Sized>(quotes: &[WeightedQuote], rng: &mut R) -> Option<i64> {
    let total: f64 = quotes.iter().map(|q| q.weight.max(0.0)).sum();
    if quotes.is_empty() || !total.is_finite() || total <= 0.0 {
        return None;
    }

    let target = rng.gen_range(0.0..total);
    let mut cumulative = 0.0;
    let mut last_eligible = None;

    for quote in quotes {
        if quote.weight <= 0.0 {
            continue;
        }
        cumulative += quote.weight;
        last_eligible = Some(quote.id);
        if cumulative >= target {
            return Some(quote.id);
        }
    }

    // Floating-point accumulation fell short of the target
    last_eligible
}
