//! Serving quotes and recording votes
//!
//! A view picks a quote, counts the view and hands the viewer a fresh
//! eligibility token. A vote spends that token, bumps the matching counter
//! and feeds the new counters back into the quote's weight.

use crate::db::models::QuoteWithSource;
use crate::db::quotes;
use crate::eligibility::{EligibilityStore, SessionId};
use crate::error::{Error, Result};
use crate::selector;
use crate::weight;
use rand::Rng;
use serde::Serialize;
use sqlx::SqlitePool;
use std::fmt;
use tracing::{debug, error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VoteKind {
    Like,
    Dislike,
}

impl fmt::Display for VoteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VoteKind::Like => f.write_str("like"),
            VoteKind::Dislike => f.write_str("dislike"),
        }
    }
}

/// Counters and weight after a successful vote
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct VoteOutcome {
    pub likes: i64,
    pub dislikes: i64,
    pub weight: f64,
}

/// Pick a weighted-random quote for a viewer.
///
/// On success the view counter is incremented once and the viewer receives
/// a fresh eligibility token for the quote. Returns `None` when there is
/// nothing to show.
pub async fn serve_random_quote<R: Rng + ?Sized>(
    pool: &SqlitePool,
    tokens: &EligibilityStore,
    session: SessionId,
    rng: &mut R,
) -> Result<Option<QuoteWithSource>> {
    let candidates = quotes::list_weighted_quotes(pool).await?;
    let Some(quote_id) = selector::select(&candidates, rng) else {
        debug!(candidates = candidates.len(), "No quote to serve");
        return Ok(None);
    };

    // The quote may have vanished between the scan and the update
    if !quotes::increment_views(pool, quote_id).await? {
        return Ok(None);
    }

    let quote = quotes::get_quote_with_source(pool, quote_id).await?;
    if quote.is_some() {
        tokens.issue(session, quote_id);
        debug!(quote_id, %session, "Served quote");
    }

    Ok(quote)
}

/// Record a like or dislike from a viewer.
///
/// Fails with `NotFound` for an unknown quote and `NotEligible` (carrying the
/// current counters, unchanged) when the viewer holds no unspent token.
pub async fn cast_vote(
    pool: &SqlitePool,
    tokens: &EligibilityStore,
    session: SessionId,
    quote_id: i64,
    kind: VoteKind,
) -> Result<VoteOutcome> {
    let quote = quotes::get_quote(pool, quote_id)
        .await?
        .ok_or_else(|| Error::NotFound(format!("quote {}", quote_id)))?;

    if !tokens.try_consume(session, quote_id) {
        debug!(quote_id, %session, kind = %kind, "Vote rejected: not eligible");
        return Err(Error::NotEligible {
            likes: quote.likes,
            dislikes: quote.dislikes,
        });
    }

    let incremented = match kind {
        VoteKind::Like => quotes::increment_likes(pool, quote_id).await,
        VoteKind::Dislike => quotes::increment_dislikes(pool, quote_id).await,
    };

    let counters = match incremented {
        Ok(Some(counters)) => counters,
        Ok(None) => return Err(Error::NotFound(format!("quote {}", quote_id))),
        Err(e) => {
            // Nothing was counted, so the viewer keeps the right to vote
            tokens.issue(session, quote_id);
            return Err(e);
        }
    };

    let new_weight = weight::next_weight(counters.weight, counters.likes, counters.dislikes);
    // The vote is already counted; a failed weight write leaves the old
    // weight in place until the next vote recomputes it.
    let weight = if weight::should_persist(counters.weight, new_weight) {
        match quotes::set_weight(pool, quote_id, new_weight).await {
            Ok(()) => {
                debug!(quote_id, old = counters.weight, new = new_weight, "Weight updated");
                new_weight
            }
            Err(e) => {
                error!(quote_id, "Failed to update weight after vote: {}", e);
                counters.weight
            }
        }
    } else {
        counters.weight
    };

    info!(
        quote_id,
        kind = %kind,
        likes = counters.likes,
        dislikes = counters.dislikes,
        weight,
        "Vote recorded"
    );

    Ok(VoteOutcome {
        likes: counters.likes,
        dislikes: counters.dislikes,
        weight,
    })
}
