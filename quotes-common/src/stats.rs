//! Read-only statistics over the quote store
//!
//! Recomputed on every request; nothing is cached.

use crate::db::models::QuoteWithSource;
use crate::db::{quotes, sources};
use crate::Result;
use serde::Serialize;
use sqlx::{Row, SqlitePool};

/// Default length of the popularity list
pub const POPULAR_LIMIT: i64 = 10;

/// Rating first, then views; id keeps the order total
const POPULARITY_ORDER: &str = "(q.likes - q.dislikes) DESC, q.views DESC, q.id ASC";
const VIEWS_ORDER: &str = "q.views DESC, q.id ASC";

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub total_quotes: i64,
    pub total_sources: i64,
    pub total_views: i64,
    pub total_likes: i64,
    pub total_dislikes: i64,
    pub most_popular: Option<QuoteWithSource>,
    pub most_viewed: Option<QuoteWithSource>,
}

pub async fn dashboard(pool: &SqlitePool) -> Result<Dashboard> {
    let totals = sqlx::query(
        r#"
        SELECT COUNT(*) AS total_quotes,
               COALESCE(SUM(views), 0) AS total_views,
               COALESCE(SUM(likes), 0) AS total_likes,
               COALESCE(SUM(dislikes), 0) AS total_dislikes
        FROM quotes
        "#,
    )
    .fetch_one(pool)
    .await?;

    let most_popular = quotes::list_quotes_with_source(pool, POPULARITY_ORDER, 1).await?;
    let most_viewed = quotes::list_quotes_with_source(pool, VIEWS_ORDER, 1).await?;

    Ok(Dashboard {
        total_quotes: totals.try_get("total_quotes")?,
        total_sources: sources::count_sources(pool).await?,
        total_views: totals.try_get("total_views")?,
        total_likes: totals.try_get("total_likes")?,
        total_dislikes: totals.try_get("total_dislikes")?,
        most_popular: most_popular.into_iter().next(),
        most_viewed: most_viewed.into_iter().next(),
    })
}

/// Top quotes by rating, ties broken by views
pub async fn popular(pool: &SqlitePool, limit: i64) -> Result<Vec<QuoteWithSource>> {
    quotes::list_quotes_with_source(pool, POPULARITY_ORDER, limit).await
}
