//! Quote table queries
//!
//! Counter updates are single `UPDATE ... SET n = n + 1` statements so
//! concurrent requests against the same quote never lose an increment.

use super::models::{Quote, QuoteWithSource, WeightedQuote};
use crate::Result;
use sqlx::{Row, SqlitePool};

const QUOTE_WITH_SOURCE_SELECT: &str = r#"
    SELECT q.id, q.text, q.source_id, q.weight, q.views, q.likes, q.dislikes,
           q.created_at, q.updated_at,
           s.name AS source_name, s.type AS source_type
    FROM quotes q
    JOIN sources s ON s.id = q.source_id
"#;

/// Counters and weight after a vote increment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VoteCounters {
    pub likes: i64,
    pub dislikes: i64,
    pub weight: f64,
}

/// Insert a quote only if its source holds fewer than `limit` quotes.
///
/// The quota check and the insert are one statement, so two concurrent
/// admissions cannot both take the last slot. Returns `None` when the
/// source is already full.
pub async fn insert_quote_within_quota(
    pool: &SqlitePool,
    text: &str,
    source_id: i64,
    weight: f64,
    limit: i64,
) -> Result<Option<i64>> {
    let result = sqlx::query(
        r#"
        INSERT INTO quotes (text, source_id, weight)
        SELECT ?, ?, ?
        WHERE (SELECT COUNT(*) FROM quotes WHERE source_id = ?) < ?
        "#,
    )
    .bind(text)
    .bind(source_id)
    .bind(weight)
    .bind(source_id)
    .bind(limit)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        Ok(None)
    } else {
        Ok(Some(result.last_insert_rowid()))
    }
}

pub async fn get_quote(pool: &SqlitePool, id: i64) -> Result<Option<Quote>> {
    let row = sqlx::query(
        r#"
        SELECT id, text, source_id, weight, views, likes, dislikes, created_at, updated_at
        FROM quotes
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(row.as_ref().map(Quote::from_row).transpose()?)
}

pub async fn get_quote_with_source(pool: &SqlitePool, id: i64) -> Result<Option<QuoteWithSource>> {
    let sql = format!("{} WHERE q.id = ?", QUOTE_WITH_SOURCE_SELECT);
    let row = sqlx::query(&sql).bind(id).fetch_optional(pool).await?;

    Ok(row.as_ref().map(QuoteWithSource::from_row).transpose()?)
}

/// Quotes joined with sources, in the given ORDER BY, truncated to `limit`
pub(crate) async fn list_quotes_with_source(
    pool: &SqlitePool,
    order_by: &str,
    limit: i64,
) -> Result<Vec<QuoteWithSource>> {
    let sql = format!("{} ORDER BY {} LIMIT ?", QUOTE_WITH_SOURCE_SELECT, order_by);
    let rows = sqlx::query(&sql).bind(limit).fetch_all(pool).await?;

    Ok(rows
        .iter()
        .map(QuoteWithSource::from_row)
        .collect::<std::result::Result<_, _>>()?)
}

pub async fn quote_exists(pool: &SqlitePool, text: &str, source_id: i64) -> Result<bool> {
    let found: Option<i64> =
        sqlx::query_scalar("SELECT id FROM quotes WHERE text = ? AND source_id = ?")
            .bind(text)
            .bind(source_id)
            .fetch_optional(pool)
            .await?;

    Ok(found.is_some())
}

pub async fn count_quotes_for_source(pool: &SqlitePool, source_id: i64) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM quotes WHERE source_id = ?")
        .bind(source_id)
        .fetch_one(pool)
        .await?;

    Ok(count)
}

pub async fn count_quotes(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM quotes")
        .fetch_one(pool)
        .await?;

    Ok(count)
}

/// Id and weight of every quote, heaviest first (ties by id).
///
/// This is the fixed scan order used by the selector.
pub async fn list_weighted_quotes(pool: &SqlitePool) -> Result<Vec<WeightedQuote>> {
    let rows = sqlx::query("SELECT id, weight FROM quotes ORDER BY weight DESC, id ASC")
        .fetch_all(pool)
        .await?;

    rows.iter()
        .map(|row| -> Result<WeightedQuote> {
            Ok(WeightedQuote {
                id: row.try_get("id")?,
                weight: row.try_get("weight")?,
            })
        })
        .collect()
}

/// Add one view. Returns false if the quote no longer exists.
pub async fn increment_views(pool: &SqlitePool, id: i64) -> Result<bool> {
    let result = sqlx::query("UPDATE quotes SET views = views + 1 WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

pub async fn increment_likes(pool: &SqlitePool, id: i64) -> Result<Option<VoteCounters>> {
    let sql = r#"
        UPDATE quotes
        SET likes = likes + 1, updated_at = CURRENT_TIMESTAMP
        WHERE id = ?
        RETURNING likes, dislikes, weight
    "#;
    increment_vote_counter(pool, id, sql).await
}

pub async fn increment_dislikes(pool: &SqlitePool, id: i64) -> Result<Option<VoteCounters>> {
    let sql = r#"
        UPDATE quotes
        SET dislikes = dislikes + 1, updated_at = CURRENT_TIMESTAMP
        WHERE id = ?
        RETURNING likes, dislikes, weight
    "#;
    increment_vote_counter(pool, id, sql).await
}

async fn increment_vote_counter(
    pool: &SqlitePool,
    id: i64,
    sql: &str,
) -> Result<Option<VoteCounters>> {
    let row = sqlx::query(sql).bind(id).fetch_optional(pool).await?;

    row.map(|row| -> Result<VoteCounters> {
        Ok(VoteCounters {
            likes: row.try_get("likes")?,
            dislikes: row.try_get("dislikes")?,
            weight: row.try_get("weight")?,
        })
    })
    .transpose()
}

pub async fn set_weight(pool: &SqlitePool, id: i64, weight: f64) -> Result<()> {
    sqlx::query("UPDATE quotes SET weight = ?, updated_at = CURRENT_TIMESTAMP WHERE id = ?")
        .bind(weight)
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}
