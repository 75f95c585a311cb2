//! Source table queries

use super::models::{Source, SourceType};
use crate::Result;
use sqlx::SqlitePool;

/// Insert a source and return its id.
///
/// The (name, type) UNIQUE constraint surfaces as a database error; the
/// admission layer translates it.
pub async fn insert_source(pool: &SqlitePool, name: &str, source_type: SourceType) -> Result<i64> {
    let id = sqlx::query("INSERT INTO sources (name, type) VALUES (?, ?)")
        .bind(name)
        .bind(source_type.as_str())
        .execute(pool)
        .await?
        .last_insert_rowid();

    Ok(id)
}

pub async fn get_source(pool: &SqlitePool, id: i64) -> Result<Option<Source>> {
    let row = sqlx::query("SELECT id, name, type, created_at FROM sources WHERE id = ?")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    Ok(row.as_ref().map(Source::from_row).transpose()?)
}

pub async fn source_exists(pool: &SqlitePool, name: &str, source_type: SourceType) -> Result<bool> {
    let found: Option<i64> =
        sqlx::query_scalar("SELECT id FROM sources WHERE name = ? AND type = ?")
            .bind(name)
            .bind(source_type.as_str())
            .fetch_optional(pool)
            .await?;

    Ok(found.is_some())
}

/// All sources ordered by type, then name
pub async fn list_sources(pool: &SqlitePool) -> Result<Vec<Source>> {
    let rows = sqlx::query(
        "SELECT id, name, type, created_at FROM sources ORDER BY type ASC, name ASC",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.iter().map(Source::from_row).collect::<std::result::Result<_, _>>()?)
}

pub async fn count_sources(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sources")
        .fetch_one(pool)
        .await?;

    Ok(count)
}
