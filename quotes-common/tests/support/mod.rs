//! Shared helpers for quotes-common integration tests

#![allow(dead_code)]

use quotes_common::admission::{self, AdmissionPolicy, NewQuote};
use quotes_common::db::init::init_database;
use quotes_common::SourceType;
use sqlx::SqlitePool;
use tempfile::TempDir;

/// Fresh database in a throwaway directory.
/// Keep the TempDir alive for as long as the pool is used.
pub async fn setup_db() -> (TempDir, SqlitePool) {
    let dir = TempDir::new().expect("Should create temp dir");
    let pool = init_database(&dir.path().join("quotes.db"))
        .await
        .expect("Should initialize database");
    (dir, pool)
}

pub async fn add_source(pool: &SqlitePool, name: &str, source_type: SourceType) -> i64 {
    admission::create_source(pool, name, source_type)
        .await
        .expect("Should create source")
}

pub async fn add_quote(pool: &SqlitePool, source_id: i64, text: &str, weight: Option<f64>) -> i64 {
    let new_quote = NewQuote {
        text: text.to_string(),
        source_id,
        weight,
    };
    admission::create_quote(pool, &new_quote, &AdmissionPolicy::default())
        .await
        .expect("Should create quote")
}

/// Set counters directly, bypassing the vote path
pub async fn set_counters(pool: &SqlitePool, quote_id: i64, views: i64, likes: i64, dislikes: i64) {
    sqlx::query("UPDATE quotes SET views = ?, likes = ?, dislikes = ? WHERE id = ?")
        .bind(views)
        .bind(likes)
        .bind(dislikes)
        .bind(quote_id)
        .execute(pool)
        .await
        .expect("Should update counters");
}
