//! Integration tests for dashboard totals and the popularity list

mod support;

use quotes_common::stats::{dashboard, popular, POPULAR_LIMIT};
use quotes_common::SourceType;
use support::{add_quote, add_source, set_counters, setup_db};

#[tokio::test]
async fn test_dashboard_on_empty_store() {
    let (_dir, pool) = setup_db().await;

    let stats = dashboard(&pool).await.unwrap();

    assert_eq!(stats.total_quotes, 0);
    assert_eq!(stats.total_sources, 0);
    assert_eq!(stats.total_views, 0);
    assert_eq!(stats.total_likes, 0);
    assert_eq!(stats.total_dislikes, 0);
    assert!(stats.most_popular.is_none());
    assert!(stats.most_viewed.is_none());
}

#[tokio::test]
async fn test_dashboard_totals_and_leaders() {
    let (_dir, pool) = setup_db().await;
    let book = add_source(&pool, "Dune", SourceType::Book).await;
    let movie = add_source(&pool, "Heat", SourceType::Movie).await;
    let a = add_quote(&pool, book, "Quote number one", None).await;
    let b = add_quote(&pool, book, "Quote number two", None).await;
    let c = add_quote(&pool, movie, "Quote number three", None).await;
    set_counters(&pool, a, 50, 2, 0).await;
    set_counters(&pool, b, 10, 6, 1).await;
    set_counters(&pool, c, 20, 5, 0).await;

    let stats = dashboard(&pool).await.unwrap();

    assert_eq!(stats.total_quotes, 3);
    assert_eq!(stats.total_sources, 2);
    assert_eq!(stats.total_views, 80);
    assert_eq!(stats.total_likes, 13);
    assert_eq!(stats.total_dislikes, 1);

    // b and c both rate 5; c has more views
    let most_popular = stats.most_popular.unwrap();
    assert_eq!(most_popular.quote.id, c);
    assert_eq!(most_popular.source_name, "Heat");

    assert_eq!(stats.most_viewed.unwrap().quote.id, a);
}

#[tokio::test]
async fn test_popular_orders_by_rating_then_views() {
    let (_dir, pool) = setup_db().await;
    let source = add_source(&pool, "Dune", SourceType::Book).await;
    let a = add_quote(&pool, source, "Quote number one", None).await;
    let b = add_quote(&pool, source, "Quote number two", None).await;
    let c = add_quote(&pool, source, "Quote number three", None).await;
    // Many likes but more dislikes: rating -2
    set_counters(&pool, a, 5, 8, 10).await;
    set_counters(&pool, b, 3, 1, 0).await;
    set_counters(&pool, c, 9, 1, 0).await;

    let ids: Vec<i64> = popular(&pool, POPULAR_LIMIT)
        .await
        .unwrap()
        .into_iter()
        .map(|q| q.quote.id)
        .collect();

    assert_eq!(ids, vec![c, b, a]);
}

#[tokio::test]
async fn test_popular_is_truncated() {
    let (_dir, pool) = setup_db().await;
    for i in 0..4 {
        let source = add_source(&pool, &format!("Source {}", i), SourceType::Other).await;
        for j in 0..3 {
            add_quote(&pool, source, &format!("Quote {} of source {}", j, i), None).await;
        }
    }

    assert_eq!(popular(&pool, POPULAR_LIMIT).await.unwrap().len(), 10);
    assert_eq!(popular(&pool, 3).await.unwrap().len(), 3);
}
