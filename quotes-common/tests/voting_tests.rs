//! Integration tests for serving quotes and voting
//!
//! Tests cover:
//! - View counting and token issue on serve
//! - At most one vote per viewer per view
//! - Weight feedback after votes
//! - Selection distribution over stored weights
//! - Concurrent votes: no lost increments, one vote per token
//! - A counted vote survives a failed weight write

mod support;

use quotes_common::db::quotes;
use quotes_common::voting::{cast_vote, serve_random_quote};
use quotes_common::{EligibilityStore, Error, SessionId, SourceType, VoteKind};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::sync::Arc;
use std::time::Duration;
use support::{add_quote, add_source, set_counters, setup_db};

fn token_store() -> EligibilityStore {
    EligibilityStore::new(Duration::from_secs(3600))
}

#[tokio::test]
async fn test_serve_from_empty_store() {
    let (_dir, pool) = setup_db().await;
    let tokens = token_store();
    let mut rng = StdRng::seed_from_u64(1);

    let served = serve_random_quote(&pool, &tokens, SessionId::new(), &mut rng).await.unwrap();
    assert!(served.is_none());
    assert!(tokens.is_empty());
}

#[tokio::test]
async fn test_serve_counts_view_and_issues_token() {
    let (_dir, pool) = setup_db().await;
    let source_id = add_source(&pool, "Dune", SourceType::Book).await;
    let quote_id = add_quote(&pool, source_id, "Fear is the mind-killer.", None).await;
    let tokens = token_store();
    let session = SessionId::new();
    let mut rng = StdRng::seed_from_u64(1);

    let served = serve_random_quote(&pool, &tokens, session, &mut rng).await.unwrap().unwrap();

    assert_eq!(served.quote.id, quote_id);
    assert_eq!(served.quote.views, 1);
    assert_eq!(served.attribution(), "Book: Dune");
    assert!(tokens.can_vote(session, quote_id));
}

#[tokio::test]
async fn test_vote_without_view_is_not_eligible() {
    let (_dir, pool) = setup_db().await;
    let source_id = add_source(&pool, "Dune", SourceType::Book).await;
    let quote_id = add_quote(&pool, source_id, "Fear is the mind-killer.", None).await;
    set_counters(&pool, quote_id, 4, 2, 1).await;
    let tokens = token_store();

    let err = cast_vote(&pool, &tokens, SessionId::new(), quote_id, VoteKind::Like)
        .await
        .unwrap_err();

    match err {
        Error::NotEligible { likes, dislikes } => assert_eq!((likes, dislikes), (2, 1)),
        other => panic!("Expected NotEligible, got {:?}", other),
    }

    let quote = quotes::get_quote(&pool, quote_id).await.unwrap().unwrap();
    assert_eq!((quote.likes, quote.dislikes), (2, 1));
    assert_eq!(quote.weight, 10.0);
}

#[tokio::test]
async fn test_vote_after_view_succeeds_once() {
    let (_dir, pool) = setup_db().await;
    let source_id = add_source(&pool, "Dune", SourceType::Book).await;
    let quote_id = add_quote(&pool, source_id, "Fear is the mind-killer.", None).await;
    let tokens = token_store();
    let session = SessionId::new();
    let mut rng = StdRng::seed_from_u64(3);

    serve_random_quote(&pool, &tokens, session, &mut rng).await.unwrap().unwrap();

    let outcome = cast_vote(&pool, &tokens, session, quote_id, VoteKind::Like).await.unwrap();
    assert_eq!((outcome.likes, outcome.dislikes), (1, 0));
    // rating=1, like_pct=100 -> raw 21, capped at 10 * 1.8
    assert!((outcome.weight - 18.0).abs() < 1e-9, "weight {}", outcome.weight);

    let second = cast_vote(&pool, &tokens, session, quote_id, VoteKind::Dislike).await;
    assert!(matches!(second, Err(Error::NotEligible { likes: 1, dislikes: 0 })));

    let quote = quotes::get_quote(&pool, quote_id).await.unwrap().unwrap();
    assert_eq!((quote.likes, quote.dislikes), (1, 0));
    assert!((quote.weight - 18.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_new_view_re_enables_voting() {
    let (_dir, pool) = setup_db().await;
    let source_id = add_source(&pool, "Dune", SourceType::Book).await;
    let quote_id = add_quote(&pool, source_id, "Fear is the mind-killer.", None).await;
    let tokens = token_store();
    let session = SessionId::new();
    let mut rng = StdRng::seed_from_u64(5);

    serve_random_quote(&pool, &tokens, session, &mut rng).await.unwrap();
    cast_vote(&pool, &tokens, session, quote_id, VoteKind::Dislike).await.unwrap();

    serve_random_quote(&pool, &tokens, session, &mut rng).await.unwrap();
    let outcome = cast_vote(&pool, &tokens, session, quote_id, VoteKind::Dislike).await.unwrap();

    assert_eq!((outcome.likes, outcome.dislikes), (0, 2));
    let quote = quotes::get_quote(&pool, quote_id).await.unwrap().unwrap();
    assert_eq!(quote.views, 2);
}

#[tokio::test]
async fn test_vote_weight_scenario_five_likes() {
    // weight=10, likes=5 after this vote -> raw 25, capped at 18
    let (_dir, pool) = setup_db().await;
    let source_id = add_source(&pool, "Dune", SourceType::Book).await;
    let quote_id = add_quote(&pool, source_id, "Fear is the mind-killer.", None).await;
    set_counters(&pool, quote_id, 4, 4, 0).await;
    let tokens = token_store();
    let session = SessionId::new();
    tokens.issue(session, quote_id);

    let outcome = cast_vote(&pool, &tokens, session, quote_id, VoteKind::Like).await.unwrap();

    assert_eq!(outcome.likes, 5);
    assert!((outcome.weight - 18.0).abs() < 1e-9, "weight {}", outcome.weight);
}

#[tokio::test]
async fn test_small_weight_change_not_persisted() {
    // likes=10, dislikes=9 after the vote: 10 + 1 + 52.6/10 = 16.26...
    let (_dir, pool) = setup_db().await;
    let source_id = add_source(&pool, "Dune", SourceType::Book).await;
    let quote_id = add_quote(&pool, source_id, "Fear is the mind-killer.", Some(16.25)).await;
    set_counters(&pool, quote_id, 19, 10, 8).await;
    let tokens = token_store();
    let session = SessionId::new();
    tokens.issue(session, quote_id);

    let outcome = cast_vote(&pool, &tokens, session, quote_id, VoteKind::Dislike).await.unwrap();

    assert_eq!(outcome.weight, 16.25);
    let quote = quotes::get_quote(&pool, quote_id).await.unwrap().unwrap();
    assert_eq!(quote.weight, 16.25);
}

#[tokio::test]
async fn test_vote_on_unknown_quote() {
    let (_dir, pool) = setup_db().await;
    let tokens = token_store();

    let err = cast_vote(&pool, &tokens, SessionId::new(), 404, VoteKind::Like).await.unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[tokio::test]
async fn test_serve_distribution_follows_weights() {
    let (_dir, pool) = setup_db().await;
    let source_id = add_source(&pool, "Dune", SourceType::Book).await;
    let a = add_quote(&pool, source_id, "Quote A weighs ten", Some(10.0)).await;
    let b = add_quote(&pool, source_id, "Quote B weighs thirty", Some(30.0)).await;
    let tokens = token_store();
    let mut rng = StdRng::seed_from_u64(42);

    let draws = 2_000;
    for _ in 0..draws {
        serve_random_quote(&pool, &tokens, SessionId::new(), &mut rng).await.unwrap();
    }

    let a_views = quotes::get_quote(&pool, a).await.unwrap().unwrap().views;
    let b_views = quotes::get_quote(&pool, b).await.unwrap().unwrap().views;
    assert_eq!(a_views + b_views, draws);

    let b_share = b_views as f64 / draws as f64;
    assert!((b_share - 0.75).abs() < 0.05, "B share was {}", b_share);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_votes_are_all_counted() {
    let (_dir, pool) = setup_db().await;
    let source_id = add_source(&pool, "Dune", SourceType::Book).await;
    let quote_id = add_quote(&pool, source_id, "Fear is the mind-killer.", None).await;
    let tokens = Arc::new(token_store());

    let voters = 50;
    let sessions: Vec<SessionId> = (0..voters).map(|_| SessionId::new()).collect();
    for session in &sessions {
        tokens.issue(*session, quote_id);
    }

    let handles: Vec<_> = sessions
        .into_iter()
        .enumerate()
        .map(|(i, session)| {
            let pool = pool.clone();
            let tokens = Arc::clone(&tokens);
            let kind = if i % 3 == 0 { VoteKind::Dislike } else { VoteKind::Like };
            tokio::spawn(async move { cast_vote(&pool, &tokens, session, quote_id, kind).await })
        })
        .collect();

    let mut failures = 0;
    for handle in handles {
        if handle.await.unwrap().is_err() {
            failures += 1;
        }
    }

    assert_eq!(failures, 0);
    let quote = quotes::get_quote(&pool, quote_id).await.unwrap().unwrap();
    assert_eq!(quote.likes + quote.dislikes, voters as i64);
    assert_eq!(quote.dislikes, 17);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_parallel_votes_on_one_token_count_once() {
    let (_dir, pool) = setup_db().await;
    let source_id = add_source(&pool, "Dune", SourceType::Book).await;
    let quote_id = add_quote(&pool, source_id, "Fear is the mind-killer.", None).await;
    let tokens = Arc::new(token_store());
    let session = SessionId::new();
    tokens.issue(session, quote_id);

    let handles: Vec<_> = (0..10)
        .map(|_| {
            let pool = pool.clone();
            let tokens = Arc::clone(&tokens);
            tokio::spawn(async move {
                cast_vote(&pool, &tokens, session, quote_id, VoteKind::Like).await
            })
        })
        .collect();

    let mut accepted = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => accepted += 1,
            Err(Error::NotEligible { .. }) => {}
            Err(other) => panic!("Unexpected error: {:?}", other),
        }
    }

    assert_eq!(accepted, 1);
    let quote = quotes::get_quote(&pool, quote_id).await.unwrap().unwrap();
    assert_eq!(quote.likes, 1);
}

#[tokio::test]
async fn test_vote_counted_when_weight_write_fails() {
    let (_dir, pool) = setup_db().await;
    let source_id = add_source(&pool, "Dune", SourceType::Book).await;
    let quote_id = add_quote(&pool, source_id, "Fear is the mind-killer.", None).await;
    sqlx::query(
        r#"
        CREATE TRIGGER freeze_weight BEFORE UPDATE OF weight ON quotes
        BEGIN
            SELECT RAISE(ABORT, 'weight is frozen');
        END
        "#,
    )
    .execute(&pool)
    .await
    .unwrap();

    let tokens = token_store();
    let session = SessionId::new();
    tokens.issue(session, quote_id);

    let outcome = cast_vote(&pool, &tokens, session, quote_id, VoteKind::Like).await.unwrap();

    // Counters reflect the vote; the weight stays at its stored value
    assert_eq!((outcome.likes, outcome.dislikes), (1, 0));
    assert_eq!(outcome.weight, 10.0);

    let quote = quotes::get_quote(&pool, quote_id).await.unwrap().unwrap();
    assert_eq!(quote.likes, 1);
    assert_eq!(quote.weight, 10.0);
    assert!(!tokens.can_vote(session, quote_id));
}
