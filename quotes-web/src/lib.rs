//! quotes-web library - HTTP front end for the quotes service
//!
//! Serves weighted-random quotes, takes likes/dislikes, and lets
//! administrators add sources and quotes.

use axum::Router;
use quotes_common::admission::AdmissionPolicy;
use quotes_common::EligibilityStore;
use sqlx::SqlitePool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;

pub mod api;
pub mod error;
pub mod pages;
pub mod session;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Per-viewer vote eligibility tokens
    pub tokens: Arc<EligibilityStore>,
    /// Admission settings for new quotes
    pub policy: AdmissionPolicy,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool, policy: AdmissionPolicy, session_ttl: Duration) -> Self {
        Self {
            db,
            tokens: Arc::new(EligibilityStore::new(session_ttl)),
            policy,
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::{get, post};

    Router::new()
        .route("/", get(api::random_quote))
        .route("/add/", get(api::add_quote_form).post(api::add_quote))
        .route("/add/source/", get(api::add_source_form).post(api::add_source))
        .route("/popular/", get(api::popular_quotes))
        .route("/dashboard/", get(api::dashboard))
        .route("/quote/:id/like/", post(api::like_quote))
        .route("/quote/:id/dislike/", post(api::dislike_quote))
        .route("/static/app.css", get(api::serve_app_css))
        .route("/static/vote.js", get(api::serve_vote_js))
        .merge(api::health_routes())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
