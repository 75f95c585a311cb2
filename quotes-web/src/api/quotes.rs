//! Random quote page and vote endpoints

use axum::{
    extract::{Path, Query, State},
    response::{IntoResponse, Response},
    Json,
};
use quotes_common::db::quotes;
use quotes_common::voting::{self, VoteOutcome};
use quotes_common::{Error, VoteKind};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;

use crate::api::admin::NoticeParams;
use crate::error::ApiError;
use crate::pages;
use crate::session::ViewerSession;
use crate::AppState;

/// Vote endpoint body. Always carries the current counters.
#[derive(Debug, Serialize)]
pub struct VoteResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub likes: i64,
    pub dislikes: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

impl From<VoteOutcome> for VoteResponse {
    fn from(outcome: VoteOutcome) -> Self {
        Self {
            success: true,
            error: None,
            likes: outcome.likes,
            dislikes: outcome.dislikes,
            weight: Some(outcome.weight),
        }
    }
}

/// GET /
///
/// Serves a weighted-random quote and makes the viewer eligible to vote on it
pub async fn random_quote(
    State(state): State<AppState>,
    session: ViewerSession,
    Query(params): Query<NoticeParams>,
) -> Result<Response, ApiError> {
    let mut rng = StdRng::from_entropy();
    let quote = voting::serve_random_quote(&state.db, &state.tokens, session.id, &mut rng).await?;
    let total_quotes = quotes::count_quotes(&state.db).await?;

    let page = pages::random_quote(quote.as_ref(), total_quotes, params.notice());
    Ok(session.attach(page))
}

/// POST /quote/:id/like/
pub async fn like_quote(
    State(state): State<AppState>,
    session: ViewerSession,
    Path(quote_id): Path<i64>,
) -> Result<Response, ApiError> {
    vote(state, session, quote_id, VoteKind::Like).await
}

/// POST /quote/:id/dislike/
pub async fn dislike_quote(
    State(state): State<AppState>,
    session: ViewerSession,
    Path(quote_id): Path<i64>,
) -> Result<Response, ApiError> {
    vote(state, session, quote_id, VoteKind::Dislike).await
}

async fn vote(
    state: AppState,
    session: ViewerSession,
    quote_id: i64,
    kind: VoteKind,
) -> Result<Response, ApiError> {
    let body = match voting::cast_vote(&state.db, &state.tokens, session.id, quote_id, kind).await {
        Ok(outcome) => VoteResponse::from(outcome),
        Err(Error::NotEligible { likes, dislikes }) => VoteResponse {
            success: false,
            error: Some(Error::NotEligible { likes, dislikes }.to_string()),
            likes,
            dislikes,
            weight: None,
        },
        Err(other) => return Err(other.into()),
    };

    Ok(session.attach(Json(body).into_response()))
}
