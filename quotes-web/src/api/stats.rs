//! Popular quotes and dashboard pages

use axum::{
    extract::State,
    response::{IntoResponse, Response},
};
use quotes_common::stats::{self, POPULAR_LIMIT};

use crate::error::ApiError;
use crate::pages;
use crate::AppState;

/// GET /popular/
pub async fn popular_quotes(State(state): State<AppState>) -> Result<Response, ApiError> {
    let quotes = stats::popular(&state.db, POPULAR_LIMIT).await?;
    Ok(pages::popular(&quotes, POPULAR_LIMIT).into_response())
}

/// GET /dashboard/
pub async fn dashboard(State(state): State<AppState>) -> Result<Response, ApiError> {
    let stats = stats::dashboard(&state.db).await?;
    Ok(pages::dashboard(&stats).into_response())
}
