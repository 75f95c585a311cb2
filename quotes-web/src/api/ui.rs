//! Static asset routes
//!
//! Serves the stylesheet and the voting script embedded at compile time.

use axum::{
    http::{header::CONTENT_TYPE, StatusCode},
    response::{IntoResponse, Response},
};

const APP_CSS: &str = include_str!("../../ui/app.css");
const VOTE_JS: &str = include_str!("../../ui/vote.js");

/// GET /static/app.css
pub async fn serve_app_css() -> Response {
    (StatusCode::OK, [(CONTENT_TYPE, "text/css")], APP_CSS).into_response()
}

/// GET /static/vote.js
///
/// Wires the like/dislike buttons to the vote endpoints
pub async fn serve_vote_js() -> Response {
    (
        StatusCode::OK,
        [(CONTENT_TYPE, "application/javascript")],
        VOTE_JS,
    )
        .into_response()
}
