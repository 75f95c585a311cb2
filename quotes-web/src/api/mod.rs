//! HTTP handlers for quotes-web

pub mod admin;
pub mod health;
pub mod quotes;
pub mod stats;
pub mod ui;

pub use admin::{add_quote, add_quote_form, add_source, add_source_form};
pub use health::health_routes;
pub use quotes::{dislike_quote, like_quote, random_quote};
pub use stats::{dashboard, popular_quotes};
pub use ui::{serve_app_css, serve_vote_js};
