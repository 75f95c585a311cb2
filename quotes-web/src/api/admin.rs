//! Add-quote and add-source forms
//!
//! Validation lives in `quotes_common::admission`; this module only parses
//! form fields, calls it once, and re-renders the form with the message next
//! to the offending field when admission is refused.

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
    Form,
};
use quotes_common::admission::{self, NewQuote};
use quotes_common::db::sources;
use quotes_common::{Error, SourceType, ValidationError};
use serde::Deserialize;
use tracing::info;

use crate::error::ApiError;
use crate::pages::{self, Notice};
use crate::AppState;

/// Raw add-quote form fields, kept as text so they can be echoed back
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AddQuoteForm {
    pub text: String,
    pub source: String,
    pub weight: String,
}

impl Default for AddQuoteForm {
    fn default() -> Self {
        Self {
            text: String::new(),
            source: String::new(),
            weight: "10".to_string(),
        }
    }
}

impl AddQuoteForm {
    fn to_new_quote(&self) -> Result<NewQuote, ValidationError> {
        let source_id = self
            .source
            .trim()
            .parse::<i64>()
            .map_err(|_| ValidationError::SourceNotFound)?;

        let weight = match self.weight.trim() {
            "" => None,
            raw => Some(raw.parse::<f64>().map_err(|_| ValidationError::InvalidWeight {
                min: admission::MIN_INITIAL_WEIGHT,
                max: admission::MAX_INITIAL_WEIGHT,
            })?),
        };

        Ok(NewQuote {
            text: self.text.clone(),
            source_id,
            weight,
        })
    }
}

/// Raw add-source form fields
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AddSourceForm {
    pub name: String,
    #[serde(rename = "type")]
    pub source_type: String,
}

/// `?added=...` left by the redirect after a successful form post
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NoticeParams {
    pub added: Option<String>,
}

impl NoticeParams {
    pub fn notice(&self) -> Option<Notice> {
        self.added.as_deref().and_then(Notice::from_query_value)
    }
}

fn redirect_with_notice(path: &str, notice: Notice) -> Response {
    Redirect::to(&format!("{}?added={}", path, notice.query_value())).into_response()
}

/// GET /add/
pub async fn add_quote_form(
    State(state): State<AppState>,
    Query(params): Query<NoticeParams>,
) -> Result<Response, ApiError> {
    let sources = sources::list_sources(&state.db).await?;
    let form = AddQuoteForm::default();
    Ok(pages::add_quote(&sources, &form, None, params.notice()).into_response())
}

/// POST /add/
///
/// Redirects to the random quote page on success
pub async fn add_quote(
    State(state): State<AppState>,
    Form(form): Form<AddQuoteForm>,
) -> Result<Response, ApiError> {
    let result = match form.to_new_quote() {
        Ok(new_quote) => admission::create_quote(&state.db, &new_quote, &state.policy).await,
        Err(invalid) => Err(invalid.into()),
    };

    match result {
        Ok(_) => Ok(redirect_with_notice("/", Notice::QuoteAdded)),
        Err(Error::Validation(invalid)) => {
            info!(reason = %invalid, "Quote rejected");
            let sources = sources::list_sources(&state.db).await?;
            Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                pages::add_quote(&sources, &form, Some(&invalid), None),
            )
                .into_response())
        }
        Err(other) => Err(other.into()),
    }
}

/// GET /add/source/
pub async fn add_source_form(State(state): State<AppState>) -> Result<Response, ApiError> {
    let sources = sources::list_sources(&state.db).await?;
    Ok(pages::add_source(&sources, &AddSourceForm::default(), None).into_response())
}

/// POST /add/source/
///
/// Redirects to the add-quote form on success
pub async fn add_source(
    State(state): State<AppState>,
    Form(form): Form<AddSourceForm>,
) -> Result<Response, ApiError> {
    let result = match form.source_type.parse::<SourceType>() {
        Ok(source_type) => admission::create_source(&state.db, &form.name, source_type).await,
        Err(invalid) => Err(invalid.into()),
    };

    match result {
        Ok(_) => Ok(redirect_with_notice("/add/", Notice::SourceAdded)),
        Err(Error::Validation(invalid)) => {
            info!(reason = %invalid, "Source rejected");
            let sources = sources::list_sources(&state.db).await?;
            Ok((
                StatusCode::UNPROCESSABLE_ENTITY,
                pages::add_source(&sources, &form, Some(&invalid)),
            )
                .into_response())
        }
        Err(other) => Err(other.into()),
    }
}
