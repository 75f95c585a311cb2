//! Admission rules for new sources and quotes
//!
//! This is the one place creation-time invariants are checked:
//! - (name, type) is unique among sources
//! - (text, source) is unique among quotes
//! - a source holds at most [`MAX_QUOTES_PER_SOURCE`] quotes
//! - quote text meets the minimum length after trimming
//!
//! The database constraints back these up; a UNIQUE violation that slips
//! past the pre-checks (concurrent admission) maps to the same error.

use crate::db::models::SourceType;
use crate::db::{quotes, sources};
use crate::error::{is_unique_violation, Error, Result, ValidationError};
use crate::weight::BASE_WEIGHT;
use sqlx::SqlitePool;
use tracing::info;

pub const MAX_QUOTES_PER_SOURCE: i64 = 3;
pub const MAX_SOURCE_NAME_LEN: usize = 200;
pub const MIN_INITIAL_WEIGHT: f64 = 1.0;
pub const MAX_INITIAL_WEIGHT: f64 = 1000.0;

/// Tunable admission settings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AdmissionPolicy {
    /// Minimum quote length in characters, after trimming
    pub min_text_len: usize,
}

impl Default for AdmissionPolicy {
    fn default() -> Self {
        Self { min_text_len: 5 }
    }
}

/// Quote submitted for admission
#[derive(Debug, Clone, PartialEq)]
pub struct NewQuote {
    pub text: String,
    pub source_id: i64,
    /// Initial weight; `None` uses the base weight
    pub weight: Option<f64>,
}

/// Create a source. Fails with `DuplicateSource` if (name, type) exists.
pub async fn create_source(pool: &SqlitePool, name: &str, source_type: SourceType) -> Result<i64> {
    let name = validate_source_name(name)?;

    if sources::source_exists(pool, name, source_type).await? {
        return Err(ValidationError::DuplicateSource.into());
    }

    let id = sources::insert_source(pool, name, source_type)
        .await
        .map_err(|e| map_unique(e, ValidationError::DuplicateSource))?;

    info!(source_id = id, name, source_type = %source_type, "Source added");
    Ok(id)
}

/// Create a quote, enforcing every admission rule
pub async fn create_quote(
    pool: &SqlitePool,
    new_quote: &NewQuote,
    policy: &AdmissionPolicy,
) -> Result<i64> {
    let text = validate_quote_text(&new_quote.text, policy)?;
    let weight = validate_initial_weight(new_quote.weight)?;

    let source = sources::get_source(pool, new_quote.source_id)
        .await?
        .ok_or(ValidationError::SourceNotFound)?;

    if quotes::quote_exists(pool, text, source.id).await? {
        return Err(ValidationError::DuplicateQuote.into());
    }

    let source_full = || ValidationError::SourceFull {
        source_name: source.to_string(),
        limit: MAX_QUOTES_PER_SOURCE,
    };

    if quotes::count_quotes_for_source(pool, source.id).await? >= MAX_QUOTES_PER_SOURCE {
        return Err(source_full().into());
    }

    let id = quotes::insert_quote_within_quota(pool, text, source.id, weight, MAX_QUOTES_PER_SOURCE)
        .await
        .map_err(|e| map_unique(e, ValidationError::DuplicateQuote))?
        .ok_or_else(source_full)?;

    info!(quote_id = id, source_id = source.id, weight, "Quote added");
    Ok(id)
}

/// Trimmed source name, or the reason it is unacceptable
pub fn validate_source_name(name: &str) -> std::result::Result<&str, ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    if name.chars().count() > MAX_SOURCE_NAME_LEN {
        return Err(ValidationError::NameTooLong { max: MAX_SOURCE_NAME_LEN });
    }
    Ok(name)
}

/// Trimmed quote text, or `TextTooShort`
pub fn validate_quote_text<'a>(
    text: &'a str,
    policy: &AdmissionPolicy,
) -> std::result::Result<&'a str, ValidationError> {
    let text = text.trim();
    // An empty quote is always too short, whatever the policy says
    if text.is_empty() || text.chars().count() < policy.min_text_len {
        return Err(ValidationError::TextTooShort { min: policy.min_text_len.max(1) });
    }
    Ok(text)
}

/// Initial weight, defaulting to the base weight
pub fn validate_initial_weight(weight: Option<f64>) -> std::result::Result<f64, ValidationError> {
    match weight {
        None => Ok(BASE_WEIGHT),
        Some(w) if w.is_finite() && (MIN_INITIAL_WEIGHT..=MAX_INITIAL_WEIGHT).contains(&w) => Ok(w),
        Some(_) => Err(ValidationError::InvalidWeight {
            min: MIN_INITIAL_WEIGHT,
            max: MAX_INITIAL_WEIGHT,
        }),
    }
}

fn map_unique(err: Error, duplicate: ValidationError) -> Error {
    match err {
        Error::Database(ref db_err) if is_unique_violation(db_err) => Error::Validation(duplicate),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_is_trimmed_before_length_check() {
        let policy = AdmissionPolicy::default();
        assert_eq!(
            validate_quote_text("  abcd  ", &policy),
            Err(ValidationError::TextTooShort { min: 5 })
        );
        assert_eq!(validate_quote_text("  abcde \n", &policy), Ok("abcde"));
    }

    #[test]
    fn test_text_length_counts_characters() {
        let policy = AdmissionPolicy::default();
        // Five Cyrillic letters are ten bytes
        assert_eq!(validate_quote_text("Война", &policy), Ok("Война"));
    }

    #[test]
    fn test_empty_text_rejected_even_without_minimum() {
        let policy = AdmissionPolicy { min_text_len: 0 };
        assert!(validate_quote_text("   ", &policy).is_err());
        assert_eq!(validate_quote_text("a", &policy), Ok("a"));
    }

    #[test]
    fn test_initial_weight_bounds() {
        assert_eq!(validate_initial_weight(None), Ok(BASE_WEIGHT));
        assert_eq!(validate_initial_weight(Some(1.0)), Ok(1.0));
        assert_eq!(validate_initial_weight(Some(1000.0)), Ok(1000.0));
        assert!(validate_initial_weight(Some(0.0)).is_err());
        assert!(validate_initial_weight(Some(1000.5)).is_err());
        assert!(validate_initial_weight(Some(f64::NAN)).is_err());
    }

    #[test]
    fn test_source_name_rules() {
        assert_eq!(validate_source_name("  Dune "), Ok("Dune"));
        assert_eq!(validate_source_name("   "), Err(ValidationError::EmptyName));
        let long = "x".repeat(MAX_SOURCE_NAME_LEN + 1);
        assert_eq!(
            validate_source_name(&long),
            Err(ValidationError::NameTooLong { max: MAX_SOURCE_NAME_LEN })
        );
    }
}
