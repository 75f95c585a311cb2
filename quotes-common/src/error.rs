//! Common error types for the quotes service

use thiserror::Error;

/// Common result type for quotes operations
pub type Result<T> = std::result::Result<T, Error>;

/// Common error types across the quotes crates
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Requested resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Admission rule rejected a new source or quote
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// Vote without a valid, unconsumed eligibility token.
    /// Carries the current counters so callers can resynchronize.
    #[error("You have already voted for this quote or have not viewed it")]
    NotEligible { likes: i64, dislikes: i64 },
}

/// Admission failures, each tied to the form field that caused it
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("Source name must not be empty")]
    EmptyName,

    #[error("Source name must be at most {max} characters")]
    NameTooLong { max: usize },

    #[error("Unknown source type: {0}")]
    UnknownSourceType(String),

    #[error("A source with this name and type already exists")]
    DuplicateSource,

    #[error("Please select a source")]
    SourceNotFound,

    #[error("A quote with this text already exists for this source")]
    DuplicateQuote,

    #[error("Source \"{source_name}\" already has {limit} quotes")]
    SourceFull { source_name: String, limit: i64 },

    #[error("Quote text must be at least {min} characters")]
    TextTooShort { min: usize },

    #[error("Weight must be a number between {min} and {max}")]
    InvalidWeight { min: f64, max: f64 },
}

impl ValidationError {
    /// Form field the message belongs to
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::EmptyName
            | ValidationError::NameTooLong { .. }
            | ValidationError::DuplicateSource => "name",
            ValidationError::UnknownSourceType(_) => "type",
            ValidationError::SourceNotFound | ValidationError::SourceFull { .. } => "source",
            ValidationError::DuplicateQuote | ValidationError::TextTooShort { .. } => "text",
            ValidationError::InvalidWeight { .. } => "weight",
        }
    }
}

/// True when the sqlx error is a UNIQUE constraint violation
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.is_unique_violation(),
        _ => false,
    }
}
