//! # Quotes Common Library
//!
//! Shared code for the quotes service:
//! - Database initialization, models and queries
//! - Admission rules for new sources and quotes
//! - Weighted quote selection and the vote feedback loop
//! - Per-viewer vote eligibility tokens
//! - Aggregate statistics
//! - Configuration loading

pub mod admission;
pub mod config;
pub mod db;
pub mod eligibility;
pub mod error;
pub mod selector;
pub mod stats;
pub mod voting;
pub mod weight;

pub use db::models::{Quote, QuoteWithSource, Source, SourceType};
pub use eligibility::{EligibilityStore, SessionId};
pub use error::{Error, Result, ValidationError};
pub use voting::VoteKind;
