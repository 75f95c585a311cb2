//! Database models

use crate::error::ValidationError;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use std::fmt;
use std::str::FromStr;

/// Kind of work or person a quote is attributed to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Movie,
    Book,
    Series,
    Game,
    Person,
    Other,
}

impl SourceType {
    /// All types, in the order the forms list them
    pub const ALL: [SourceType; 6] = [
        SourceType::Movie,
        SourceType::Book,
        SourceType::Series,
        SourceType::Game,
        SourceType::Person,
        SourceType::Other,
    ];

    /// Tag stored in the `type` column
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::Movie => "movie",
            SourceType::Book => "book",
            SourceType::Series => "series",
            SourceType::Game => "game",
            SourceType::Person => "person",
            SourceType::Other => "other",
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            SourceType::Movie => "Movie",
            SourceType::Book => "Book",
            SourceType::Series => "Series",
            SourceType::Game => "Game",
            SourceType::Person => "People",
            SourceType::Other => "Other",
        }
    }
}

impl FromStr for SourceType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SourceType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| ValidationError::UnknownSourceType(s.to_string()))
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Source {
    pub id: i64,
    pub name: String,
    pub source_type: SourceType,
    pub created_at: NaiveDateTime,
}

impl Source {
    pub(crate) fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            name: row.try_get("name")?,
            source_type: decode_source_type(row, "type")?,
            created_at: row.try_get("created_at")?,
        })
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.source_type.label(), self.name)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Quote {
    pub id: i64,
    pub text: String,
    pub source_id: i64,
    pub weight: f64,
    pub views: i64,
    pub likes: i64,
    pub dislikes: i64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Quote {
    /// Likes minus dislikes
    pub fn rating(&self) -> i64 {
        self.likes - self.dislikes
    }

    pub(crate) fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            text: row.try_get("text")?,
            source_id: row.try_get("source_id")?,
            weight: row.try_get("weight")?,
            views: row.try_get("views")?,
            likes: row.try_get("likes")?,
            dislikes: row.try_get("dislikes")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }
}

/// Quote joined with the source it is attributed to
#[derive(Debug, Clone, Serialize)]
pub struct QuoteWithSource {
    #[serde(flatten)]
    pub quote: Quote,
    pub source_name: String,
    pub source_type: SourceType,
}

impl QuoteWithSource {
    /// "Type: Name" attribution line
    pub fn attribution(&self) -> String {
        format!("{}: {}", self.source_type.label(), self.source_name)
    }

    pub(crate) fn from_row(row: &SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            quote: Quote::from_row(row)?,
            source_name: row.try_get("source_name")?,
            source_type: decode_source_type(row, "source_type")?,
        })
    }
}

/// Id and weight of one quote, as seen by the selector
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightedQuote {
    pub id: i64,
    pub weight: f64,
}

fn decode_source_type(row: &SqliteRow, column: &str) -> Result<SourceType, sqlx::Error> {
    let raw: String = row.try_get(column)?;
    raw.parse().map_err(|e: ValidationError| sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(e),
    })
}
