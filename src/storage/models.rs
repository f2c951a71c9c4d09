//! Database models for the reading tracker
//!
//! Row types read from SQLite, insert payloads accepted from API callers,
//! and the enriched shapes returned by list endpoints.
//!
//! # SQLite Adaptations
//! - Primary keys are `<entity>_id` columns, aliased to `id` when selected
//! - DateTime stored as TEXT (`CURRENT_TIMESTAMP` format)
//! - The Book <-> Reader many-to-many relationship uses the `ReadingRecords`
//!   junction table; neither side owns the other

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

// ============================================================================
// MAIN ENTITIES
// ============================================================================

/// Author entity
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Author {
    pub id: i64,
    pub name: String,
    #[sqlx(default)]
    pub bio: Option<String>,
}

/// Book entity as stored
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Book {
    pub id: i64,
    pub title: String,
    #[sqlx(default)]
    pub description: Option<String>,
    pub author_id: i64,
}

/// Reader entity
///
/// `email` is unique across all readers.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct Reader {
    pub id: i64,
    pub name: String,
    pub email: String,
}

/// ReadingRecord - "this reader has read this book"
///
/// At most one record exists per (reader_id, book_id) pair.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct ReadingRecord {
    pub reader_id: i64,
    pub book_id: i64,
    pub read_at: DateTime<Utc>,
}

// ============================================================================
// ENRICHED VIEWS
// ============================================================================

/// Book with its author and the number of readers who read it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookDetail {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub author_id: i64,
    pub author: Author,
    pub reader_count: i64,
}

/// Reader with the number of books they read
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize, Deserialize)]
pub struct ReaderSummary {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub books_count: i64,
}

// ============================================================================
// INSERT MODELS (for creating new records)
// ============================================================================

/// New author for insertion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAuthor {
    pub name: String,
    #[serde(default)]
    pub bio: Option<String>,
}

impl NewAuthor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            bio: None,
        }
    }

    pub fn with_bio(mut self, bio: impl Into<String>) -> Self {
        self.bio = Some(bio.into());
        self
    }
}

/// New book for insertion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewBook {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    pub author_id: i64,
}

impl NewBook {
    pub fn new(title: impl Into<String>, author_id: i64) -> Self {
        Self {
            title: title.into(),
            description: None,
            author_id,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// New reader for insertion
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewReader {
    pub name: String,
    pub email: String,
}

impl NewReader {
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_author_optional_bio() {
        let author: NewAuthor = serde_json::from_str(r#"{"name": "Octavia E. Butler"}"#)
            .expect("bio should be optional");
        assert_eq!(author.name, "Octavia E. Butler");
        assert!(author.bio.is_none());
    }

    #[test]
    fn test_new_book_requires_author_id() {
        let result: Result<NewBook, _> = serde_json::from_str(r#"{"title": "Kindred"}"#);
        assert!(result.is_err());

        let result: Result<NewBook, _> =
            serde_json::from_str(r#"{"title": "Kindred", "author_id": "one"}"#);
        assert!(result.is_err(), "author_id must be an integer");
    }

    #[test]
    fn test_book_detail_shape() {
        let detail = BookDetail {
            id: 2,
            title: "Dawn".to_string(),
            description: None,
            author_id: 1,
            author: Author {
                id: 1,
                name: "Octavia E. Butler".to_string(),
                bio: None,
            },
            reader_count: 3,
        };

        let value = serde_json::to_value(&detail).expect("serialize");
        assert_eq!(value["author"]["name"], "Octavia E. Butler");
        assert_eq!(value["reader_count"], 3);
        assert!(value["description"].is_null());
    }
}
