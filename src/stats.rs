// Reading Tracker - Book, author and reader tracking service
// Copyright (C) 2025 Reading Tracker contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.


//! Reading statistics
//!
//! Read-only aggregate views over the store:
//! - popular books, ranked by how many readers read each one
//! - dashboard figures for one reader: the globally most read author, how
//!   many books the reader has read, and the reader's top authors
//!
//! Popular books count every book, even with zero readers. The most read
//! author is picked among authors that have at least one book. A reader's
//! top authors only include authors the reader has actually read. Equal
//! counts are ordered by ascending id.

use crate::error::{Result, TrackerError};
use crate::storage::models::{Author, BookDetail, Reader};
use crate::storage::queries::{self, AuthorStats};
use serde::{Deserialize, Serialize};
use sqlx::{Executor, Sqlite, SqliteConnection, SqlitePool};

/// Number of popular books returned when the caller gives no limit
pub const DEFAULT_POPULAR_LIMIT: i64 = 10;

/// Number of authors in a reader's top-authors list
pub const TOP_AUTHORS_LIMIT: i64 = 3;

/// One row of the popular books ranking
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PopularBook {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub author: Author,
    pub reader_count: i64,
}

impl From<BookDetail> for PopularBook {
    fn from(book: BookDetail) -> Self {
        PopularBook {
            id: book.id,
            title: book.title,
            description: book.description,
            author: book.author,
            reader_count: book.reader_count,
        }
    }
}

/// Dashboard figures for one reader
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DashboardStats {
    pub most_popular_author: AuthorStats,
    pub user_books_read: i64,
    pub user_top_authors: Vec<AuthorStats>,
}

impl AuthorStats {
    /// Placeholder returned when no author has a book
    pub fn no_data() -> Self {
        AuthorStats {
            id: 0,
            name: "No data".to_string(),
            total_readers: 0,
        }
    }
}

/// Books ranked by reader count, at most `limit` of them
///
/// # Errors
/// `Validation` when `limit` is negative.
pub async fn popular_books(pool: &SqlitePool, limit: i64) -> Result<Vec<PopularBook>> {
    if limit < 0 {
        return Err(TrackerError::validation(format!(
            "limit must not be negative, got {}",
            limit
        )));
    }

    let books = queries::list_books_by_reader_count(pool, limit).await?;

    Ok(books.into_iter().map(PopularBook::from).collect())
}

/// Resolve the reader the dashboard is computed for
///
/// An explicit id must exist. Without one, the first reader in the store is
/// used.
pub async fn resolve_reader<'e, E>(executor: E, reader_id: Option<i64>) -> Result<Reader>
where
    E: Executor<'e, Database = Sqlite>,
{
    match reader_id {
        Some(id) => queries::find_reader_by_id(executor, id)
            .await?
            .ok_or_else(|| TrackerError::not_found(format!("Reader {} not found", id))),
        None => queries::first_reader(executor)
            .await?
            .ok_or_else(|| TrackerError::not_found("No users found")),
    }
}

/// Dashboard statistics for a reader (the first reader when `reader_id` is `None`)
///
/// All figures are read inside one transaction, so they describe the same
/// state of the store.
///
/// # Errors
/// `NotFound` when the store has no readers, or the given reader does not exist.
pub async fn dashboard_stats(pool: &SqlitePool, reader_id: Option<i64>) -> Result<DashboardStats> {
    let mut tx = pool.begin().await?;
    let stats = dashboard_stats_on(&mut *tx, reader_id).await?;
    tx.commit().await?;

    Ok(stats)
}

/// Dashboard statistics computed on a single connection
pub async fn dashboard_stats_on(
    conn: &mut SqliteConnection,
    reader_id: Option<i64>,
) -> Result<DashboardStats> {
    let reader = resolve_reader(&mut *conn, reader_id).await?;

    let most_popular_author = queries::list_authors_by_reader_count(&mut *conn, 1)
        .await?
        .into_iter()
        .next()
        .unwrap_or_else(AuthorStats::no_data);

    let user_books_read = queries::count_reading_records_for_reader(&mut *conn, reader.id).await?;

    let user_top_authors =
        queries::list_reader_authors_by_books_read(&mut *conn, reader.id, TOP_AUTHORS_LIMIT)
            .await?;

    tracing::debug!(
        reader_id = reader.id,
        user_books_read,
        top_authors = user_top_authors.len(),
        "computed dashboard stats"
    );

    Ok(DashboardStats {
        most_popular_author,
        user_books_read,
        user_top_authors,
    })
}
