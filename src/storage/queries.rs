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


//! Database query functions
//!
//! This module implements repository pattern for database operations.
//!
//! # Query Patterns
//! - Plain async functions per entity type taking the pool
//! - Functions used by multi-step operations (seeding, dashboard stats) take
//!   any executor, so they run on a pool or inside a transaction
//! - Constraint violations come back as `TrackerError::Conflict`
//! - Aggregates group by primary key and break count ties by ascending id,
//!   which is insertion order

use crate::error::Result;
use crate::storage::models::*;
use serde::{Deserialize, Serialize};
use sqlx::{Executor, FromRow, Sqlite, SqlitePool};

// ============================================================================
// AUTHOR QUERIES
// ============================================================================

/// Insert a new author
///
/// Returns the id of the inserted author.
pub async fn insert_author<'e, E>(executor: E, author: &NewAuthor) -> Result<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("INSERT INTO Authors (name, bio) VALUES (?, ?)")
        .bind(&author.name)
        .bind(&author.bio)
        .execute(executor)
        .await?;

    Ok(result.last_insert_rowid())
}

/// Find author by ID
pub async fn find_author_by_id(pool: &SqlitePool, author_id: i64) -> Result<Option<Author>> {
    let author = sqlx::query_as::<_, Author>(
        "SELECT author_id AS id, name, bio FROM Authors WHERE author_id = ?",
    )
    .bind(author_id)
    .fetch_optional(pool)
    .await?;

    Ok(author)
}

/// List all authors in insertion order
pub async fn list_authors(pool: &SqlitePool) -> Result<Vec<Author>> {
    let authors = sqlx::query_as::<_, Author>(
        "SELECT author_id AS id, name, bio FROM Authors ORDER BY author_id",
    )
    .fetch_all(pool)
    .await?;

    Ok(authors)
}

/// Count total authors
pub async fn count_authors<'e, E>(executor: E) -> Result<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM Authors")
        .fetch_one(executor)
        .await?;

    Ok(count)
}

// ============================================================================
// BOOK QUERIES
// ============================================================================

/// Insert a new book
///
/// Fails with `Conflict` when `author_id` does not reference an existing author.
pub async fn insert_book<'e, E>(executor: E, book: &NewBook) -> Result<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("INSERT INTO Books (title, description, author_id) VALUES (?, ?, ?)")
        .bind(&book.title)
        .bind(&book.description)
        .bind(book.author_id)
        .execute(executor)
        .await?;

    Ok(result.last_insert_rowid())
}

/// Find book by ID
pub async fn find_book_by_id<'e, E>(executor: E, book_id: i64) -> Result<Option<Book>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let book = sqlx::query_as::<_, Book>(
        "SELECT book_id AS id, title, description, author_id FROM Books WHERE book_id = ?",
    )
    .bind(book_id)
    .fetch_optional(executor)
    .await?;

    Ok(book)
}

/// Count total books
pub async fn count_books(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM Books")
        .fetch_one(pool)
        .await?;

    Ok(count)
}

/// Flat row behind [`BookDetail`]
#[derive(Debug, FromRow)]
struct BookDetailRow {
    id: i64,
    title: String,
    description: Option<String>,
    author_id: i64,
    author_name: String,
    author_bio: Option<String>,
    reader_count: i64,
}

impl From<BookDetailRow> for BookDetail {
    fn from(row: BookDetailRow) -> Self {
        BookDetail {
            id: row.id,
            title: row.title,
            description: row.description,
            author_id: row.author_id,
            author: Author {
                id: row.author_id,
                name: row.author_name,
                bio: row.author_bio,
            },
            reader_count: row.reader_count,
        }
    }
}

// LEFT JOIN keeps books nobody has read, with a count of 0
const BOOK_DETAIL_SELECT: &str = r#"
    SELECT
        b.book_id AS id,
        b.title,
        b.description,
        b.author_id,
        a.name AS author_name,
        a.bio AS author_bio,
        COUNT(r.reader_id) AS reader_count
    FROM Books b
    INNER JOIN Authors a ON a.author_id = b.author_id
    LEFT JOIN ReadingRecords r ON r.book_id = b.book_id
"#;

/// Find a single book with its author and reader count
pub async fn find_book_detail(pool: &SqlitePool, book_id: i64) -> Result<Option<BookDetail>> {
    let sql = format!("{BOOK_DETAIL_SELECT} WHERE b.book_id = ? GROUP BY b.book_id");
    let row = sqlx::query_as::<_, BookDetailRow>(&sql)
        .bind(book_id)
        .fetch_optional(pool)
        .await?;

    Ok(row.map(BookDetail::from))
}

/// List all books with author and reader counts, in insertion order
pub async fn list_books(pool: &SqlitePool) -> Result<Vec<BookDetail>> {
    let sql = format!("{BOOK_DETAIL_SELECT} GROUP BY b.book_id ORDER BY b.book_id");
    let rows = sqlx::query_as::<_, BookDetailRow>(&sql)
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().map(BookDetail::from).collect())
}

/// List books ranked by reader count, most read first
///
/// Books with equal counts keep insertion order. At most `limit` rows.
pub async fn list_books_by_reader_count(pool: &SqlitePool, limit: i64) -> Result<Vec<BookDetail>> {
    let sql = format!(
        "{BOOK_DETAIL_SELECT} GROUP BY b.book_id ORDER BY reader_count DESC, b.book_id ASC LIMIT ?"
    );
    let rows = sqlx::query_as::<_, BookDetailRow>(&sql)
        .bind(limit)
        .fetch_all(pool)
        .await?;

    Ok(rows.into_iter().map(BookDetail::from).collect())
}

// ============================================================================
// READER QUERIES
// ============================================================================

/// Insert a new reader
///
/// Fails with `Conflict` when the email is already registered.
pub async fn insert_reader<'e, E>(executor: E, reader: &NewReader) -> Result<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("INSERT INTO Readers (name, email) VALUES (?, ?)")
        .bind(&reader.name)
        .bind(&reader.email)
        .execute(executor)
        .await?;

    tracing::debug!(reader_id = result.last_insert_rowid(), "inserted reader");

    Ok(result.last_insert_rowid())
}

/// Find reader by ID
pub async fn find_reader_by_id<'e, E>(executor: E, reader_id: i64) -> Result<Option<Reader>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let reader = sqlx::query_as::<_, Reader>(
        "SELECT reader_id AS id, name, email FROM Readers WHERE reader_id = ?",
    )
    .bind(reader_id)
    .fetch_optional(executor)
    .await?;

    Ok(reader)
}

/// First reader in the store (lowest id)
pub async fn first_reader<'e, E>(executor: E) -> Result<Option<Reader>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let reader = sqlx::query_as::<_, Reader>(
        "SELECT reader_id AS id, name, email FROM Readers ORDER BY reader_id LIMIT 1",
    )
    .fetch_optional(executor)
    .await?;

    Ok(reader)
}

/// Find reader summary (with books count) by ID
pub async fn find_reader_summary(pool: &SqlitePool, reader_id: i64) -> Result<Option<ReaderSummary>> {
    let reader = sqlx::query_as::<_, ReaderSummary>(
        r#"
        SELECT rd.reader_id AS id, rd.name, rd.email, COUNT(r.book_id) AS books_count
        FROM Readers rd
        LEFT JOIN ReadingRecords r ON r.reader_id = rd.reader_id
        WHERE rd.reader_id = ?
        GROUP BY rd.reader_id
        "#,
    )
    .bind(reader_id)
    .fetch_optional(pool)
    .await?;

    Ok(reader)
}

/// List all readers with how many books each has read, in insertion order
pub async fn list_readers(pool: &SqlitePool) -> Result<Vec<ReaderSummary>> {
    let readers = sqlx::query_as::<_, ReaderSummary>(
        r#"
        SELECT rd.reader_id AS id, rd.name, rd.email, COUNT(r.book_id) AS books_count
        FROM Readers rd
        LEFT JOIN ReadingRecords r ON r.reader_id = rd.reader_id
        GROUP BY rd.reader_id
        ORDER BY rd.reader_id
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(readers)
}

/// Count total readers
pub async fn count_readers(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM Readers")
        .fetch_one(pool)
        .await?;

    Ok(count)
}

// ============================================================================
// READING RECORD QUERIES
// ============================================================================

/// Record that a reader has read a book
///
/// Idempotent: returns `true` when a new record was created and `false`
/// when the pair already existed. Unknown reader or book ids fail with
/// `Conflict` (foreign keys are not covered by `OR IGNORE`).
pub async fn record_reading<'e, E>(executor: E, reader_id: i64, book_id: i64) -> Result<bool>
where
    E: Executor<'e, Database = Sqlite>,
{
    let result = sqlx::query("INSERT OR IGNORE INTO ReadingRecords (reader_id, book_id) VALUES (?, ?)")
        .bind(reader_id)
        .bind(book_id)
        .execute(executor)
        .await?;

    Ok(result.rows_affected() == 1)
}

/// Find the reading record for a pair
pub async fn find_reading_record(
    pool: &SqlitePool,
    reader_id: i64,
    book_id: i64,
) -> Result<Option<ReadingRecord>> {
    let record = sqlx::query_as::<_, ReadingRecord>(
        "SELECT reader_id, book_id, read_at FROM ReadingRecords WHERE reader_id = ? AND book_id = ?",
    )
    .bind(reader_id)
    .bind(book_id)
    .fetch_optional(pool)
    .await?;

    Ok(record)
}

/// List a reader's reading records ordered by book id
pub async fn list_reading_records_for_reader(
    pool: &SqlitePool,
    reader_id: i64,
) -> Result<Vec<ReadingRecord>> {
    let records = sqlx::query_as::<_, ReadingRecord>(
        "SELECT reader_id, book_id, read_at FROM ReadingRecords WHERE reader_id = ? ORDER BY book_id",
    )
    .bind(reader_id)
    .fetch_all(pool)
    .await?;

    Ok(records)
}

/// Count reading records belonging to one reader
pub async fn count_reading_records_for_reader<'e, E>(executor: E, reader_id: i64) -> Result<i64>
where
    E: Executor<'e, Database = Sqlite>,
{
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM ReadingRecords WHERE reader_id = ?")
        .bind(reader_id)
        .fetch_one(executor)
        .await?;

    Ok(count)
}

/// Count all reading records
pub async fn count_reading_records(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM ReadingRecords")
        .fetch_one(pool)
        .await?;

    Ok(count)
}

// ============================================================================
// AGGREGATE QUERIES
// ============================================================================

/// Author with an aggregated reading count
///
/// What `total_readers` counts depends on the query that produced it: reading
/// records across all of the author's books, or books by the author read by a
/// single reader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct AuthorStats {
    pub id: i64,
    pub name: String,
    pub total_readers: i64,
}

/// Authors ranked by reading records across all their books
///
/// Authors without books are left out; an author whose books nobody has
/// read still appears with a count of 0. Ties keep insertion order.
pub async fn list_authors_by_reader_count<'e, E>(executor: E, limit: i64) -> Result<Vec<AuthorStats>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let authors = sqlx::query_as::<_, AuthorStats>(
        r#"
        SELECT a.author_id AS id, a.name, COUNT(r.reader_id) AS total_readers
        FROM Authors a
        INNER JOIN Books b ON b.author_id = a.author_id
        LEFT JOIN ReadingRecords r ON r.book_id = b.book_id
        GROUP BY a.author_id
        ORDER BY total_readers DESC, a.author_id ASC
        LIMIT ?
        "#,
    )
    .bind(limit)
    .fetch_all(executor)
    .await?;

    Ok(authors)
}

/// Authors ranked by how many of their books one reader has read
///
/// Only authors with at least one book read by the reader appear.
pub async fn list_reader_authors_by_books_read<'e, E>(
    executor: E,
    reader_id: i64,
    limit: i64,
) -> Result<Vec<AuthorStats>>
where
    E: Executor<'e, Database = Sqlite>,
{
    let authors = sqlx::query_as::<_, AuthorStats>(
        r#"
        SELECT a.author_id AS id, a.name, COUNT(r.book_id) AS total_readers
        FROM ReadingRecords r
        INNER JOIN Books b ON b.book_id = r.book_id
        INNER JOIN Authors a ON a.author_id = b.author_id
        WHERE r.reader_id = ?
        GROUP BY a.author_id
        ORDER BY total_readers DESC, a.author_id ASC
        LIMIT ?
        "#,
    )
    .bind(reader_id)
    .bind(limit)
    .fetch_all(executor)
    .await?;

    Ok(authors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TrackerError;
    use crate::storage::database::Database;

    async fn author_with_books(db: &Database, name: &str, titles: &[&str]) -> (i64, Vec<i64>) {
        let author_id = insert_author(db.pool(), &NewAuthor::new(name))
            .await
            .expect("Failed to insert author");
        let mut book_ids = Vec::new();
        for title in titles {
            let book_id = insert_book(db.pool(), &NewBook::new(*title, author_id))
                .await
                .expect("Failed to insert book");
            book_ids.push(book_id);
        }
        (author_id, book_ids)
    }

    #[tokio::test]
    async fn test_insert_and_find_author() {
        let db = Database::new_in_memory().await.expect("Failed to create database");

        let new_author = NewAuthor::new("Ursula K. Le Guin").with_bio("American author");
        let author_id = insert_author(db.pool(), &new_author)
            .await
            .expect("Failed to insert author");
        assert!(author_id > 0);

        let author = find_author_by_id(db.pool(), author_id)
            .await
            .expect("Failed to find author")
            .expect("Author missing");
        assert_eq!(author.name, "Ursula K. Le Guin");
        assert_eq!(author.bio.as_deref(), Some("American author"));

        assert!(find_author_by_id(db.pool(), 999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_book_requires_existing_author() {
        let db = Database::new_in_memory().await.expect("Failed to create database");

        let err = insert_book(db.pool(), &NewBook::new("Orphan", 42))
            .await
            .expect_err("Insert with unknown author should fail");
        assert!(matches!(err, TrackerError::Conflict(_)), "got {err:?}");
        assert_eq!(count_books(db.pool()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_duplicate_email_conflicts_and_leaves_store_unchanged() {
        let db = Database::new_in_memory().await.expect("Failed to create database");

        insert_reader(db.pool(), &NewReader::new("Alice", "alice@example.com"))
            .await
            .expect("Failed to insert reader");

        let err = insert_reader(db.pool(), &NewReader::new("Alice Again", "alice@example.com"))
            .await
            .expect_err("Duplicate email should fail");
        assert!(matches!(err, TrackerError::Conflict(_)), "got {err:?}");

        let readers = list_readers(db.pool()).await.unwrap();
        assert_eq!(readers.len(), 1);
        assert_eq!(readers[0].name, "Alice");
    }

    #[tokio::test]
    async fn test_record_reading_is_idempotent() {
        let db = Database::new_in_memory().await.expect("Failed to create database");
        let (_, books) = author_with_books(&db, "A", &["B1"]).await;
        let reader_id = insert_reader(db.pool(), &NewReader::new("Alice", "alice@example.com"))
            .await
            .unwrap();

        assert!(record_reading(db.pool(), reader_id, books[0]).await.unwrap());
        assert!(!record_reading(db.pool(), reader_id, books[0]).await.unwrap());

        assert_eq!(count_reading_records(db.pool()).await.unwrap(), 1);
        let record = find_reading_record(db.pool(), reader_id, books[0])
            .await
            .unwrap()
            .expect("Record missing");
        assert_eq!(record.book_id, books[0]);
    }

    #[tokio::test]
    async fn test_record_reading_unknown_book_conflicts() {
        let db = Database::new_in_memory().await.expect("Failed to create database");
        let reader_id = insert_reader(db.pool(), &NewReader::new("Alice", "alice@example.com"))
            .await
            .unwrap();

        let err = record_reading(db.pool(), reader_id, 77)
            .await
            .expect_err("Unknown book should fail");
        assert!(matches!(err, TrackerError::Conflict(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn test_list_books_includes_author_and_counts() {
        let db = Database::new_in_memory().await.expect("Failed to create database");
        let (author_id, books) = author_with_books(&db, "A", &["B1", "B2"]).await;
        let reader_id = insert_reader(db.pool(), &NewReader::new("Alice", "alice@example.com"))
            .await
            .unwrap();
        record_reading(db.pool(), reader_id, books[1]).await.unwrap();

        let listed = list_books(db.pool()).await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].title, "B1");
        assert_eq!(listed[0].reader_count, 0);
        assert_eq!(listed[1].reader_count, 1);
        assert_eq!(listed[1].author.id, author_id);
        assert_eq!(listed[1].author.name, "A");

        let detail = find_book_detail(db.pool(), books[1]).await.unwrap().unwrap();
        assert_eq!(detail, listed[1]);
    }

    #[tokio::test]
    async fn test_list_readers_counts_books() {
        let db = Database::new_in_memory().await.expect("Failed to create database");
        let (_, books) = author_with_books(&db, "A", &["B1", "B2"]).await;
        let alice = insert_reader(db.pool(), &NewReader::new("Alice", "alice@example.com"))
            .await
            .unwrap();
        insert_reader(db.pool(), &NewReader::new("Bob", "bob@example.com"))
            .await
            .unwrap();
        for book_id in &books {
            record_reading(db.pool(), alice, *book_id).await.unwrap();
        }

        let readers = list_readers(db.pool()).await.unwrap();
        assert_eq!(readers.len(), 2);
        assert_eq!(readers[0].books_count, 2);
        assert_eq!(readers[1].books_count, 0);

        let first = first_reader(db.pool()).await.unwrap().unwrap();
        assert_eq!(first.id, alice);

        let records = list_reading_records_for_reader(db.pool(), alice).await.unwrap();
        let book_ids: Vec<i64> = records.iter().map(|r| r.book_id).collect();
        assert_eq!(book_ids, books);
    }

    #[tokio::test]
    async fn test_author_ranking_skips_authors_without_books() {
        let db = Database::new_in_memory().await.expect("Failed to create database");
        author_with_books(&db, "No Books", &[]).await;
        let (_, books) = author_with_books(&db, "Read", &["B1"]).await;
        author_with_books(&db, "Unread", &["B2"]).await;
        let reader_id = insert_reader(db.pool(), &NewReader::new("Alice", "alice@example.com"))
            .await
            .unwrap();
        record_reading(db.pool(), reader_id, books[0]).await.unwrap();

        let ranked = list_authors_by_reader_count(db.pool(), 10).await.unwrap();
        let names: Vec<&str> = ranked.iter().map(|a| a.name.as_str()).collect();
        assert_eq!(names, vec!["Read", "Unread"]);
        assert_eq!(ranked[0].total_readers, 1);
        assert_eq!(ranked[1].total_readers, 0);
    }

    #[tokio::test]
    async fn test_author_ranking_empty_when_no_author_has_books() {
        let db = Database::new_in_memory().await.expect("Failed to create database");
        author_with_books(&db, "Bookless", &[]).await;

        let ranked = list_authors_by_reader_count(db.pool(), 10).await.unwrap();
        assert!(ranked.is_empty(), "got {ranked:?}");
    }

    #[tokio::test]
    async fn test_find_book_by_id() {
        let db = Database::new_in_memory().await.expect("Failed to create database");
        let (author_id, books) = author_with_books(&db, "A", &["B1"]).await;

        let book = find_book_by_id(db.pool(), books[0])
            .await
            .unwrap()
            .expect("Book missing");
        assert_eq!(book.title, "B1");
        assert_eq!(book.author_id, author_id);
        assert!(book.description.is_none());

        assert!(find_book_by_id(db.pool(), 999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_queries_share_a_transaction() {
        let db = Database::new_in_memory().await.expect("Failed to create database");

        let mut tx = db.pool().begin().await.unwrap();
        let author_id = insert_author(&mut *tx, &NewAuthor::new("A")).await.unwrap();
        insert_book(&mut *tx, &NewBook::new("B1", author_id)).await.unwrap();
        assert_eq!(count_authors(&mut *tx).await.unwrap(), 1);
        tx.rollback().await.unwrap();

        assert_eq!(count_authors(db.pool()).await.unwrap(), 0);
        assert_eq!(count_books(db.pool()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_reader_author_ranking_excludes_unread_authors() {
        let db = Database::new_in_memory().await.expect("Failed to create database");
        let (_, read_books) = author_with_books(&db, "Read", &["B1", "B2"]).await;
        author_with_books(&db, "Unread", &["B3"]).await;
        let reader_id = insert_reader(db.pool(), &NewReader::new("Alice", "alice@example.com"))
            .await
            .unwrap();
        for book_id in &read_books {
            record_reading(db.pool(), reader_id, *book_id).await.unwrap();
        }

        let ranked = list_reader_authors_by_books_read(db.pool(), reader_id, 3)
            .await
            .unwrap();
        assert_eq!(ranked.len(), 1);
        assert_eq!(ranked[0].name, "Read");
        assert_eq!(ranked[0].total_readers, 2);
    }
}
