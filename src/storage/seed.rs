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


//! Sample data seeding
//!
//! Populates an empty database with a small demo catalogue: five authors,
//! two books each, five readers and a set of reading records arranged so
//! the first Harry Potter book comes out as the most read.

use crate::error::Result;
use crate::storage::models::{NewAuthor, NewBook, NewReader};
use crate::storage::queries;
use sqlx::SqlitePool;

const AUTHORS: &[(&str, &str)] = &[
    ("J.K. Rowling", "British author, best known for Harry Potter series"),
    ("George R.R. Martin", "American novelist and short story writer"),
    ("Stephen King", "American author of horror, supernatural fiction"),
    ("Agatha Christie", "English writer known for detective novels"),
    ("Isaac Asimov", "American writer and professor of biochemistry"),
];

/// (title, description, index into AUTHORS)
const BOOKS: &[(&str, &str, usize)] = &[
    ("Harry Potter and the Philosopher's Stone", "First book in the Harry Potter series", 0),
    ("Harry Potter and the Chamber of Secrets", "Second book in the Harry Potter series", 0),
    ("A Game of Thrones", "First book in A Song of Ice and Fire series", 1),
    ("A Clash of Kings", "Second book in A Song of Ice and Fire series", 1),
    ("The Shining", "Horror novel about the Overlook Hotel", 2),
    ("It", "Horror novel about a shape-shifting entity", 2),
    ("Murder on the Orient Express", "Classic detective novel featuring Hercule Poirot", 3),
    ("And Then There Were None", "Mystery novel about ten strangers on an island", 3),
    ("Foundation", "Science fiction novel about psychohistory", 4),
    ("I, Robot", "Collection of science fiction short stories", 4),
];

const READERS: &[(&str, &str)] = &[
    ("Alice Johnson", "alice@example.com"),
    ("Bob Smith", "bob@example.com"),
    ("Charlie Brown", "charlie@example.com"),
    ("Diana Prince", "diana@example.com"),
    ("Eve Wilson", "eve@example.com"),
];

/// (index into READERS, index into BOOKS)
const READINGS: &[(usize, usize)] = &[
    // Alice: Harry Potter and Agatha Christie
    (0, 0), (0, 1), (0, 6), (0, 7),
    // Bob: Game of Thrones and Stephen King
    (1, 2), (1, 3), (1, 4), (1, 5),
    // Charlie: Asimov and Harry Potter
    (2, 8), (2, 9), (2, 0),
    // Diana: Rowling and Christie
    (3, 0), (3, 1), (3, 6), (3, 7),
    // Eve: Stephen King and Asimov
    (4, 4), (4, 5), (4, 8), (4, 9),
    // extra reads putting the Philosopher's Stone on top
    (1, 0), (2, 1), (4, 0),
];

/// Seed the sample catalogue if the database has no authors yet
///
/// Returns `true` when data was inserted, `false` when the store already
/// had content and was left alone. All inserts share one transaction, so a
/// failure part way through leaves the store as it was.
pub async fn seed_sample_data(pool: &SqlitePool) -> Result<bool> {
    let mut tx = pool.begin().await?;

    if queries::count_authors(&mut *tx).await? > 0 {
        tracing::debug!("store already populated, skipping sample data");
        return Ok(false);
    }

    let mut author_ids = Vec::with_capacity(AUTHORS.len());
    for (name, bio) in AUTHORS {
        let id = queries::insert_author(&mut *tx, &NewAuthor::new(*name).with_bio(*bio)).await?;
        author_ids.push(id);
    }

    let mut book_ids = Vec::with_capacity(BOOKS.len());
    for (title, description, author) in BOOKS {
        let book = NewBook::new(*title, author_ids[*author]).with_description(*description);
        book_ids.push(queries::insert_book(&mut *tx, &book).await?);
    }

    let mut reader_ids = Vec::with_capacity(READERS.len());
    for (name, email) in READERS {
        reader_ids.push(queries::insert_reader(&mut *tx, &NewReader::new(*name, *email)).await?);
    }

    for (reader, book) in READINGS {
        queries::record_reading(&mut *tx, reader_ids[*reader], book_ids[*book]).await?;
    }

    tx.commit().await?;

    tracing::info!(
        authors = author_ids.len(),
        books = book_ids.len(),
        readers = reader_ids.len(),
        readings = READINGS.len(),
        "seeded sample data"
    );

    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TrackerError;
    use crate::storage::database::Database;

    #[tokio::test]
    async fn test_seed_populates_empty_store() {
        let db = Database::new_in_memory().await.expect("Failed to create database");

        let seeded = seed_sample_data(db.pool()).await.expect("Failed to seed");
        assert!(seeded);

        assert_eq!(queries::count_authors(db.pool()).await.unwrap(), 5);
        assert_eq!(queries::count_books(db.pool()).await.unwrap(), 10);
        assert_eq!(queries::count_readers(db.pool()).await.unwrap(), 5);
        assert_eq!(queries::count_reading_records(db.pool()).await.unwrap(), 22);
    }

    #[tokio::test]
    async fn test_seed_twice_is_noop() {
        let db = Database::new_in_memory().await.expect("Failed to create database");

        assert!(seed_sample_data(db.pool()).await.unwrap());
        assert!(!seed_sample_data(db.pool()).await.unwrap());

        assert_eq!(queries::count_reading_records(db.pool()).await.unwrap(), 22);
    }

    #[tokio::test]
    async fn test_seed_skips_when_authors_exist() {
        let db = Database::new_in_memory().await.expect("Failed to create database");
        queries::insert_author(db.pool(), &NewAuthor::new("Someone"))
            .await
            .unwrap();

        assert!(!seed_sample_data(db.pool()).await.unwrap());
        assert_eq!(queries::count_books(db.pool()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_failed_seed_leaves_store_empty() {
        let db = Database::new_in_memory().await.expect("Failed to create database");
        // Readers are inserted after authors and books, so this email clash
        // fails the seed half way through
        queries::insert_reader(db.pool(), &NewReader::new("Bob", "bob@example.com"))
            .await
            .unwrap();

        let err = seed_sample_data(db.pool())
            .await
            .expect_err("Seeding over a taken email should fail");
        assert!(matches!(err, TrackerError::Conflict(_)), "got {err:?}");

        assert_eq!(queries::count_authors(db.pool()).await.unwrap(), 0);
        assert_eq!(queries::count_books(db.pool()).await.unwrap(), 0);
        assert_eq!(queries::count_readers(db.pool()).await.unwrap(), 1);

        sqlx::query("DELETE FROM Readers")
            .execute(db.pool())
            .await
            .unwrap();
        assert!(seed_sample_data(db.pool()).await.unwrap());
        assert_eq!(queries::count_authors(db.pool()).await.unwrap(), 5);
    }
}
