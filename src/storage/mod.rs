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


//! Database storage and models
//!
//! This module handles all database operations using SQLite via sqlx.
//!
//! # Database Schema
//! - Authors: name and optional bio
//! - Books: title, optional description, owning author
//! - Readers: name and unique email
//! - ReadingRecords: Reader <-> Book junction table
//!
//! # Usage Example
//! ```no_run
//! use reading_tracker::storage::{Database, queries, models::NewAuthor};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::new("./books.db").await?;
//!
//! let author_id = queries::insert_author(db.pool(), &NewAuthor::new("Frank Herbert")).await?;
//! let author = queries::find_author_by_id(db.pool(), author_id).await?;
//! # Ok(())
//! # }
//! ```

pub mod database;
pub mod migrations;
pub mod models;
pub mod queries;
pub mod seed;

// Re-export commonly used types
pub use database::Database;
pub use models::{
    Author, Book, BookDetail, NewAuthor, NewBook, NewReader, Reader, ReaderSummary,
    ReadingRecord,
};
pub use queries::AuthorStats;
