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


//! Request handlers
//!
//! Each handler validates its input through the typed extractors, calls one
//! storage or statistics function, and returns JSON. Extractor rejections are
//! taken as `Result` so they surface as `TrackerError::Validation` instead of
//! axum's plain-text responses.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use super::AppState;
use crate::error::{Result, TrackerError};
use crate::stats::{self, DashboardStats, PopularBook, DEFAULT_POPULAR_LIMIT};
use crate::storage::models::{
    Author, BookDetail, NewAuthor, NewBook, NewReader, ReaderSummary, ReadingRecord,
};
use crate::storage::queries;

// ── Service ──────────────────────────────────────────────────────────────────

/// `GET /`
pub async fn root() -> Json<Value> {
    Json(json!({ "message": "Book Reading App API", "status": "active" }))
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub authors: i64,
    pub books: i64,
    pub readers: i64,
}

/// `GET /health`
pub async fn health(State(state): State<AppState>) -> Result<Json<HealthResponse>> {
    let pool = state.db.pool();
    Ok(Json(HealthResponse {
        ok: true,
        authors: queries::count_authors(pool).await?,
        books: queries::count_books(pool).await?,
        readers: queries::count_readers(pool).await?,
    }))
}

// ── Statistics ───────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct PopularParams {
    pub limit: Option<i64>,
}

/// `GET /books/popular?limit=N`
pub async fn popular_books(
    State(state): State<AppState>,
    params: std::result::Result<Query<PopularParams>, QueryRejection>,
) -> Result<Json<Vec<PopularBook>>> {
    let Query(params) = params?;
    let limit = params.limit.unwrap_or(DEFAULT_POPULAR_LIMIT);
    let books = stats::popular_books(state.db.pool(), limit).await?;
    Ok(Json(books))
}

#[derive(Debug, Deserialize)]
pub struct DashboardParams {
    pub reader_id: Option<i64>,
}

/// `GET /dashboard/stats[?reader_id=N]`
pub async fn dashboard_stats(
    State(state): State<AppState>,
    params: std::result::Result<Query<DashboardParams>, QueryRejection>,
) -> Result<Json<DashboardStats>> {
    let Query(params) = params?;
    let stats = stats::dashboard_stats(state.db.pool(), params.reader_id).await?;
    Ok(Json(stats))
}

// ── Authors ──────────────────────────────────────────────────────────────────

/// `GET /authors/`
pub async fn list_authors(State(state): State<AppState>) -> Result<Json<Vec<Author>>> {
    Ok(Json(queries::list_authors(state.db.pool()).await?))
}

/// `POST /authors/`
pub async fn create_author(
    State(state): State<AppState>,
    body: std::result::Result<Json<NewAuthor>, JsonRejection>,
) -> Result<Json<Author>> {
    let Json(new_author) = body?;
    let pool = state.db.pool();

    let author_id = queries::insert_author(pool, &new_author).await?;
    let author = queries::find_author_by_id(pool, author_id)
        .await?
        .ok_or_else(|| TrackerError::internal(format!("author {} vanished after insert", author_id)))?;

    tracing::info!(author_id, "created author");
    Ok(Json(author))
}

// ── Books ────────────────────────────────────────────────────────────────────

/// `GET /books/`
pub async fn list_books(State(state): State<AppState>) -> Result<Json<Vec<BookDetail>>> {
    Ok(Json(queries::list_books(state.db.pool()).await?))
}

/// `POST /books/`
pub async fn create_book(
    State(state): State<AppState>,
    body: std::result::Result<Json<NewBook>, JsonRejection>,
) -> Result<Json<BookDetail>> {
    let Json(new_book) = body?;
    let pool = state.db.pool();

    let book_id = queries::insert_book(pool, &new_book).await?;
    let book = queries::find_book_detail(pool, book_id)
        .await?
        .ok_or_else(|| TrackerError::internal(format!("book {} vanished after insert", book_id)))?;

    tracing::info!(book_id, author_id = book.author_id, "created book");
    Ok(Json(book))
}

// ── Readers ──────────────────────────────────────────────────────────────────

/// `GET /readers/`
pub async fn list_readers(State(state): State<AppState>) -> Result<Json<Vec<ReaderSummary>>> {
    Ok(Json(queries::list_readers(state.db.pool()).await?))
}

/// `POST /readers/`
pub async fn create_reader(
    State(state): State<AppState>,
    body: std::result::Result<Json<NewReader>, JsonRejection>,
) -> Result<Json<ReaderSummary>> {
    let Json(new_reader) = body?;
    let pool = state.db.pool();

    let reader_id = queries::insert_reader(pool, &new_reader).await?;
    let reader = queries::find_reader_summary(pool, reader_id)
        .await?
        .ok_or_else(|| TrackerError::internal(format!("reader {} vanished after insert", reader_id)))?;

    tracing::info!(reader_id, "created reader");
    Ok(Json(reader))
}

/// `GET /readers/:reader_id/books`
pub async fn list_reader_books(
    State(state): State<AppState>,
    reader_id: std::result::Result<Path<i64>, PathRejection>,
) -> Result<Json<Vec<ReadingRecord>>> {
    let Path(reader_id) = reader_id?;
    let pool = state.db.pool();

    if queries::find_reader_by_id(pool, reader_id).await?.is_none() {
        return Err(TrackerError::not_found(format!("Reader {} not found", reader_id)));
    }

    Ok(Json(queries::list_reading_records_for_reader(pool, reader_id).await?))
}

/// `POST /readers/:reader_id/books/:book_id`
///
/// Recording the same pair again returns the existing record. Unknown
/// reader or book ids are 404.
pub async fn record_reading(
    State(state): State<AppState>,
    ids: std::result::Result<Path<(i64, i64)>, PathRejection>,
) -> Result<Json<ReadingRecord>> {
    let Path((reader_id, book_id)) = ids?;
    let pool = state.db.pool();

    if queries::find_reader_by_id(pool, reader_id).await?.is_none() {
        return Err(TrackerError::not_found(format!("Reader {} not found", reader_id)));
    }
    if queries::find_book_by_id(pool, book_id).await?.is_none() {
        return Err(TrackerError::not_found(format!("Book {} not found", book_id)));
    }

    let created = queries::record_reading(pool, reader_id, book_id).await?;
    let record = queries::find_reading_record(pool, reader_id, book_id)
        .await?
        .ok_or_else(|| {
            TrackerError::internal(format!(
                "reading record ({}, {}) vanished after insert",
                reader_id, book_id
            ))
        })?;

    tracing::info!(reader_id, book_id, created, "recorded reading");
    Ok(Json(record))
}
