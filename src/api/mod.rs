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


//! HTTP API
//!
//! axum router exposing entity CRUD and the reading statistics.
//!
//! ## Routes
//!
//! - `GET  /`                               → service banner
//! - `GET  /health`                         → liveness check with entity counts
//! - `GET  /books/popular?limit=N`          → books ranked by reader count
//! - `GET  /dashboard/stats[?reader_id=N]`  → dashboard figures for a reader
//! - `GET  /authors/`, `POST /authors/`     → list / create authors
//! - `GET  /books/`, `POST /books/`         → list / create books
//! - `GET  /readers/`, `POST /readers/`     → list / create readers
//! - `GET  /readers/:id/books`              → a reader's reading records
//! - `POST /readers/:id/books/:book_id`     → record a reading (idempotent)
//!
//! Collection routes answer with and without the trailing slash.
//!
//! ## Example
//!
//! ```no_run
//! use reading_tracker::api::{self, AppState};
//! use reading_tracker::storage::Database;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let db = Database::new("./books.db").await?;
//! let app = api::router(AppState::new(db));
//! let listener = tokio::net::TcpListener::bind("127.0.0.1:8000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod handlers;

use axum::http::HeaderValue;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::error::Result;
use crate::storage::Database;

/// Shared handler state
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
}

impl AppState {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

/// Build the API router without middleware
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health))
        .route("/books/popular", get(handlers::popular_books))
        .route("/dashboard/stats", get(handlers::dashboard_stats))
        .route("/authors", get(handlers::list_authors).post(handlers::create_author))
        .route("/authors/", get(handlers::list_authors).post(handlers::create_author))
        .route("/books", get(handlers::list_books).post(handlers::create_book))
        .route("/books/", get(handlers::list_books).post(handlers::create_book))
        .route("/readers", get(handlers::list_readers).post(handlers::create_reader))
        .route("/readers/", get(handlers::list_readers).post(handlers::create_reader))
        .route("/readers/:reader_id/books", get(handlers::list_reader_books))
        .route("/readers/:reader_id/books/:book_id", post(handlers::record_reading))
        .with_state(state)
}

/// Build the full application: router plus CORS, request tracing and the
/// static frontend fallback
pub fn app(state: AppState, config: &Config) -> Router {
    let mut app = router(state);

    if let Some(dir) = config.static_dir.as_ref().filter(|dir| dir.is_dir()) {
        tracing::info!(dir = %dir.display(), "serving static frontend");
        app = app.fallback_service(ServeDir::new(dir));
    }

    app.layer(cors_layer(&config.cors_origins))
        .layer(TraceLayer::new_for_http())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(%origin, error = %e, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Serve the application until Ctrl-C
pub async fn serve(db: Database, config: &Config) -> Result<()> {
    let app = app(AppState::new(db.clone()), config);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;

    tracing::info!(addr = %listener.local_addr()?, "reading tracker listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("shutting down");
    db.close().await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
    }
}
