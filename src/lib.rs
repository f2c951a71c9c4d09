//! Reading tracker
//!
//! Tracks books, authors and readers in SQLite and serves them over a small
//! JSON API, along with popularity statistics computed from who read what.
//!
//! - [`storage`] - database, schema, row models and queries
//! - [`stats`] - popular books and per-reader dashboard figures
//! - [`api`] - axum router and server
//! - [`config`] - environment-driven settings

pub mod api;
pub mod config;
pub mod error;
pub mod stats;
pub mod storage;

pub use config::Config;
pub use error::{Result, TrackerError};
pub use storage::Database;
