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


//! Server configuration loaded from environment variables.
//!
//! Every setting has a default suitable for local development. Command line
//! flags on `reading-tracker serve` override these values.
//!
//! | Variable                          | Default                                         | Description                          |
//! |-----------------------------------|-------------------------------------------------|--------------------------------------|
//! | `READING_TRACKER_DATABASE`        | `./books.db`                                    | SQLite database file                 |
//! | `READING_TRACKER_BIND`            | `127.0.0.1:8000`                                | HTTP listen address                  |
//! | `READING_TRACKER_LOG_LEVEL`       | `info`                                          | tracing filter (trace/debug/info/...) |
//! | `READING_TRACKER_MAX_CONNECTIONS` | `5`                                             | SQLite pool size                     |
//! | `READING_TRACKER_SEED`            | `true`                                          | Seed sample data into an empty store |
//! | `READING_TRACKER_STATIC_DIR`      | `frontend/build`                                | Built frontend served as fallback    |
//! | `READING_TRACKER_CORS_ORIGINS`    | `http://localhost:3000,http://127.0.0.1:3000`   | Comma-separated allowed origins      |

use std::net::SocketAddr;
use std::path::PathBuf;
use std::str::FromStr;

use crate::storage::database::DEFAULT_MAX_CONNECTIONS;

const DEFAULT_CORS_ORIGINS: &str = "http://localhost:3000,http://127.0.0.1:3000";

/// Runtime configuration for the reading tracker server.
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite database file.
    pub database_path: PathBuf,

    /// HTTP listen address.
    pub bind_addr: SocketAddr,

    /// Tracing filter string, e.g. `"reading_tracker=debug,info"`.
    pub log_level: String,

    /// Maximum pooled SQLite connections.
    pub max_connections: u32,

    /// Insert the sample catalogue when the store is empty.
    pub seed_sample_data: bool,

    /// Directory of static frontend files (ignored when it doesn't exist).
    pub static_dir: Option<PathBuf>,

    /// Origins allowed to make cross-origin requests.
    pub cors_origins: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: PathBuf::from("./books.db"),
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8000)),
            log_level: "info".to_string(),
            max_connections: DEFAULT_MAX_CONNECTIONS,
            seed_sample_data: true,
            static_dir: Some(PathBuf::from("frontend/build")),
            cors_origins: split_list(DEFAULT_CORS_ORIGINS),
        }
    }
}

impl Config {
    /// Load configuration from environment variables, applying defaults where
    /// a variable is absent or unparseable.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            database_path: PathBuf::from(env_str(
                "READING_TRACKER_DATABASE",
                &defaults.database_path.to_string_lossy(),
            )),
            bind_addr:        env_parse("READING_TRACKER_BIND", defaults.bind_addr),
            log_level:        env_str("READING_TRACKER_LOG_LEVEL", &defaults.log_level),
            max_connections:  env_parse("READING_TRACKER_MAX_CONNECTIONS", defaults.max_connections),
            seed_sample_data: env_bool("READING_TRACKER_SEED", defaults.seed_sample_data),
            static_dir:       env_static_dir("READING_TRACKER_STATIC_DIR", defaults.static_dir),
            cors_origins:     split_list(&env_str("READING_TRACKER_CORS_ORIGINS", DEFAULT_CORS_ORIGINS)),
        }
    }
}

// ── helpers ──────────────────────────────────────────────────────────────────

fn env_str(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

fn env_parse<T: FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn env_bool(key: &str, default: bool) -> bool {
    match std::env::var(key) {
        Ok(v) => parse_bool(&v).unwrap_or(default),
        Err(_) => default,
    }
}

// Empty value disables static serving
fn env_static_dir(key: &str, default: Option<PathBuf>) -> Option<PathBuf> {
    match std::env::var(key) {
        Ok(v) if v.trim().is_empty() => None,
        Ok(v) => Some(PathBuf::from(v.trim())),
        Err(_) => default,
    }
}

fn parse_bool(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
