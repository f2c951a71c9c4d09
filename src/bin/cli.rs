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


use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use reading_tracker::storage::{seed, Database};
use reading_tracker::{api, stats, Config};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "reading-tracker")]
#[command(about = "Book, author and reader tracking service", long_about = None)]
struct Cli {
    /// SQLite database file (overrides READING_TRACKER_DATABASE)
    #[arg(short, long, global = true)]
    database: Option<PathBuf>,

    /// Tracing filter (overrides READING_TRACKER_LOG_LEVEL)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API
    Serve {
        /// Listen address (overrides READING_TRACKER_BIND)
        #[arg(short, long)]
        bind: Option<SocketAddr>,
        /// Don't insert sample data into an empty database
        #[arg(long)]
        no_seed: bool,
        /// Directory of the built frontend to serve
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },
    /// Insert the sample catalogue if the database is empty
    Seed,
    /// Print the most read books as JSON
    Popular {
        #[arg(short, long, default_value_t = stats::DEFAULT_POPULAR_LIMIT)]
        limit: i64,
    },
    /// Print dashboard statistics as JSON
    Dashboard {
        /// Reader to compute the dashboard for (defaults to the first reader)
        #[arg(short, long)]
        reader_id: Option<i64>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = Config::from_env();
    if let Some(database) = cli.database {
        config.database_path = database;
    }
    if let Some(log_level) = cli.log_level {
        config.log_level = log_level;
    }

    let filter = EnvFilter::try_new(&config.log_level).unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter).with_target(false).init();

    let db = Database::with_max_connections(&config.database_path, config.max_connections)
        .await
        .with_context(|| format!("failed to open database {}", config.database_path.display()))?;

    match cli.command {
        Commands::Serve {
            bind,
            no_seed,
            static_dir,
        } => {
            if let Some(bind) = bind {
                config.bind_addr = bind;
            }
            if no_seed {
                config.seed_sample_data = false;
            }
            if static_dir.is_some() {
                config.static_dir = static_dir;
            }

            tracing::info!(
                database = %config.database_path.display(),
                bind = %config.bind_addr,
                seed = config.seed_sample_data,
                "starting reading tracker"
            );

            if config.seed_sample_data {
                seed::seed_sample_data(db.pool())
                    .await
                    .context("failed to seed sample data")?;
            }

            api::serve(db, &config).await.context("server error")?;
        }
        Commands::Seed => {
            let seeded = seed::seed_sample_data(db.pool()).await?;
            if seeded {
                println!("Sample data inserted");
            } else {
                println!("Database already has data, nothing inserted");
            }
            db.close().await?;
        }
        Commands::Popular { limit } => {
            let books = stats::popular_books(db.pool(), limit).await?;
            println!("{}", serde_json::to_string_pretty(&books)?);
            db.close().await?;
        }
        Commands::Dashboard { reader_id } => {
            let dashboard = stats::dashboard_stats(db.pool(), reader_id).await?;
            println!("{}", serde_json::to_string_pretty(&dashboard)?);
            db.close().await?;
        }
    }

    Ok(())
}
