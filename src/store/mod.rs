//! SQLite persistence. Row functions take the connection (usually an open
//! transaction) explicitly; services decide where transactions begin and end.

pub mod bracket;
pub mod divisions;
pub mod scores;
pub mod teams;

use crate::config::{Config, DbSource};
use crate::models::LeagueError;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Sqlite, SqlitePool, Transaction};
use std::path::Path;
use std::time::Duration;

/// Shared handle to the league database.
#[derive(Clone, Debug)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Open the database described by the config and create missing tables.
    pub async fn open(config: &Config) -> Result<Self, LeagueError> {
        let db = match config.db {
            DbSource::Memory => Self::in_memory().await?,
            DbSource::File => Self::from_file(&config.db_path).await?,
        };
        db.init().await?;
        Ok(db)
    }

    /// A private in-memory database. It lives as long as its single pooled
    /// connection, so that connection never expires.
    pub async fn in_memory() -> Result<Self, LeagueError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None::<Duration>)
            .max_lifetime(None::<Duration>)
            .connect("sqlite::memory:")
            .await?;
        Ok(Self { pool })
    }

    pub async fn from_file(path: &Path) -> Result<Self, LeagueError> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(dir)
                .await
                .map_err(|e| LeagueError::Database(sqlx::Error::Io(e)))?;
        }
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await?;
        log::info!("Opened database at {}", path.display());
        Ok(Self { pool })
    }

    /// Create every table that doesn't exist yet.
    pub async fn init(&self) -> Result<(), LeagueError> {
        let mut conn = self.pool.acquire().await?;
        teams::create_table(&mut conn).await?;
        divisions::create_table(&mut conn).await?;
        scores::create_table(&mut conn).await?;
        bracket::create_table(&mut conn).await?;
        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Start a transaction. It rolls back if dropped without `commit()`.
    pub async fn begin(&self) -> Result<Transaction<'static, Sqlite>, LeagueError> {
        Ok(self.pool.begin().await?)
    }
}
