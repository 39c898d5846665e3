//! `SQLite` backing for the question table.
//!
//! The table is rewritten in one transaction by `seed` and otherwise read once
//! per quiz service, so the pool stays small and WAL runs with
//! `synchronous = NORMAL`.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use sqlx::SqlitePool;
use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
};
use thiserror::Error;

use crate::repository::{QuestionRepository, Storage};

mod mapping;
mod question_store;

const MAX_CONNECTIONS: u32 = 2;
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// The question table in a `SQLite` database, migrated on open.
#[derive(Clone)]
pub struct SqliteQuestionStore {
    pool: SqlitePool,
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SqliteInitError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),
}

impl SqliteQuestionStore {
    /// Open (creating if needed) the database at `database_url` and bring the
    /// question table up to date.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if the URL is invalid, the database cannot be
    /// opened, or a migration fails.
    pub async fn open(database_url: &str) -> Result<Self, SqliteInitError> {
        let options = SqliteConnectOptions::from_str(database_url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(BUSY_TIMEOUT);
        let pool = SqlitePoolOptions::new()
            .max_connections(MAX_CONNECTIONS)
            .acquire_timeout(BUSY_TIMEOUT)
            .connect_with(options)
            .await?;

        let rows = question_store::migrate(&pool).await?;
        log::debug!("opened question store at {database_url} with {rows} questions");
        Ok(Self { pool })
    }

    #[must_use]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl Storage {
    /// Build a `Storage` over the `SQLite` question table.
    ///
    /// # Errors
    ///
    /// Returns `SqliteInitError` if the store cannot be opened.
    pub async fn sqlite(database_url: &str) -> Result<Self, SqliteInitError> {
        let store = SqliteQuestionStore::open(database_url).await?;
        let questions: Arc<dyn QuestionRepository> = Arc::new(store);
        Ok(Self { questions })
    }
}
