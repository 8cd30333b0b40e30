use std::{io, path::Path};

use sqlx::{
    Pool, Sqlite,
    migrate::MigrateError,
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
};
use thiserror::Error;
use tokio::sync::watch;

pub struct Repository {
    pub(in crate::repository) pool: Pool<Sqlite>,
    pub(in crate::repository) changes: watch::Sender<Revision>,
}

#[derive(Debug, Error)]
pub enum CreateRepositoryError {
    #[error("failed to create directory: {0}")]
    Io(#[from] io::Error),

    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("migrate error: {0}")]
    MigrateError(#[from] MigrateError),
}

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("{0} {1} not found")]
    NotFound(String, String),

    #[error("change feed closed")]
    Closed,
}

impl RepositoryError {
    pub(in crate::repository) fn not_found(entity: &str, id: i64) -> Self {
        RepositoryError::NotFound(entity.to_string(), id.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Cards,
    Decks,
    Placements,
}

/// Write counters, one per table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Revision {
    cards: u64,
    decks: u64,
    placements: u64,
}

impl Revision {
    pub fn get(&self, table: Table) -> u64 {
        match table {
            Table::Cards => self.cards,
            Table::Decks => self.decks,
            Table::Placements => self.placements,
        }
    }

    /// True when any of `tables` was written between `earlier` and `self`.
    pub fn changed_since(&self, earlier: &Revision, tables: &[Table]) -> bool {
        tables.iter().any(|t| self.get(*t) != earlier.get(*t))
    }

    fn bump(&mut self, table: Table) {
        match table {
            Table::Cards => self.cards += 1,
            Table::Decks => self.decks += 1,
            Table::Placements => self.placements += 1,
        }
    }
}

impl Repository {
    pub async fn open(path: &Path) -> Result<Repository, CreateRepositoryError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true)
            .foreign_keys(true);
        let pool = SqlitePoolOptions::new().connect_with(options).await?;
        tracing::debug!(path = %path.display(), "opened database");

        Self::with_pool(pool).await
    }

    /// Single-connection in-memory database; the data lives as long as the repository.
    #[cfg(test)]
    pub async fn in_memory() -> Result<Repository, CreateRepositoryError> {
        use std::str::FromStr;

        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        Self::with_pool(pool).await
    }

    async fn with_pool(pool: Pool<Sqlite>) -> Result<Repository, CreateRepositoryError> {
        sqlx::migrate!("./migrations").run(&pool).await?;
        let (changes, _) = watch::channel(Revision::default());
        Ok(Repository { pool, changes })
    }

    pub(in crate::repository) fn touch(&self, tables: &[Table]) {
        self.changes.send_modify(|revision| {
            for table in tables {
                revision.bump(*table);
            }
        });
    }

    pub fn revision(&self) -> Revision {
        *self.changes.borrow()
    }
}
