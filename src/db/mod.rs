//! Storage layer.
//!
//! The rest of the service talks to [`Store`]; which backend sits behind it is
//! decided once at startup.

mod clock;
mod memory;
mod repository;

pub use clock::MonotonicClock;
pub use memory::MemoryStore;
pub use repository::SqliteStore;

use std::path::Path;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::config::{Config, StoreBackend};
use crate::errors::AppError;
use crate::models::{random_verse, ContactSubmission, NewContactSubmission, User, Verse};

/// Persistence contract shared by every backend.
#[async_trait]
pub trait Store: Send + Sync {
    /// Create a user; fails with [`AppError::Conflict`] if the username is taken.
    async fn create_user(&self, username: &str, password: &str) -> Result<User, AppError>;

    async fn get_user(&self, id: &str) -> Result<Option<User>, AppError>;

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, AppError>;

    /// Assign an id and creation time, then append the submission.
    async fn create_contact_submission(
        &self,
        contact: NewContactSubmission,
    ) -> Result<ContactSubmission, AppError>;

    /// All stored submissions, oldest first.
    async fn list_contact_submissions(&self) -> Result<Vec<ContactSubmission>, AppError>;

    /// One verse drawn uniformly from the fixed catalog.
    fn random_verse(&self) -> Verse {
        random_verse()
    }
}

/// Build the store selected in `config`.
pub async fn open_store(config: &Config) -> Result<Arc<dyn Store>, AppError> {
    match config.store {
        StoreBackend::Memory => Ok(Arc::new(MemoryStore::new())),
        StoreBackend::Sqlite => {
            let pool = init_database(&config.db_path).await?;
            Ok(Arc::new(SqliteStore::new(pool)))
        }
    }
}

/// Initialize the database connection pool and run migrations.
pub async fn init_database(db_path: &Path) -> Result<SqlitePool, sqlx::Error> {
    // Ensure the parent directory exists
    if let Some(parent) = db_path.parent() {
        if let Err(e) = tokio::fs::create_dir_all(parent).await {
            tracing::error!("Failed to create database directory {:?}: {}", parent, e);
            return Err(sqlx::Error::Io(e));
        }
    }

    let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

    let options = SqliteConnectOptions::from_str(&db_url)?
        .create_if_missing(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    run_migrations(&pool).await?;

    Ok(pool)
}

/// Run database migrations.
async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            username TEXT NOT NULL UNIQUE,
            password TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS contact_submissions (
            id TEXT PRIMARY KEY,
            first_name TEXT NOT NULL,
            last_name TEXT NOT NULL,
            email TEXT NOT NULL,
            phone TEXT NOT NULL,
            interest TEXT NOT NULL,
            message TEXT,
            newsletter INTEGER NOT NULL DEFAULT 0,
            volunteer INTEGER NOT NULL DEFAULT 0,
            volunteer_areas TEXT NOT NULL DEFAULT '[]',
            created_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_contact_submissions_created_at ON contact_submissions(created_at);
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_init_creates_missing_parent_dirs() {
        let dir = TempDir::new().unwrap();
        let db_path = dir.path().join("nested").join("data").join("site.sqlite");

        init_database(&db_path).await.unwrap();
        assert!(db_path.exists());
    }

    #[tokio::test]
    async fn test_unusable_parent_dir_is_io_error() {
        let dir = TempDir::new().unwrap();
        // A regular file where the directory should be
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"").unwrap();

        let err = init_database(&blocker.join("site.sqlite")).await.unwrap_err();
        assert!(matches!(err, sqlx::Error::Io(_)));
    }
}
