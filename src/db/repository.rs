//! SQLite-backed store.
//!
//! Uses prepared statements; every operation is a single statement or a
//! check followed by an insert guarded by the table's UNIQUE constraint.

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::{Row, SqlitePool};

use super::{MonotonicClock, Store};
use crate::errors::AppError;
use crate::models::{ContactSubmission, Interest, NewContactSubmission, User};

/// Store persisting users and submissions to SQLite.
pub struct SqliteStore {
    pool: SqlitePool,
    clock: MonotonicClock,
}

impl SqliteStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self {
            pool,
            clock: MonotonicClock::new(),
        }
    }
}

#[async_trait]
impl Store for SqliteStore {
    // ==================== USER OPERATIONS ====================

    async fn create_user(&self, username: &str, password: &str) -> Result<User, AppError> {
        if self.get_user_by_username(username).await?.is_some() {
            return Err(AppError::Conflict(format!(
                "Username {} already exists",
                username
            )));
        }

        let id = uuid::Uuid::new_v4().to_string();

        // A concurrent insert that slips past the check trips the UNIQUE constraint,
        // which `From<sqlx::Error>` turns into a conflict as well.
        sqlx::query("INSERT INTO users (id, username, password) VALUES (?, ?, ?)")
            .bind(&id)
            .bind(username)
            .bind(password)
            .execute(&self.pool)
            .await?;

        tracing::debug!(user_id = %id, "user created");

        Ok(User {
            id,
            username: username.to_string(),
            password: password.to_string(),
        })
    }

    async fn get_user(&self, id: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query("SELECT id, username, password FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(user_from_row))
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        let row = sqlx::query("SELECT id, username, password FROM users WHERE username = ?")
            .bind(username)
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.as_ref().map(user_from_row))
    }

    // ==================== CONTACT OPERATIONS ====================

    async fn create_contact_submission(
        &self,
        contact: NewContactSubmission,
    ) -> Result<ContactSubmission, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let created_at = self.clock.now();
        let areas_json = serde_json::to_string(&contact.volunteer_areas)?;

        sqlx::query(
            r#"INSERT INTO contact_submissions
                (id, first_name, last_name, email, phone, interest, message,
                 newsletter, volunteer, volunteer_areas, created_at)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&id)
        .bind(&contact.first_name)
        .bind(&contact.last_name)
        .bind(&contact.email)
        .bind(&contact.phone)
        .bind(contact.interest.as_str())
        .bind(&contact.message)
        .bind(contact.newsletter as i32)
        .bind(contact.volunteer as i32)
        .bind(&areas_json)
        .bind(format_timestamp(&created_at))
        .execute(&self.pool)
        .await?;

        tracing::debug!(submission_id = %id, "contact submission inserted");

        Ok(ContactSubmission::from_new(id, created_at, contact))
    }

    async fn list_contact_submissions(&self) -> Result<Vec<ContactSubmission>, AppError> {
        let rows = sqlx::query(
            r#"SELECT id, first_name, last_name, email, phone, interest, message,
                      newsletter, volunteer, volunteer_areas, created_at
               FROM contact_submissions ORDER BY rowid"#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(contact_from_row).collect()
    }
}

// Helper functions for row conversion

fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(s: &str) -> Result<DateTime<Utc>, AppError> {
    DateTime::parse_from_rfc3339(s)
        .map(|ts| ts.with_timezone(&Utc))
        .map_err(|e| AppError::Database(format!("Invalid created_at {:?}: {}", s, e)))
}

fn user_from_row(row: &sqlx::sqlite::SqliteRow) -> User {
    User {
        id: row.get("id"),
        username: row.get("username"),
        password: row.get("password"),
    }
}

fn contact_from_row(row: &sqlx::sqlite::SqliteRow) -> Result<ContactSubmission, AppError> {
    let newsletter: i32 = row.get("newsletter");
    let volunteer: i32 = row.get("volunteer");
    let interest_str: String = row.get("interest");
    let areas_str: String = row.get("volunteer_areas");
    let created_at_str: String = row.get("created_at");

    let interest = Interest::parse(&interest_str)
        .ok_or_else(|| AppError::Database(format!("Unknown interest {:?}", interest_str)))?;

    Ok(ContactSubmission {
        id: row.get("id"),
        first_name: row.get("first_name"),
        last_name: row.get("last_name"),
        email: row.get("email"),
        phone: row.get("phone"),
        interest,
        message: row.get("message"),
        newsletter: newsletter != 0,
        volunteer: volunteer != 0,
        volunteer_areas: parse_json_array(&areas_str)?,
        created_at: parse_timestamp(&created_at_str)?,
    })
}

fn parse_json_array(s: &str) -> Result<Vec<String>, AppError> {
    serde_json::from_str(s)
        .map_err(|e| AppError::Database(format!("Invalid volunteer_areas {:?}: {}", s, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::init_database;
    use std::collections::HashSet;
    use tempfile::TempDir;

    async fn open(dir: &TempDir) -> SqliteStore {
        let pool = init_database(&dir.path().join("test.sqlite"))
            .await
            .expect("Failed to init DB");
        SqliteStore::new(pool)
    }

    fn sample_contact() -> NewContactSubmission {
        NewContactSubmission {
            first_name: "Jean".to_string(),
            last_name: "Dupont".to_string(),
            email: "jean@example.fr".to_string(),
            phone: "0612345678".to_string(),
            interest: Interest::Volunteer,
            message: None,
            newsletter: false,
            volunteer: true,
            volunteer_areas: vec!["accueil".to_string(), "louange".to_string()],
        }
    }

    #[tokio::test]
    async fn test_duplicate_username_conflicts() {
        let dir = TempDir::new().unwrap();
        let store = open(&dir).await;

        store.create_user("alice", "pw1").await.unwrap();
        let err = store.create_user("alice", "pw2").await.unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));

        let count: i64 = sqlx::query("SELECT COUNT(*) AS n FROM users WHERE username = 'alice'")
            .fetch_one(&store.pool)
            .await
            .unwrap()
            .get("n");
        assert_eq!(count, 1);
        let kept = store.get_user_by_username("alice").await.unwrap().unwrap();
        assert_eq!(kept.password, "pw1");
    }

    #[tokio::test]
    async fn test_unique_constraint_maps_to_conflict() {
        let dir = TempDir::new().unwrap();
        let store = open(&dir).await;
        store.create_user("alice", "pw1").await.unwrap();

        // Bypass the pre-check to hit the constraint directly.
        let err: AppError =
            sqlx::query("INSERT INTO users (id, username, password) VALUES ('x', 'alice', 'pw')")
                .execute(&store.pool)
                .await
                .unwrap_err()
                .into();
        assert!(matches!(err, AppError::Conflict(_)));
    }

    #[tokio::test]
    async fn test_user_lookups() {
        let dir = TempDir::new().unwrap();
        let store = open(&dir).await;
        let user = store.create_user("pasteur", "secret").await.unwrap();

        assert_eq!(store.get_user(&user.id).await.unwrap(), Some(user.clone()));
        assert_eq!(store.get_user("missing").await.unwrap(), None);
        assert_eq!(store.get_user_by_username("nobody").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_submission_round_trips() {
        let dir = TempDir::new().unwrap();
        let store = open(&dir).await;

        let stored = store.create_contact_submission(sample_contact()).await.unwrap();
        let listed = store.list_contact_submissions().await.unwrap();

        assert_eq!(listed, vec![stored]);
        assert_eq!(listed[0].volunteer_areas, vec!["accueil", "louange"]);
        assert_eq!(listed[0].message, None);
    }

    #[tokio::test]
    async fn test_list_order_ids_and_stamps() {
        let dir = TempDir::new().unwrap();
        let store = open(&dir).await;

        let mut created = Vec::new();
        for _ in 0..10 {
            created.push(store.create_contact_submission(sample_contact()).await.unwrap());
        }

        let listed = store.list_contact_submissions().await.unwrap();
        assert_eq!(listed, created);
        assert_eq!(store.list_contact_submissions().await.unwrap(), listed);

        let ids: HashSet<_> = listed.iter().map(|s| s.id.as_str()).collect();
        assert_eq!(ids.len(), listed.len());
        assert!(listed.windows(2).all(|w| w[0].created_at <= w[1].created_at));
    }

    #[tokio::test]
    async fn test_data_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let stored = {
            let store = open(&dir).await;
            store.create_user("diacre", "pw").await.unwrap();
            let stored = store.create_contact_submission(sample_contact()).await.unwrap();
            store.pool.close().await;
            stored
        };

        let reopened = open(&dir).await;
        assert!(reopened.get_user_by_username("diacre").await.unwrap().is_some());
        assert_eq!(reopened.list_contact_submissions().await.unwrap(), vec![stored]);
    }

    #[tokio::test]
    async fn test_corrupt_volunteer_areas_is_storage_error() {
        let dir = TempDir::new().unwrap();
        let store = open(&dir).await;
        store.create_contact_submission(sample_contact()).await.unwrap();

        sqlx::query("UPDATE contact_submissions SET volunteer_areas = 'accueil,louange'")
            .execute(&store.pool)
            .await
            .unwrap();

        let err = store.list_contact_submissions().await.unwrap_err();
        assert!(matches!(err, AppError::Database(_)));
    }

    #[test]
    fn test_timestamp_text_round_trip() {
        let ts = MonotonicClock::new().now();
        assert_eq!(parse_timestamp(&format_timestamp(&ts)).unwrap(), ts);
        assert!(parse_timestamp("yesterday").is_err());
    }
}
