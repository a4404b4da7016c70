//! In-memory store. Contents live as long as the process.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::{MonotonicClock, Store};
use crate::errors::AppError;
use crate::models::{ContactSubmission, NewContactSubmission, User};

#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<String, User>>,
    contact_submissions: RwLock<Vec<ContactSubmission>>,
    clock: MonotonicClock,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn create_user(&self, username: &str, password: &str) -> Result<User, AppError> {
        // Uniqueness check and insert happen under the same write guard.
        let mut users = self.users.write().await;
        if users.values().any(|u| u.username == username) {
            return Err(AppError::Conflict(format!(
                "Username {} already exists",
                username
            )));
        }

        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            username: username.to_string(),
            password: password.to_string(),
        };
        users.insert(user.id.clone(), user.clone());
        tracing::debug!(user_id = %user.id, "user created");

        Ok(user)
    }

    async fn get_user(&self, id: &str) -> Result<Option<User>, AppError> {
        Ok(self.users.read().await.get(id).cloned())
    }

    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.username == username)
            .cloned())
    }

    async fn create_contact_submission(
        &self,
        contact: NewContactSubmission,
    ) -> Result<ContactSubmission, AppError> {
        let mut submissions = self.contact_submissions.write().await;
        let submission = ContactSubmission::from_new(
            uuid::Uuid::new_v4().to_string(),
            self.clock.now(),
            contact,
        );
        submissions.push(submission.clone());
        tracing::debug!(count = submissions.len(), "contact submission appended");

        Ok(submission)
    }

    async fn list_contact_submissions(&self) -> Result<Vec<ContactSubmission>, AppError> {
        Ok(self.contact_submissions.read().await.clone())
    }
}
