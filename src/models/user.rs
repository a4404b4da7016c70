//! Site user model.

use serde::Serialize;

/// A user account. Usernames are unique across the store.
///
/// The password is kept exactly as supplied; nothing in the service reads it back
/// for authentication yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: String,
    pub username: String,
    #[serde(skip_serializing)]
    pub password: String,
}
