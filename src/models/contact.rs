//! Contact submission model matching the join form of the website.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// Why the visitor is getting in touch.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Interest {
    Visit,
    Member,
    Info,
    Prayer,
    Volunteer,
}

impl Interest {
    /// Every accepted value, in the order the form lists them.
    pub const ALL: [Interest; 5] = [
        Interest::Visit,
        Interest::Member,
        Interest::Info,
        Interest::Prayer,
        Interest::Volunteer,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Interest::Visit => "visit",
            Interest::Member => "member",
            Interest::Info => "info",
            Interest::Prayer => "prayer",
            Interest::Volunteer => "volunteer",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|interest| interest.as_str() == s)
    }
}

impl std::fmt::Display for Interest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated submission, ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewContactSubmission {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub interest: Interest,
    pub message: Option<String>,
    pub newsletter: bool,
    pub volunteer: bool,
    pub volunteer_areas: Vec<String>,
}

/// A stored contact or join request. Never modified after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactSubmission {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub phone: String,
    pub interest: Interest,
    pub message: Option<String>,
    pub newsletter: bool,
    pub volunteer: bool,
    pub volunteer_areas: Vec<String>,
    pub created_at: DateTime<Utc>,
}

impl ContactSubmission {
    /// Attach identity and creation time to a validated submission.
    pub fn from_new(id: String, created_at: DateTime<Utc>, new: NewContactSubmission) -> Self {
        Self {
            id,
            first_name: new.first_name,
            last_name: new.last_name,
            email: new.email,
            phone: new.phone,
            interest: new.interest,
            message: new.message,
            newsletter: new.newsletter,
            volunteer: new.volunteer,
            volunteer_areas: new.volunteer_areas,
            created_at,
        }
    }
}
