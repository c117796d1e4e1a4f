//! crates/wellness_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or serialization format.

use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

//=========================================================================================
// Users
//=========================================================================================

/// Represents a registered user - safe to pass around the app.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: Uuid,
    pub email: String,
}

// Only used internally for login - contains the password hash
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub id: Uuid,
    pub email: String,
    pub password_hash: String,
}

impl UserCredentials {
    pub fn to_user(&self) -> User {
        User {
            id: self.id,
            email: self.email.clone(),
        }
    }
}

//=========================================================================================
// Sessions
//=========================================================================================

/// Publication state of a session. The only transition exposed is `Draft -> Published`,
/// although saving a draft always puts a session back into `Draft`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SessionStatus {
    Draft,
    Published,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Draft => "draft",
            SessionStatus::Published => "published",
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SessionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(SessionStatus::Draft),
            "published" => Ok(SessionStatus::Published),
            other => Err(format!("unknown session status '{}'", other)),
        }
    }
}

/// A unit of wellness content metadata owned by exactly one user.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    pub tags: Vec<String>,
    /// Link to the externally hosted JSON content. Never fetched or validated here.
    pub content_url: String,
    pub status: SessionStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Session {
    pub fn is_published(&self) -> bool {
        self.status == SessionStatus::Published
    }
}

/// The editable fields of a session, as written by a save-draft.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionDraft {
    pub title: String,
    pub tags: Vec<String>,
    pub content_url: String,
}

impl SessionDraft {
    /// Builds a draft from the raw comma-separated tag input.
    pub fn new(title: impl Into<String>, raw_tags: &str, content_url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            tags: parse_tags(raw_tags),
            content_url: content_url.into(),
        }
    }
}

/// A save-draft request: either a brand new session or an edit of an owned one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveDraft {
    Create(SessionDraft),
    Update { id: Uuid, draft: SessionDraft },
}

impl SaveDraft {
    /// Maps the optional id of a save request onto the matching variant.
    pub fn from_optional_id(id: Option<Uuid>, draft: SessionDraft) -> Self {
        match id {
            Some(id) => SaveDraft::Update { id, draft },
            None => SaveDraft::Create(draft),
        }
    }

    pub fn draft(&self) -> &SessionDraft {
        match self {
            SaveDraft::Create(draft) => draft,
            SaveDraft::Update { draft, .. } => draft,
        }
    }
}

/// Splits a comma-separated tag string, trimming each segment.
///
/// Order is preserved; duplicates and empty segments are kept as-is.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',').map(|t| t.trim().to_string()).collect()
}
