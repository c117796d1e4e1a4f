//! crates/wellness_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like databases or crypto.

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Session, SessionDraft, User, UserCredentials};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, crypto).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Storage Ports
//=========================================================================================

#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Persists a new user. Fails with `Conflict` if the exact email is taken.
    async fn create_user(&self, email: &str, password_hash: &str) -> PortResult<User>;

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials>;
}

/// Persistence for sessions.
///
/// Every `*_owned` method matches on `(id, owner_id)` in a single lookup, so a session
/// owned by someone else is reported exactly like one that does not exist.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn list_published(&self) -> PortResult<Vec<Session>>;

    async fn list_by_owner(&self, owner_id: Uuid) -> PortResult<Vec<Session>>;

    async fn get_owned(&self, owner_id: Uuid, id: Uuid) -> PortResult<Session>;

    /// Inserts a new session in `draft` status.
    async fn insert(&self, owner_id: Uuid, draft: &SessionDraft) -> PortResult<Session>;

    /// Overwrites the editable fields and resets the status to `draft`.
    async fn update_owned(
        &self,
        owner_id: Uuid,
        id: Uuid,
        draft: &SessionDraft,
    ) -> PortResult<Session>;

    async fn publish_owned(&self, owner_id: Uuid, id: Uuid) -> PortResult<Session>;

    async fn delete_owned(&self, owner_id: Uuid, id: Uuid) -> PortResult<()>;
}

//=========================================================================================
// Credential Ports
//=========================================================================================

/// A slow, salted, one-way password hash.
pub trait PasswordHasher: Send + Sync {
    fn hash(&self, password: &str) -> PortResult<String>;

    /// Returns `Ok(false)` on a mismatch; errors are reserved for unreadable hashes.
    fn verify(&self, password: &str, password_hash: &str) -> PortResult<bool>;
}

/// Issues and verifies signed, time-limited bearer tokens.
pub trait TokenService: Send + Sync {
    fn issue(&self, user_id: Uuid) -> PortResult<String>;

    /// Returns the user id embedded in a valid token, or `Unauthorized`.
    fn verify(&self, token: &str) -> PortResult<Uuid>;
}
