//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `CredentialStore` and `SessionStore` ports from the `core` crate. It handles
//! all interactions with the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;
use wellness_core::domain::{Session, SessionDraft, SessionStatus, User, UserCredentials};
use wellness_core::ports::{CredentialStore, PortError, PortResult, SessionStore};

const SESSION_COLUMNS: &str =
    "id, owner_id, title, tags, json_file_url, status, created_at, updated_at";

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the storage ports.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::Error> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

fn unexpected(e: sqlx::Error) -> PortError {
    PortError::Unexpected(e.to_string())
}

fn session_not_found(id: Uuid) -> PortError {
    PortError::NotFound(format!("Session {} not found", id))
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct UserRecord {
    id: Uuid,
    email: String,
}
impl UserRecord {
    fn to_domain(self) -> User {
        User {
            id: self.id,
            email: self.email,
        }
    }
}

#[derive(FromRow)]
struct CredentialsRecord {
    id: Uuid,
    email: String,
    password_hash: String,
}
impl CredentialsRecord {
    fn to_domain(self) -> UserCredentials {
        UserCredentials {
            id: self.id,
            email: self.email,
            password_hash: self.password_hash,
        }
    }
}

#[derive(FromRow)]
struct SessionRecord {
    id: Uuid,
    owner_id: Uuid,
    title: String,
    tags: Vec<String>,
    json_file_url: String,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}
impl SessionRecord {
    fn to_domain(self) -> PortResult<Session> {
        let status = self
            .status
            .parse::<SessionStatus>()
            .map_err(PortError::Unexpected)?;
        Ok(Session {
            id: self.id,
            owner_id: self.owner_id,
            title: self.title,
            tags: self.tags,
            content_url: self.json_file_url,
            status,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn to_sessions(records: Vec<SessionRecord>) -> PortResult<Vec<Session>> {
    records.into_iter().map(SessionRecord::to_domain).collect()
}

//=========================================================================================
// `CredentialStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl CredentialStore for DbAdapter {
    async fn create_user(&self, email: &str, password_hash: &str) -> PortResult<User> {
        // The unique index on email decides races between concurrent registrations.
        let record = sqlx::query_as::<_, UserRecord>(
            "INSERT INTO users (id, email, password_hash) VALUES ($1, $2, $3) \
             ON CONFLICT (email) DO NOTHING RETURNING id, email",
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(password_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        .ok_or_else(|| PortError::Conflict(format!("User {} already exists", email)))?;

        Ok(record.to_domain())
    }

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials> {
        let record = sqlx::query_as::<_, CredentialsRecord>(
            "SELECT id, email, password_hash FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => PortError::NotFound(format!("User {} not found", email)),
            _ => unexpected(e),
        })?;

        Ok(record.to_domain())
    }
}

//=========================================================================================
// `SessionStore` Trait Implementation
//=========================================================================================

#[async_trait]
impl SessionStore for DbAdapter {
    async fn list_published(&self) -> PortResult<Vec<Session>> {
        let records = sqlx::query_as::<_, SessionRecord>(&format!(
            "SELECT {} FROM sessions WHERE status = $1 ORDER BY updated_at DESC",
            SESSION_COLUMNS
        ))
        .bind(SessionStatus::Published.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        to_sessions(records)
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> PortResult<Vec<Session>> {
        let records = sqlx::query_as::<_, SessionRecord>(&format!(
            "SELECT {} FROM sessions WHERE owner_id = $1 ORDER BY updated_at DESC",
            SESSION_COLUMNS
        ))
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await
        .map_err(unexpected)?;

        to_sessions(records)
    }

    async fn get_owned(&self, owner_id: Uuid, id: Uuid) -> PortResult<Session> {
        sqlx::query_as::<_, SessionRecord>(&format!(
            "SELECT {} FROM sessions WHERE id = $1 AND owner_id = $2",
            SESSION_COLUMNS
        ))
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        .ok_or_else(|| session_not_found(id))?
        .to_domain()
    }

    async fn insert(&self, owner_id: Uuid, draft: &SessionDraft) -> PortResult<Session> {
        sqlx::query_as::<_, SessionRecord>(&format!(
            "INSERT INTO sessions (id, owner_id, title, tags, json_file_url, status) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
            SESSION_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(owner_id)
        .bind(&draft.title)
        .bind(&draft.tags)
        .bind(&draft.content_url)
        .bind(SessionStatus::Draft.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(unexpected)?
        .to_domain()
    }

    async fn update_owned(
        &self,
        owner_id: Uuid,
        id: Uuid,
        draft: &SessionDraft,
    ) -> PortResult<Session> {
        sqlx::query_as::<_, SessionRecord>(&format!(
            "UPDATE sessions SET title = $1, tags = $2, json_file_url = $3, status = $4, \
             updated_at = NOW() WHERE id = $5 AND owner_id = $6 RETURNING {}",
            SESSION_COLUMNS
        ))
        .bind(&draft.title)
        .bind(&draft.tags)
        .bind(&draft.content_url)
        .bind(SessionStatus::Draft.as_str())
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        .ok_or_else(|| session_not_found(id))?
        .to_domain()
    }

    async fn publish_owned(&self, owner_id: Uuid, id: Uuid) -> PortResult<Session> {
        sqlx::query_as::<_, SessionRecord>(&format!(
            "UPDATE sessions SET status = $1, updated_at = NOW() \
             WHERE id = $2 AND owner_id = $3 RETURNING {}",
            SESSION_COLUMNS
        ))
        .bind(SessionStatus::Published.as_str())
        .bind(id)
        .bind(owner_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(unexpected)?
        .ok_or_else(|| session_not_found(id))?
        .to_domain()
    }

    async fn delete_owned(&self, owner_id: Uuid, id: Uuid) -> PortResult<()> {
        let result = sqlx::query("DELETE FROM sessions WHERE id = $1 AND owner_id = $2")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await
            .map_err(unexpected)?;

        if result.rows_affected() == 0 {
            return Err(session_not_found(id));
        }
        Ok(())
    }
}
