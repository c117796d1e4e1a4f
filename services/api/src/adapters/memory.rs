//! services/api/src/adapters/memory.rs
//!
//! An in-process implementation of the storage ports. Used when no database is
//! configured, and by the test suites. Nothing survives a restart.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;
use wellness_core::domain::{Session, SessionDraft, SessionStatus, User, UserCredentials};
use wellness_core::ports::{CredentialStore, PortError, PortResult, SessionStore};

#[derive(Default)]
pub struct InMemoryStore {
    // Keyed by the exact email, so uniqueness is case-sensitive.
    users: RwLock<HashMap<String, UserCredentials>>,
    sessions: RwLock<HashMap<Uuid, Session>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn session_not_found(id: Uuid) -> PortError {
    PortError::NotFound(format!("Session {} not found", id))
}

fn newest_first(mut sessions: Vec<Session>) -> Vec<Session> {
    sessions.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
    sessions
}

#[async_trait]
impl CredentialStore for InMemoryStore {
    async fn create_user(&self, email: &str, password_hash: &str) -> PortResult<User> {
        let mut users = self.users.write().await;
        if users.contains_key(email) {
            return Err(PortError::Conflict(format!("User {} already exists", email)));
        }

        let creds = UserCredentials {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
        };
        let user = creds.to_user();
        users.insert(email.to_string(), creds);
        Ok(user)
    }

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials> {
        self.users
            .read()
            .await
            .get(email)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("User {} not found", email)))
    }
}

#[async_trait]
impl SessionStore for InMemoryStore {
    async fn list_published(&self) -> PortResult<Vec<Session>> {
        let sessions = self.sessions.read().await;
        Ok(newest_first(
            sessions.values().filter(|s| s.is_published()).cloned().collect(),
        ))
    }

    async fn list_by_owner(&self, owner_id: Uuid) -> PortResult<Vec<Session>> {
        let sessions = self.sessions.read().await;
        Ok(newest_first(
            sessions
                .values()
                .filter(|s| s.owner_id == owner_id)
                .cloned()
                .collect(),
        ))
    }

    async fn get_owned(&self, owner_id: Uuid, id: Uuid) -> PortResult<Session> {
        self.sessions
            .read()
            .await
            .get(&id)
            .filter(|s| s.owner_id == owner_id)
            .cloned()
            .ok_or_else(|| session_not_found(id))
    }

    async fn insert(&self, owner_id: Uuid, draft: &SessionDraft) -> PortResult<Session> {
        let now = Utc::now();
        let session = Session {
            id: Uuid::new_v4(),
            owner_id,
            title: draft.title.clone(),
            tags: draft.tags.clone(),
            content_url: draft.content_url.clone(),
            status: SessionStatus::Draft,
            created_at: now,
            updated_at: now,
        };
        self.sessions
            .write()
            .await
            .insert(session.id, session.clone());
        Ok(session)
    }

    async fn update_owned(
        &self,
        owner_id: Uuid,
        id: Uuid,
        draft: &SessionDraft,
    ) -> PortResult<Session> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(&id)
            .filter(|s| s.owner_id == owner_id)
            .ok_or_else(|| session_not_found(id))?;

        session.title = draft.title.clone();
        session.tags = draft.tags.clone();
        session.content_url = draft.content_url.clone();
        session.status = SessionStatus::Draft;
        session.updated_at = Utc::now();
        Ok(session.clone())
    }

    async fn publish_owned(&self, owner_id: Uuid, id: Uuid) -> PortResult<Session> {
        let mut sessions = self.sessions.write().await;
        let session = sessions
            .get_mut(&id)
            .filter(|s| s.owner_id == owner_id)
            .ok_or_else(|| session_not_found(id))?;

        session.status = SessionStatus::Published;
        session.updated_at = Utc::now();
        Ok(session.clone())
    }

    async fn delete_owned(&self, owner_id: Uuid, id: Uuid) -> PortResult<()> {
        let mut sessions = self.sessions.write().await;
        match sessions.get(&id) {
            Some(s) if s.owner_id == owner_id => {
                sessions.remove(&id);
                Ok(())
            }
            _ => Err(session_not_found(id)),
        }
    }
}
