//! crates/wellness_core/src/services.rs
//!
//! Application services: registration/login and the owner-scoped session lifecycle.
//! Both are thin rule layers over the ports and keep no per-request state.

use std::sync::Arc;

use once_cell::sync::{Lazy, OnceCell};
use regex::Regex;
use tracing::{debug, info};
use uuid::Uuid;

use crate::domain::{SaveDraft, Session, SessionDraft, User};
use crate::ports::{
    CredentialStore, PasswordHasher, PortError, PortResult, SessionStore, TokenService,
};

//=========================================================================================
// AuthService
//=========================================================================================

pub const MIN_PASSWORD_CHARS: usize = 6;

static EMAIL_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\S+@\S+\.\S+").expect("email pattern is valid"));

// Verified against when the email is unknown, so both login failures cost one hash check.
const DUMMY_PASSWORD: &str = "no-such-user-password";

#[derive(Clone)]
pub struct AuthService {
    credentials: Arc<dyn CredentialStore>,
    hasher: Arc<dyn PasswordHasher>,
    tokens: Arc<dyn TokenService>,
    dummy_hash: Arc<OnceCell<String>>,
}

impl AuthService {
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        hasher: Arc<dyn PasswordHasher>,
        tokens: Arc<dyn TokenService>,
    ) -> Self {
        Self {
            credentials,
            hasher,
            tokens,
            dummy_hash: Arc::new(OnceCell::new()),
        }
    }

    /// Creates a user. Only the hash of the password is ever handed to the store.
    pub async fn register(&self, email: &str, password: &str) -> PortResult<User> {
        validate_credentials(email, password)?;

        let password_hash = self.hasher.hash(password)?;
        let user = self.credentials.create_user(email, &password_hash).await?;
        info!(user_id = %user.id, "registered user");
        Ok(user)
    }

    /// Verifies credentials and returns a fresh bearer token.
    ///
    /// An unknown email and a wrong password both fail with `Unauthorized`.
    pub async fn login(&self, email: &str, password: &str) -> PortResult<String> {
        let creds = match self.credentials.get_user_by_email(email).await {
            Ok(creds) => creds,
            Err(PortError::NotFound(_)) => {
                let dummy = self
                    .dummy_hash
                    .get_or_try_init(|| self.hasher.hash(DUMMY_PASSWORD))?;
                let _ = self.hasher.verify(password, dummy);
                return Err(PortError::Unauthorized);
            }
            Err(e) => return Err(e),
        };

        if !self.hasher.verify(password, &creds.password_hash)? {
            debug!(user_id = %creds.id, "password mismatch");
            return Err(PortError::Unauthorized);
        }

        self.tokens.issue(creds.id)
    }

    /// Resolves a bearer token to the user id it was issued for.
    pub fn authenticate(&self, token: &str) -> PortResult<Uuid> {
        self.tokens.verify(token)
    }
}

//=========================================================================================
// SessionService
//=========================================================================================

#[derive(Clone)]
pub struct SessionService {
    store: Arc<dyn SessionStore>,
}

impl SessionService {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// All published sessions, regardless of owner.
    pub async fn list_published(&self) -> PortResult<Vec<Session>> {
        self.store.list_published().await
    }

    pub async fn list_mine(&self, owner_id: Uuid) -> PortResult<Vec<Session>> {
        self.store.list_by_owner(owner_id).await
    }

    pub async fn get_mine(&self, owner_id: Uuid, id: Uuid) -> PortResult<Session> {
        self.store.get_owned(owner_id, id).await
    }

    /// Creates a new draft or overwrites an owned session. Either way the result is a draft,
    /// so editing a published session takes it out of the public listing.
    pub async fn save_draft(&self, owner_id: Uuid, request: SaveDraft) -> PortResult<Session> {
        validate_draft(request.draft())?;

        let session = match request {
            SaveDraft::Create(draft) => self.store.insert(owner_id, &draft).await?,
            SaveDraft::Update { id, draft } => {
                self.store.update_owned(owner_id, id, &draft).await?
            }
        };
        debug!(session_id = %session.id, %owner_id, "saved draft");
        Ok(session)
    }

    /// Marks an owned session as published. Re-publishing is allowed.
    pub async fn publish(&self, owner_id: Uuid, id: Uuid) -> PortResult<Session> {
        let session = self.store.publish_owned(owner_id, id).await?;
        info!(session_id = %session.id, %owner_id, "published session");
        Ok(session)
    }

    pub async fn delete(&self, owner_id: Uuid, id: Uuid) -> PortResult<()> {
        self.store.delete_owned(owner_id, id).await?;
        info!(session_id = %id, %owner_id, "deleted session");
        Ok(())
    }
}

fn validate_credentials(email: &str, password: &str) -> PortResult<()> {
    if !EMAIL_PATTERN.is_match(email) {
        return Err(PortError::Validation(
            "Please enter a valid email address".to_string(),
        ));
    }
    if password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(PortError::Validation(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_CHARS
        )));
    }
    Ok(())
}

fn validate_draft(draft: &SessionDraft) -> PortResult<()> {
    if draft.title.trim().is_empty() {
        return Err(PortError::Validation("title is required".to_string()));
    }
    if draft.content_url.trim().is_empty() {
        return Err(PortError::Validation("json_file_url is required".to_string()));
    }
    Ok(())
}
