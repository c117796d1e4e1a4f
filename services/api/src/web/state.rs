//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::adapters::{Argon2Hasher, JwtTokenService};
use crate::config::Config;
use std::sync::Arc;
use wellness_core::ports::{CredentialStore, SessionStore};
use wellness_core::services::{AuthService, SessionService};

//=========================================================================================
// AppState (Shared Across All Requests)
//=========================================================================================

/// The shared application state, created once at startup and passed to all handlers.
/// It holds no per-request data; identity travels in the bearer token.
#[derive(Clone)]
pub struct AppState {
    pub auth: AuthService,
    pub sessions: SessionService,
    pub config: Arc<Config>,
}

impl AppState {
    /// Wires the services over a store that backs both users and sessions,
    /// with Argon2 hashing and JWTs signed by the configured secret.
    pub fn with_store<S>(config: Arc<Config>, store: Arc<S>) -> Self
    where
        S: CredentialStore + SessionStore + 'static,
    {
        let tokens = Arc::new(JwtTokenService::new(config.jwt_secret.as_bytes()));
        let auth = AuthService::new(store.clone(), Arc::new(Argon2Hasher::new()), tokens);
        let sessions = SessionService::new(store);

        Self {
            auth,
            sessions,
            config,
        }
    }
}
