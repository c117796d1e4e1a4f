#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use api_lib::adapters::{InMemoryStore, JwtTokenService};
use api_lib::config::Config;
use wellness_core::ports::{PasswordHasher, PortResult};
use wellness_core::services::{AuthService, SessionService};

pub const TEST_SECRET: &str = "integration-test-secret";

pub fn test_config() -> Arc<Config> {
    let vars = HashMap::from([("JWT_SECRET".to_string(), TEST_SECRET.to_string())]);
    Arc::new(Config::from_vars(vars).expect("test config"))
}

/// Reversible stand-in for Argon2 so service tests stay fast.
pub struct PlainHasher;

impl PasswordHasher for PlainHasher {
    fn hash(&self, password: &str) -> PortResult<String> {
        Ok(format!("plain:{}", password))
    }

    fn verify(&self, password: &str, password_hash: &str) -> PortResult<bool> {
        Ok(password_hash == format!("plain:{}", password))
    }
}

pub fn services() -> (AuthService, SessionService, Arc<InMemoryStore>) {
    let store = Arc::new(InMemoryStore::new());
    let auth = AuthService::new(
        store.clone(),
        Arc::new(PlainHasher),
        Arc::new(JwtTokenService::new(TEST_SECRET.as_bytes())),
    );
    let sessions = SessionService::new(store.clone());
    (auth, sessions, store)
}
