//! services/api/src/config.rs
//!
//! Defines the application's configuration structure and loading logic.
//!
//! All configuration is loaded from environment variables at startup. The `.env`
//! file is used for local development.

use axum::http::HeaderValue;
use std::collections::HashMap;
use std::net::SocketAddr;
use tracing::Level;

/// A custom error type for configuration loading failures.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing the environment variable {0}")]
    MissingVar(String),
    #[error("Invalid value for the environment variable {0}: {1}")]
    InvalidValue(String, String),
}

/// Holds all configuration loaded from the environment at startup.
#[derive(Clone)]
pub struct Config {
    pub bind_address: SocketAddr,
    /// When absent the service falls back to the in-memory store.
    pub database_url: Option<String>,
    pub database_max_connections: u32,
    pub jwt_secret: String,
    /// Allowed browser origin. Absent means any origin.
    pub cors_origin: Option<HeaderValue>,
    pub log_level: Level,
}

// The signing key must never end up in logs.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("bind_address", &self.bind_address)
            .field("database_url", &self.database_url.as_ref().map(|_| "<set>"))
            .field("database_max_connections", &self.database_max_connections)
            .field("jwt_secret", &"<redacted>")
            .field("cors_origin", &self.cors_origin)
            .field("log_level", &self.log_level)
            .finish()
    }
}

impl Config {
    /// Loads configuration from environment variables.
    ///
    /// It will look for a `.env` file in the current directory for development,
    /// but this is skipped in test environments to ensure tests are hermetic.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Only load from .env in non-test mode to avoid contamination.
        if !cfg!(test) {
            dotenvy::dotenv().ok();
        }
        Self::from_vars(std::env::vars().collect())
    }

    /// Builds the configuration from an explicit set of variables.
    pub fn from_vars(vars: HashMap<String, String>) -> Result<Self, ConfigError> {
        let var = |name: &str| vars.get(name).filter(|v| !v.trim().is_empty()).cloned();

        // --- Server Settings ---
        let bind_address_str = var("BIND_ADDRESS").unwrap_or_else(|| "0.0.0.0:8000".to_string());
        let bind_address = bind_address_str.parse::<SocketAddr>().map_err(|e| {
            ConfigError::InvalidValue("BIND_ADDRESS".to_string(), e.to_string())
        })?;

        let cors_origin = var("CORS_ORIGIN")
            .map(|origin| {
                origin.parse::<HeaderValue>().map_err(|e| {
                    ConfigError::InvalidValue("CORS_ORIGIN".to_string(), e.to_string())
                })
            })
            .transpose()?;

        // --- Database Settings ---
        let database_url = var("DATABASE_URL");
        let database_max_connections = match var("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => raw.parse::<u32>().map_err(|e| {
                ConfigError::InvalidValue("DATABASE_MAX_CONNECTIONS".to_string(), e.to_string())
            })?,
            None => 5,
        };

        // --- Auth Settings ---
        let jwt_secret =
            var("JWT_SECRET").ok_or_else(|| ConfigError::MissingVar("JWT_SECRET".to_string()))?;

        let log_level_str = var("RUST_LOG").unwrap_or_else(|| "INFO".to_string());
        let log_level = log_level_str.parse::<Level>().map_err(|_| {
            ConfigError::InvalidValue(
                "RUST_LOG".to_string(),
                format!("'{}' is not a valid log level", log_level_str),
            )
        })?;

        Ok(Self {
            bind_address,
            database_url,
            database_max_connections,
            jwt_secret,
            cors_origin,
            log_level,
        })
    }
}
