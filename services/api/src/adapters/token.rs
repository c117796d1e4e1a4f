//! services/api/src/adapters/token.rs
//!
//! JWT implementation of the `TokenService` port. Tokens are HS256-signed with the
//! process-wide secret and carry the user id as the `sub` claim.

use chrono::{Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;
use wellness_core::ports::{PortError, PortResult, TokenService};

/// How long an issued token stays valid, in seconds.
pub const TOKEN_TTL_SECS: i64 = 2 * 60 * 60;

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub iat: i64,
    pub exp: i64,
}

pub struct JwtTokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl JwtTokenService {
    pub fn new(secret: &[u8]) -> Self {
        Self::with_ttl(secret, Duration::seconds(TOKEN_TTL_SECS))
    }

    pub fn with_ttl(secret: &[u8], ttl: Duration) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            validation,
            ttl,
        }
    }
}

impl TokenService for JwtTokenService {
    fn issue(&self, user_id: Uuid) -> PortResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id,
            iat: now.timestamp(),
            exp: (now + self.ttl).timestamp(),
        };
        jsonwebtoken::encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)
            .map_err(|e| PortError::Unexpected(format!("Failed to sign token: {}", e)))
    }

    fn verify(&self, token: &str) -> PortResult<Uuid> {
        jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
            .map(|data| data.claims.sub)
            .map_err(|e| {
                debug!("Rejected bearer token: {}", e);
                PortError::Unauthorized
            })
    }
}
