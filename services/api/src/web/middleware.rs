//! services/api/src/web/middleware.rs
//!
//! Authentication middleware for protecting routes.

use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;
use tracing::debug;
use uuid::Uuid;

use crate::error::ErrorBody;
use crate::web::state::AppState;

/// The identity of the caller, attached to the request by `require_auth`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthUser(pub Uuid);

/// Pulls the token out of an `Authorization: Bearer <token>` header value.
fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.split_once(' ')?;
    let token = token.trim();
    (scheme.eq_ignore_ascii_case("bearer") && !token.is_empty()).then_some(token)
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorBody {
            error: "Missing or invalid token".to_string(),
        }),
    )
        .into_response()
}

/// Middleware that validates the bearer token and extracts the user id.
///
/// If valid, inserts an `AuthUser` into request extensions for handlers to use.
/// If absent, malformed, badly signed or expired, returns 401 Unauthorized.
pub async fn require_auth(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    // 1. Extract the token from the Authorization header
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(bearer_token)
        .ok_or_else(unauthorized)?;

    // 2. Verify signature and expiry, get user_id
    let user_id = state.auth.authenticate(token).map_err(|e| {
        debug!("Bearer token rejected: {}", e);
        unauthorized()
    })?;

    // 3. Insert the caller into request extensions
    req.extensions_mut().insert(AuthUser(user_id));

    // 4. Continue to the handler
    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bearer_scheme_is_required() {
        assert_eq!(bearer_token("Bearer abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(bearer_token("bearer abc"), Some("abc"));
        assert_eq!(bearer_token("Basic abc"), None);
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("abc"), None);
    }
}
