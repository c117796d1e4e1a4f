//! services/api/src/web/auth.rs
//!
//! Authentication endpoints for user registration and login.

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use wellness_core::ports::PortError;

use crate::error::ApiError;
use crate::web::state::AppState;

//=========================================================================================
// Request/Response Types
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct CredentialsRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct MessageResponse {
    pub msg: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    /// Bearer token, valid for two hours.
    pub token: String,
}

//=========================================================================================
// Errors
//=========================================================================================

/// Failures on the `/auth` routes carry their message under `msg`, like the
/// acknowledgments do, instead of the `error` key used elsewhere.
#[derive(Debug)]
pub struct AuthError(pub ApiError);

impl From<PortError> for AuthError {
    fn from(e: PortError) -> Self {
        Self(ApiError::Port(e))
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, msg) = self.0.into_status_and_message();
        (status, Json(MessageResponse { msg })).into_response()
    }
}

//=========================================================================================
// Handlers
//=========================================================================================

/// POST /auth/register - Create a new user account
#[utoipa::path(
    post,
    path = "/auth/register",
    request_body = CredentialsRequest,
    responses(
        (status = 201, description = "User registered", body = MessageResponse),
        (status = 400, description = "User already exists or fields missing", body = MessageResponse),
        (status = 500, description = "Internal server error", body = MessageResponse)
    )
)]
pub async fn register_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CredentialsRequest>,
) -> Result<impl IntoResponse, AuthError> {
    state.auth.register(&req.email, &req.password).await?;

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            msg: "User registered".to_string(),
        }),
    ))
}

/// POST /auth/login - Exchange credentials for a bearer token
#[utoipa::path(
    post,
    path = "/auth/login",
    request_body = CredentialsRequest,
    responses(
        (status = 200, description = "Login successful", body = TokenResponse),
        (status = 401, description = "Invalid credentials", body = MessageResponse),
        (status = 500, description = "Internal server error", body = MessageResponse)
    )
)]
pub async fn login_handler(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CredentialsRequest>,
) -> Result<Json<TokenResponse>, AuthError> {
    let token = state.auth.login(&req.email, &req.password).await?;
    Ok(Json(TokenResponse { token }))
}
