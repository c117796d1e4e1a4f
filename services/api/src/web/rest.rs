//! services/api/src/web/rest.rs
//!
//! Contains the Axum handlers for the session endpoints and the master
//! definition for the OpenAPI specification.

use crate::error::{ApiError, ErrorBody};
use crate::web::auth::{CredentialsRequest, MessageResponse, TokenResponse};
use crate::web::middleware::AuthUser;
use crate::web::state::AppState;
use axum::{
    extract::{Path, State},
    response::Json,
    Extension,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, ToSchema};
use uuid::Uuid;
use wellness_core::domain::{SaveDraft, Session, SessionDraft};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::web::auth::register_handler,
        crate::web::auth::login_handler,
        list_published_handler,
        list_my_sessions_handler,
        get_my_session_handler,
        save_draft_handler,
        publish_handler,
        delete_my_session_handler,
    ),
    components(
        schemas(
            CredentialsRequest,
            MessageResponse,
            TokenResponse,
            SessionResponse,
            SaveDraftRequest,
            PublishRequest,
            ErrorBody,
        )
    ),
    modifiers(&BearerAuth),
    tags(
        (name = "Wellness Sessions API", description = "Draft, publish and browse guided wellness sessions.")
    )
)]
pub struct ApiDoc;

/// Registers the `bearer_auth` security scheme referenced by the owner-scoped paths.
struct BearerAuth;

impl Modify for BearerAuth {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

//=========================================================================================
// API Response and Payload Structs
//=========================================================================================

/// A session as returned to clients.
#[derive(Serialize, Deserialize, ToSchema)]
pub struct SessionResponse {
    pub id: Uuid,
    pub user_id: Uuid,
    pub title: String,
    pub tags: Vec<String>,
    pub json_file_url: String,
    /// Either `draft` or `published`.
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Session> for SessionResponse {
    fn from(session: Session) -> Self {
        Self {
            id: session.id,
            user_id: session.owner_id,
            title: session.title,
            tags: session.tags,
            json_file_url: session.content_url,
            status: session.status.as_str().to_string(),
            created_at: session.created_at,
            updated_at: session.updated_at,
        }
    }
}

fn to_responses(sessions: Vec<Session>) -> Vec<SessionResponse> {
    sessions.into_iter().map(SessionResponse::from).collect()
}

/// Creates a new draft when `id` is absent, otherwise edits the caller's session.
#[derive(Deserialize, ToSchema)]
pub struct SaveDraftRequest {
    #[serde(default)]
    pub id: Option<Uuid>,
    pub title: String,
    /// Comma-separated tags, e.g. `"yoga, breathing"`.
    pub tags: String,
    pub json_file_url: String,
}

impl From<SaveDraftRequest> for SaveDraft {
    fn from(req: SaveDraftRequest) -> Self {
        SaveDraft::from_optional_id(
            req.id,
            SessionDraft::new(req.title, &req.tags, req.json_file_url),
        )
    }
}

#[derive(Deserialize, ToSchema)]
pub struct PublishRequest {
    pub id: Uuid,
}

//=========================================================================================
// Public Handlers
//=========================================================================================

/// List every published session, from all owners.
#[utoipa::path(
    get,
    path = "/sessions",
    responses(
        (status = 200, description = "Published sessions", body = [SessionResponse]),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn list_published_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<SessionResponse>>, ApiError> {
    let sessions = state.sessions.list_published().await?;
    Ok(Json(to_responses(sessions)))
}

//=========================================================================================
// Owner-scoped Handlers
//=========================================================================================

/// List the caller's sessions in any status.
#[utoipa::path(
    get,
    path = "/sessions/my-sessions",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "The caller's sessions", body = [SessionResponse]),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn list_my_sessions_handler(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
) -> Result<Json<Vec<SessionResponse>>, ApiError> {
    let sessions = state.sessions.list_mine(user_id).await?;
    Ok(Json(to_responses(sessions)))
}

/// Fetch one of the caller's sessions.
#[utoipa::path(
    get,
    path = "/sessions/my-sessions/{id}",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Session id")),
    responses(
        (status = 200, description = "The session", body = SessionResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 404, description = "Session not found", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn get_my_session_handler(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, ApiError> {
    let session = state.sessions.get_mine(user_id, id).await?;
    Ok(Json(session.into()))
}

/// Create or update a draft. The saved session is always a draft afterwards.
#[utoipa::path(
    post,
    path = "/sessions/my-sessions/save-draft",
    security(("bearer_auth" = [])),
    request_body = SaveDraftRequest,
    responses(
        (status = 200, description = "The saved draft", body = SessionResponse),
        (status = 400, description = "Missing required fields", body = ErrorBody),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 404, description = "Session not found", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn save_draft_handler(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Json(req): Json<SaveDraftRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let session = state.sessions.save_draft(user_id, req.into()).await?;
    Ok(Json(session.into()))
}

/// Publish one of the caller's sessions.
#[utoipa::path(
    post,
    path = "/sessions/my-sessions/publish",
    security(("bearer_auth" = [])),
    request_body = PublishRequest,
    responses(
        (status = 200, description = "The published session", body = SessionResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 404, description = "Session not found", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn publish_handler(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Json(req): Json<PublishRequest>,
) -> Result<Json<SessionResponse>, ApiError> {
    let session = state.sessions.publish(user_id, req.id).await?;
    Ok(Json(session.into()))
}

/// Delete one of the caller's sessions.
#[utoipa::path(
    delete,
    path = "/sessions/my-sessions/{id}",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Session id")),
    responses(
        (status = 200, description = "Session deleted", body = MessageResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorBody),
        (status = 404, description = "Session not found", body = ErrorBody),
        (status = 500, description = "Internal server error", body = ErrorBody)
    )
)]
pub async fn delete_my_session_handler(
    State(state): State<Arc<AppState>>,
    Extension(AuthUser(user_id)): Extension<AuthUser>,
    Path(id): Path<Uuid>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.sessions.delete(user_id, id).await?;
    Ok(Json(MessageResponse {
        msg: "Session deleted successfully".to_string(),
    }))
}
