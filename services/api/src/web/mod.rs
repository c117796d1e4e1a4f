pub mod auth;
pub mod middleware;
pub mod rest;
pub mod state;

use axum::{
    extract::DefaultBodyLimit,
    http::{
        header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
        Method,
    },
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

pub use auth::{login_handler, register_handler};
pub use middleware::{require_auth, AuthUser};
pub use rest::{
    delete_my_session_handler, get_my_session_handler, list_my_sessions_handler,
    list_published_handler, publish_handler, save_draft_handler, ApiDoc,
};
pub use state::AppState;

/// Request bodies are small JSON documents.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Builds the complete application: API routes, auth middleware, CORS, request
/// tracing and the Swagger UI.
pub fn router(app_state: Arc<AppState>) -> Router {
    let allow_origin = match &app_state.config.cors_origin {
        Some(origin) => AllowOrigin::exact(origin.clone()),
        None => AllowOrigin::any(),
    };
    let cors = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::DELETE, Method::OPTIONS])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE, ACCEPT]);

    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/auth/register", post(register_handler))
        .route("/auth/login", post(login_handler))
        .route("/sessions", get(list_published_handler));

    // Owner-scoped routes (bearer token required)
    let protected_routes = Router::new()
        .route("/sessions/my-sessions", get(list_my_sessions_handler))
        .route("/sessions/my-sessions/save-draft", post(save_draft_handler))
        .route("/sessions/my-sessions/publish", post(publish_handler))
        .route(
            "/sessions/my-sessions/{id}",
            get(get_my_session_handler).delete(delete_my_session_handler),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_auth,
        ));

    let api_router = Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .with_state(app_state);

    Router::new()
        .merge(api_router)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
