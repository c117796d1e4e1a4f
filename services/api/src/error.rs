//! services/api/src/error.rs
//!
//! Defines the primary error type for the entire API service and how it is
//! rendered as an HTTP response.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use tracing::error;
use utoipa::ToSchema;
use wellness_core::ports::PortError;

use crate::config::ConfigError;

/// The primary error type for the `api` service.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Represents an error that occurred during configuration loading.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Represents an error that propagated up from one of the core service ports.
    #[error("Service Port Error: {0}")]
    Port(#[from] PortError),

    /// Represents an error from the underlying database library.
    #[error("Database Error: {0}")]
    Database(#[from] sqlx::Error),

    /// Represents a standard Input/Output error (e.g., binding to a network socket).
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A catch-all for any other unexpected errors.
    #[error("An unexpected internal error occurred: {0}")]
    Internal(String),
}

/// The JSON body of error responses on the `/sessions` routes.
#[derive(Serialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
}

impl ApiError {
    /// The status code and client-facing message. Unexpected failures are reduced
    /// to a generic message so no internals leak.
    fn status_and_message(&self) -> (StatusCode, String) {
        match self {
            ApiError::Port(PortError::Conflict(_)) => {
                (StatusCode::BAD_REQUEST, "User already exists".to_string())
            }
            ApiError::Port(PortError::Validation(msg)) => (StatusCode::BAD_REQUEST, msg.clone()),
            ApiError::Port(PortError::Unauthorized) => {
                (StatusCode::UNAUTHORIZED, "Invalid credentials".to_string())
            }
            ApiError::Port(PortError::NotFound(_)) => {
                (StatusCode::NOT_FOUND, "Session not found".to_string())
            }
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "Server error".to_string()),
        }
    }

    /// Logs server-side failures and returns what the client is allowed to see.
    pub(crate) fn into_status_and_message(self) -> (StatusCode, String) {
        let (status, message) = self.status_and_message();
        if status.is_server_error() {
            error!("Request failed: {:?}", self);
        }
        (status, message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = self.into_status_and_message();
        (status, Json(ErrorBody { error: message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn port_errors_map_to_status_codes() {
        let cases = [
            (PortError::Conflict("a@x.com".into()), StatusCode::BAD_REQUEST),
            (PortError::Validation("title is required".into()), StatusCode::BAD_REQUEST),
            (PortError::Unauthorized, StatusCode::UNAUTHORIZED),
            (PortError::NotFound("x".into()), StatusCode::NOT_FOUND),
            (PortError::Unexpected("pool timed out".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, expected) in cases {
            assert_eq!(ApiError::from(err).into_response().status(), expected);
        }
    }

    #[test]
    fn internal_details_are_not_exposed() {
        let (status, message) =
            ApiError::Port(PortError::Unexpected("relation \"sessions\" does not exist".into()))
                .status_and_message();
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(message, "Server error");
    }

    #[test]
    fn validation_message_is_passed_through() {
        let (_, message) =
            ApiError::Port(PortError::Validation("title is required".into())).status_and_message();
        assert_eq!(message, "title is required");
    }
}
