//! Request-level error taxonomy.
//!
//! Every variant carries the short message that ends up in the
//! `{"error": message}` response body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Missing or malformed field, out-of-range value, unparseable body.
    #[error("{0}")]
    Validation(String),

    /// Missing or incorrect password.
    #[error("{0}")]
    Auth(String),

    /// Team exists but belongs to someone else.
    #[error("{0}")]
    Forbidden(String),

    /// Unknown id, or an id that exists under a different team.
    #[error("{0}")]
    NotFound(String),

    /// Duplicate email or username.
    #[error("{0}")]
    Conflict(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn user_not_found() -> Self {
        Self::NotFound("user not found".to_string())
    }

    pub fn team_not_found() -> Self {
        Self::NotFound("team not found".to_string())
    }

    pub fn player_not_found() -> Self {
        Self::NotFound("player not found in team".to_string())
    }

    pub fn match_not_found() -> Self {
        Self::NotFound("match not found in team".to_string())
    }

    pub fn forbidden_team() -> Self {
        Self::Forbidden("forbidden: team does not belong to user".to_string())
    }

    pub fn invalid_password() -> Self {
        Self::Auth("invalid password".to_string())
    }

    pub fn invalid_credentials() -> Self {
        Self::Auth("invalid credentials".to_string())
    }

    pub fn poisoned() -> Self {
        Self::Internal("roster lock poisoned".to_string())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Auth(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Conflict(_) => StatusCode::CONFLICT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        if let Self::Internal(detail) = &self {
            tracing::error!(error = %detail, "Request failed with internal error");
        }
        let body = serde_json::json!({ "error": self.to_string() });
        (self.status(), Json(body)).into_response()
    }
}
