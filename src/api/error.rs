use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;

use super::ApiResponse;
use crate::services::AuthError;

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),

    ValidationError(String),

    Conflict(String),

    InternalError(String),

    Unauthorized(String),

    Forbidden(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
            Self::ValidationError(msg) => write!(f, "Validation error: {msg}"),
            Self::Conflict(msg) => write!(f, "Conflict: {msg}"),
            Self::InternalError(msg) => write!(f, "Internal error: {msg}"),
            Self::Unauthorized(msg) => write!(f, "Unauthorized: {msg}"),
            Self::Forbidden(msg) => write!(f, "Forbidden: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            // Duplicate usernames and mixed credential modes are client errors
            Self::ValidationError(msg) | Self::Conflict(msg) => (StatusCode::BAD_REQUEST, msg),
            Self::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
            Self::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg),
            Self::Forbidden(msg) => (StatusCode::FORBIDDEN, msg),
        };

        let body = ApiResponse::<()>::error(error_message);
        (status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        Self::InternalError(format!("{err:#}"))
    }
}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::Internal(msg) => Self::InternalError(msg),
            AuthError::ConflictingCredentials | AuthError::UsernameTaken => {
                Self::Conflict(err.to_string())
            }
            AuthError::Validation(msg) => Self::ValidationError(msg),
            AuthError::Forbidden(msg) => Self::Forbidden(msg),
            AuthError::UserNotFound | AuthError::TokenNotFound | AuthError::NoTokens => {
                Self::NotFound(err.to_string())
            }
            AuthError::InvalidApiKey
            | AuthError::ExpiredApiKey
            | AuthError::NoStoredKeys
            | AuthError::InvalidCredentials
            | AuthError::AuthenticationRequired
            | AuthError::InvalidPassword => Self::Unauthorized(err.to_string()),
        }
    }
}

impl ApiError {
    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::ValidationError(msg.into())
    }

    pub fn forbidden(msg: impl Into<String>) -> Self {
        Self::Forbidden(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::InternalError(msg.into())
    }

    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::ValidationError(_) | Self::Conflict(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_errors_keep_their_status() {
        let cases = [
            AuthError::ConflictingCredentials,
            AuthError::InvalidApiKey,
            AuthError::NoStoredKeys,
            AuthError::UserNotFound,
            AuthError::Forbidden("no".to_string()),
            AuthError::UsernameTaken,
            AuthError::TokenNotFound,
            AuthError::Internal("boom".to_string()),
        ];

        for err in cases {
            let expected = err.status_code();
            assert_eq!(ApiError::from(err).status_code(), expected);
        }
    }

    #[test]
    fn test_auth_error_message_is_preserved() {
        match ApiError::from(AuthError::ExpiredApiKey) {
            ApiError::Unauthorized(msg) => assert_eq!(msg, "API key has expired"),
            other => panic!("unexpected {other:?}"),
        }
    }
}
