//! Domain service for accounts and API key lifecycle.
//!
//! Handles signup, sign-in, profile lookup, and issuing, listing and revoking API keys.

use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::db::User;
use crate::services::authenticator::SessionIdentity;

/// Errors specific to authentication and authorization.
///
/// The `Display` text is the message returned to the client.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Provide either a session or a bearer token, not both")]
    ConflictingCredentials,

    #[error("Invalid API key")]
    InvalidApiKey,

    #[error("API key has expired")]
    ExpiredApiKey,

    #[error("No stored API keys for this user")]
    NoStoredKeys,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Authentication required")]
    AuthenticationRequired,

    #[error("Invalid password")]
    InvalidPassword,

    #[error("User not found")]
    UserNotFound,

    #[error("{0}")]
    Forbidden(String),

    #[error("Username already exists")]
    UsernameTaken,

    #[error("{0}")]
    Validation(String),

    #[error("Token not found for this user")]
    TokenNotFound,

    #[error("No tokens found for this user")]
    NoTokens,

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        match self {
            Self::ConflictingCredentials | Self::UsernameTaken | Self::Validation(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::InvalidApiKey
            | Self::ExpiredApiKey
            | Self::NoStoredKeys
            | Self::InvalidCredentials
            | Self::AuthenticationRequired
            | Self::InvalidPassword => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::UserNotFound | Self::TokenNotFound | Self::NoTokens => StatusCode::NOT_FOUND,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<anyhow::Error> for AuthError {
    fn from(err: anyhow::Error) -> Self {
        Self::Internal(err.to_string())
    }
}

/// Public view of an account.
#[derive(Debug, Clone, Serialize)]
pub struct UserInfo {
    pub user_id: i32,
    pub username: String,
    pub is_admin: bool,
    pub created_at: String,
}

impl From<User> for UserInfo {
    fn from(user: User) -> Self {
        Self {
            user_id: user.id,
            username: user.username,
            is_admin: user.is_admin,
            created_at: user.created_at,
        }
    }
}

/// Result of a successful sign-in. `identity` is what the session keeps.
#[derive(Debug, Clone)]
pub struct SignIn {
    pub user: UserInfo,
    pub identity: SessionIdentity,
}

/// Stored key metadata. Never carries token material.
#[derive(Debug, Clone, Serialize)]
pub struct ApiKeySummary {
    pub key_id: i32,
    pub created_at: String,
}

/// A freshly issued key. `token` is shown to the caller exactly once.
#[derive(Debug, Clone, Serialize)]
pub struct IssuedApiKey {
    pub key_id: i32,
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

#[async_trait::async_trait]
pub trait AuthService: Send + Sync {
    /// Creates a reviewer account.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::UsernameTaken`] if the username is in use.
    async fn signup(&self, username: &str, password: &str) -> Result<UserInfo, AuthError>;

    /// Checks a username and password.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::UserNotFound`] or [`AuthError::InvalidPassword`].
    async fn signin(&self, username: &str, password: &str) -> Result<SignIn, AuthError>;

    async fn user_info(&self, user_id: i32) -> Result<UserInfo, AuthError>;

    async fn list_api_keys(&self, user_id: i32) -> Result<Vec<ApiKeySummary>, AuthError>;

    /// Issues a key valid for `expiration_hours`, or the configured default.
    ///
    /// # Errors
    ///
    /// Returns [`AuthError::Validation`] for a non-positive or too long lifetime.
    /// Nothing is persisted in that case.
    async fn issue_api_key(
        &self,
        user_id: i32,
        expiration_hours: Option<f64>,
    ) -> Result<IssuedApiKey, AuthError>;

    /// Deletes one of the caller's own keys.
    async fn revoke_api_key(&self, user_id: i32, key_id: i32) -> Result<(), AuthError>;
}
