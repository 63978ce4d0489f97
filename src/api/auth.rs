use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_sessions::Session;

use super::extract::{AnyReviewer, ApiJson, Authorized};
use super::{ApiError, ApiResponse, AppState};
use crate::services::authenticator::{CredentialKind, SESSION_IDENTITY_KEY};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Deserialize)]
pub struct CredentialsRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

impl CredentialsRequest {
    fn parts(&self) -> (&str, &str) {
        (
            self.username.as_deref().unwrap_or_default(),
            self.password.as_deref().unwrap_or_default(),
        )
    }
}

#[derive(Serialize)]
pub struct SignupResponse {
    pub user_id: i32,
}

#[derive(Serialize)]
pub struct SigninResponse {
    pub user_id: i32,
    pub is_admin: bool,
}

#[derive(Serialize)]
pub struct ProfileResponse {
    pub user_id: i32,
    pub username: String,
    pub is_admin: bool,
    pub created_at: String,
    pub credential_kind: CredentialKind,
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /signup
pub async fn signup(
    State(state): State<Arc<AppState>>,
    ApiJson(payload): ApiJson<CredentialsRequest>,
) -> Result<(StatusCode, Json<ApiResponse<SignupResponse>>), ApiError> {
    let (username, password) = payload.parts();
    let user = state.auth_service().signup(username, password).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "User registered successfully",
            SignupResponse {
                user_id: user.user_id,
            },
        )),
    ))
}

/// POST /signin
/// Verifies the password and binds the user to the session.
pub async fn signin(
    State(state): State<Arc<AppState>>,
    session: Session,
    ApiJson(payload): ApiJson<CredentialsRequest>,
) -> Result<Json<ApiResponse<SigninResponse>>, ApiError> {
    let (username, password) = payload.parts();
    let signed_in = state.auth_service().signin(username, password).await?;

    // New id on privilege change
    session
        .cycle_id()
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create session: {e}")))?;
    session
        .insert(SESSION_IDENTITY_KEY, &signed_in.identity)
        .await
        .map_err(|e| ApiError::internal(format!("Failed to create session: {e}")))?;

    Ok(Json(ApiResponse::with_message(
        "Login successful",
        SigninResponse {
            user_id: signed_in.user.user_id,
            is_admin: signed_in.user.is_admin,
        },
    )))
}

/// POST /signout
pub async fn signout(session: Session) -> Result<Json<ApiResponse<()>>, ApiError> {
    session
        .flush()
        .await
        .map_err(|e| ApiError::internal(format!("Failed to end session: {e}")))?;

    Ok(Json(ApiResponse::message("Logged out successfully")))
}

/// GET /profile
pub async fn profile(
    State(state): State<Arc<AppState>>,
    auth: Authorized<AnyReviewer>,
) -> Result<Json<ApiResponse<ProfileResponse>>, ApiError> {
    let user = state.auth_service().user_info(auth.user_id).await?;

    Ok(Json(ApiResponse::success(ProfileResponse {
        user_id: user.user_id,
        username: user.username,
        is_admin: user.is_admin,
        created_at: user.created_at,
        credential_kind: auth.kind,
    })))
}
