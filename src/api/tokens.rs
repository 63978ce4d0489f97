use axum::{
    Json,
    body::Bytes,
    extract::State,
    http::StatusCode,
};
use serde::Serialize;
use std::sync::Arc;

use super::extract::{AnyReviewer, ApiPath, Authorized};
use super::validation::parse_expiration_hours;
use super::{ApiError, ApiResponse, AppState};
use crate::services::auth_service::{ApiKeySummary, IssuedApiKey};

#[derive(Serialize)]
pub struct TokenList {
    pub tokens: Vec<ApiKeySummary>,
}

/// GET /tokens
/// Lists the caller's keys. Token material is never returned here.
pub async fn list_tokens(
    State(state): State<Arc<AppState>>,
    auth: Authorized<AnyReviewer>,
) -> Result<Json<ApiResponse<TokenList>>, ApiError> {
    let tokens = state.auth_service().list_api_keys(auth.user_id).await?;
    Ok(Json(ApiResponse::success(TokenList { tokens })))
}

/// POST /tokens
/// Body: `{"expiration_hours": <positive number>}`, optional.
pub async fn create_token(
    State(state): State<Arc<AppState>>,
    auth: Authorized<AnyReviewer>,
    body: Bytes,
) -> Result<(StatusCode, Json<ApiResponse<IssuedApiKey>>), ApiError> {
    let expiration_hours = parse_expiration_hours(&body)?;

    let issued = state
        .auth_service()
        .issue_api_key(auth.user_id, expiration_hours)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message("Token created successfully", issued)),
    ))
}

/// DELETE /tokens/{id}
pub async fn delete_token(
    State(state): State<Arc<AppState>>,
    auth: Authorized<AnyReviewer>,
    ApiPath(key_id): ApiPath<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    state
        .auth_service()
        .revoke_api_key(auth.user_id, key_id)
        .await?;

    Ok(Json(ApiResponse::message("Token deleted successfully")))
}
