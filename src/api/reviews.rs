use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;

use super::extract::{
    AdminOnly, AnyReviewer, ApiJson, ApiPath, Authorized, ReviewerOnly,
};
use super::validation::{required_text, validate_star_rating};
use super::{ApiError, ApiResponse, AppState};
use crate::models::catalog::{Review, ReviewDetail};

const REVIEW_NOT_FOUND: &str = "Review not found";

#[derive(Deserialize)]
pub struct ReviewRequest {
    pub star_rating: Option<f64>,
    pub review_text: Option<String>,
}

impl ReviewRequest {
    fn fields(&self, missing: &str) -> Result<(f64, &str), ApiError> {
        let (rating, text) = self
            .star_rating
            .zip(required_text(self.review_text.as_deref()))
            .ok_or_else(|| ApiError::validation(missing))?;
        Ok((validate_star_rating(rating)?, text))
    }
}

// ============================================================================
// Per-movie reviews
// ============================================================================

/// GET /movies/{id}/reviews
pub async fn list_movie_reviews(
    State(state): State<Arc<AppState>>,
    ApiPath(movie_id): ApiPath<i32>,
) -> Result<Json<ApiResponse<Vec<Review>>>, ApiError> {
    let reviews = state.store().list_reviews_for_movie(movie_id).await?;
    if reviews.is_empty() {
        return Err(ApiError::not_found("No reviews found for this movie"));
    }
    Ok(Json(ApiResponse::with_message(
        "Reviews retrieved successfully",
        reviews,
    )))
}

/// POST /movies/{id}/reviews
/// Written by reviewers only; admins moderate.
pub async fn create_review(
    State(state): State<Arc<AppState>>,
    auth: Authorized<ReviewerOnly>,
    ApiPath(movie_id): ApiPath<i32>,
    ApiJson(payload): ApiJson<ReviewRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Value>>), ApiError> {
    let (rating, text) =
        payload.fields("Missing required fields: 'star_rating' and 'review_text'")?;

    if state.store().get_movie(movie_id).await?.is_none() {
        return Err(ApiError::not_found(format!(
            "Movie with ID {movie_id} not found"
        )));
    }

    let review = state
        .store()
        .create_review(movie_id, auth.user_id, rating, text)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "Review added successfully",
            json!({ "review_id": review.review_id }),
        )),
    ))
}

// ============================================================================
// Moderation
// ============================================================================

/// GET /reviews
pub async fn list_reviews(
    State(state): State<Arc<AppState>>,
    _auth: Authorized<AdminOnly>,
) -> Result<Json<ApiResponse<Vec<ReviewDetail>>>, ApiError> {
    let reviews = state.store().list_reviews().await?;
    if reviews.is_empty() {
        return Err(ApiError::not_found("No reviews found"));
    }
    Ok(Json(ApiResponse::success(reviews)))
}

/// GET /reviews/{id}
pub async fn get_review(
    State(state): State<Arc<AppState>>,
    _auth: Authorized<AdminOnly>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<ApiResponse<ReviewDetail>>, ApiError> {
    let review = state
        .store()
        .get_review_detail(id)
        .await?
        .ok_or_else(|| ApiError::not_found(REVIEW_NOT_FOUND))?;
    Ok(Json(ApiResponse::success(review)))
}

/// DELETE /reviews/{id}
pub async fn delete_review(
    State(state): State<Arc<AppState>>,
    auth: Authorized<AdminOnly>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    if !state.store().delete_review(id).await? {
        return Err(ApiError::not_found(REVIEW_NOT_FOUND));
    }

    tracing::info!(review_id = id, moderator = auth.user_id, "Review removed");
    Ok(Json(ApiResponse::message("Review deleted successfully")))
}

// ============================================================================
// Own reviews
// ============================================================================

/// GET /profile/reviews
pub async fn list_own_reviews(
    State(state): State<Arc<AppState>>,
    auth: Authorized<AnyReviewer>,
) -> Result<Json<ApiResponse<Vec<ReviewDetail>>>, ApiError> {
    let reviews = state.store().list_reviews_for_user(auth.user_id).await?;
    if reviews.is_empty() {
        return Err(ApiError::not_found("No reviews found for this user"));
    }
    Ok(Json(ApiResponse::success(reviews)))
}

/// PUT /profile/reviews/{id}
pub async fn update_own_review(
    State(state): State<Arc<AppState>>,
    auth: Authorized<AnyReviewer>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(payload): ApiJson<ReviewRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let (rating, text) = payload.fields("Star rating and review text are required")?;

    let review = owned_review(&state, id, auth.user_id, "update").await?;
    state
        .store()
        .update_review(review.review_id, rating, text)
        .await?;

    Ok(Json(ApiResponse::message("Review updated successfully")))
}

/// DELETE /profile/reviews/{id}
pub async fn delete_own_review(
    State(state): State<Arc<AppState>>,
    auth: Authorized<AnyReviewer>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let review = owned_review(&state, id, auth.user_id, "delete").await?;
    state.store().delete_review(review.review_id).await?;

    Ok(Json(ApiResponse::message("Review deleted successfully")))
}

async fn owned_review(
    state: &AppState,
    id: i32,
    user_id: i32,
    action: &str,
) -> Result<Review, ApiError> {
    let review = state
        .store()
        .get_review(id)
        .await?
        .ok_or_else(|| ApiError::not_found(REVIEW_NOT_FOUND))?;

    if review.user_id != user_id {
        return Err(ApiError::forbidden(format!(
            "You can only {action} your own reviews"
        )));
    }
    Ok(review)
}
