use axum::{
    Json,
    extract::State,
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;

use super::extract::{AdminOnly, ApiJson, ApiPath, Authorized};
use super::validation::required_text;
use super::{ApiError, ApiResponse, AppState};
use crate::models::catalog::Movie;

#[derive(Deserialize)]
pub struct GenreRequest {
    #[serde(alias = "movie_genres_type")]
    pub name: Option<String>,
}

#[derive(Serialize)]
pub struct GenreDetail {
    pub name: String,
    pub movies: Vec<Movie>,
}

/// GET /genres
pub async fn list_genres(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<String>>>, ApiError> {
    let names = state.store().list_genre_names().await?;
    Ok(Json(ApiResponse::success(names)))
}

/// GET /genres/{name}
pub async fn get_genre(
    State(state): State<Arc<AppState>>,
    ApiPath(name): ApiPath<String>,
) -> Result<Json<ApiResponse<GenreDetail>>, ApiError> {
    let genre = state
        .store()
        .get_genre(&name)
        .await?
        .ok_or_else(|| ApiError::not_found("Genre not found"))?;
    let movies = state.store().get_movies_for_genre(genre.genre_id).await?;

    Ok(Json(ApiResponse::success(GenreDetail {
        name: genre.name,
        movies,
    })))
}

/// POST /genres
pub async fn create_genre(
    State(state): State<Arc<AppState>>,
    _auth: Authorized<AdminOnly>,
    ApiJson(payload): ApiJson<GenreRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Value>>), ApiError> {
    let name = required_text(payload.name.as_deref())
        .ok_or_else(|| ApiError::validation("Genre type is required"))?;

    let genre = state
        .store()
        .create_genre(name)
        .await?
        .ok_or_else(|| ApiError::Conflict("Genre already exists".to_string()))?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "Genre added successfully",
            json!({ "genre_id": genre.genre_id, "name": genre.name }),
        )),
    ))
}

/// DELETE /genres/{name}
pub async fn delete_genre(
    State(state): State<Arc<AppState>>,
    _auth: Authorized<AdminOnly>,
    ApiPath(name): ApiPath<String>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    if !state.store().delete_genre(&name).await? {
        return Err(ApiError::not_found("Genre not found"));
    }
    Ok(Json(ApiResponse::message("Genre deleted successfully")))
}
