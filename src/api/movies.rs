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
use crate::models::catalog::{Actor, LinkOutcome, Movie, Review};

const MOVIE_NOT_FOUND: &str = "Movie not found";

#[derive(Deserialize)]
pub struct MovieRequest {
    pub title: Option<String>,
    pub release_year: Option<i32>,
}

#[derive(Deserialize)]
pub struct AttachActorRequest {
    pub actor_id: Option<i32>,
}

#[derive(Deserialize)]
pub struct AttachGenreRequest {
    #[serde(alias = "movie_genres_type")]
    pub name: Option<String>,
}

#[derive(Serialize)]
pub struct MovieDetail {
    #[serde(flatten)]
    pub movie: Movie,
    pub reviews: Vec<Review>,
    pub actors: Vec<Actor>,
    pub genres: Vec<String>,
}

/// GET /movies
pub async fn list_movies(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<Movie>>>, ApiError> {
    let movies = state.store().list_movies().await?;
    if movies.is_empty() {
        return Err(ApiError::not_found("No movies found"));
    }
    Ok(Json(ApiResponse::success(movies)))
}

/// GET /movies/{id}
pub async fn get_movie(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<ApiResponse<MovieDetail>>, ApiError> {
    let store = state.store();
    let movie = store
        .get_movie(id)
        .await?
        .ok_or_else(|| ApiError::not_found(MOVIE_NOT_FOUND))?;

    let (reviews, actors, genres) = tokio::try_join!(
        store.list_reviews_for_movie(id),
        store.get_movie_actors(id),
        store.get_movie_genres(id),
    )?;

    Ok(Json(ApiResponse::success(MovieDetail {
        movie,
        reviews,
        actors,
        genres,
    })))
}

/// POST /movies
pub async fn create_movie(
    State(state): State<Arc<AppState>>,
    _auth: Authorized<AdminOnly>,
    ApiJson(payload): ApiJson<MovieRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Value>>), ApiError> {
    let title = required_text(payload.title.as_deref())
        .ok_or_else(|| ApiError::validation("Missing required fields: title"))?;

    let movie = state
        .store()
        .create_movie(title, payload.release_year)
        .await?;
    tracing::info!(movie_id = movie.movie_id, "Movie added");

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "Movie added successfully",
            json!({ "movie_id": movie.movie_id }),
        )),
    ))
}

/// PUT /movies/{id}
pub async fn update_movie(
    State(state): State<Arc<AppState>>,
    _auth: Authorized<AdminOnly>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(payload): ApiJson<MovieRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let title = required_text(payload.title.as_deref())
        .ok_or_else(|| ApiError::validation("Title is required"))?;

    if !state
        .store()
        .update_movie(id, title, payload.release_year)
        .await?
    {
        return Err(ApiError::not_found(MOVIE_NOT_FOUND));
    }

    Ok(Json(ApiResponse::message("Movie updated successfully")))
}

/// DELETE /movies/{id}
pub async fn delete_movie(
    State(state): State<Arc<AppState>>,
    _auth: Authorized<AdminOnly>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    if !state.store().delete_movie(id).await? {
        return Err(ApiError::not_found(MOVIE_NOT_FOUND));
    }

    tracing::info!(movie_id = id, "Movie deleted");
    Ok(Json(ApiResponse::message("Movie deleted successfully")))
}

/// GET /movies/{id}/actors
pub async fn list_movie_actors(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<ApiResponse<Vec<Actor>>>, ApiError> {
    let actors = state.store().get_movie_actors(id).await?;
    if actors.is_empty() {
        return Err(ApiError::not_found("No actors found for this movie"));
    }
    Ok(Json(ApiResponse::success(actors)))
}

/// GET /movies/{id}/genres
pub async fn list_movie_genres(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<ApiResponse<Vec<String>>>, ApiError> {
    let genres = state.store().get_movie_genres(id).await?;
    if genres.is_empty() {
        return Err(ApiError::not_found("No genres found for this movie"));
    }
    Ok(Json(ApiResponse::success(genres)))
}

/// POST /movies/{id}/actors
pub async fn attach_actor(
    State(state): State<Arc<AppState>>,
    _auth: Authorized<AdminOnly>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(payload): ApiJson<AttachActorRequest>,
) -> Result<(StatusCode, Json<ApiResponse<()>>), ApiError> {
    let actor_id = payload
        .actor_id
        .ok_or_else(|| ApiError::validation("actor_id is required"))?;

    let store = state.store();
    if store.get_movie(id).await?.is_none() {
        return Err(ApiError::not_found(MOVIE_NOT_FOUND));
    }
    if store.get_actor(actor_id).await?.is_none() {
        return Err(ApiError::not_found("Actor not found"));
    }

    Ok(match store.attach_actor(id, actor_id).await? {
        LinkOutcome::Linked => (
            StatusCode::CREATED,
            Json(ApiResponse::message("Actor added to the movie successfully")),
        ),
        LinkOutcome::AlreadyLinked => (
            StatusCode::OK,
            Json(ApiResponse::message(
                "Actor already associated with this movie",
            )),
        ),
    })
}

/// POST /movies/{id}/genres
pub async fn attach_genre(
    State(state): State<Arc<AppState>>,
    _auth: Authorized<AdminOnly>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(payload): ApiJson<AttachGenreRequest>,
) -> Result<(StatusCode, Json<ApiResponse<()>>), ApiError> {
    let name = required_text(payload.name.as_deref())
        .ok_or_else(|| ApiError::validation("Genre name is required"))?;

    let store = state.store();
    if store.get_movie(id).await?.is_none() {
        return Err(ApiError::not_found(MOVIE_NOT_FOUND));
    }
    let genre = store
        .get_genre(name)
        .await?
        .ok_or_else(|| ApiError::not_found("Genre not found"))?;

    Ok(match store.attach_genre(id, genre.genre_id).await? {
        LinkOutcome::Linked => (
            StatusCode::CREATED,
            Json(ApiResponse::message("Genre added to the movie successfully")),
        ),
        LinkOutcome::AlreadyLinked => (
            StatusCode::OK,
            Json(ApiResponse::message(
                "Genre already associated with this movie",
            )),
        ),
    })
}
