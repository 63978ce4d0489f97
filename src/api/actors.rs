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
use crate::models::catalog::{Actor, Movie};

const ACTOR_NOT_FOUND: &str = "Actor not found";

#[derive(Deserialize)]
pub struct ActorRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl ActorRequest {
    fn names(&self) -> Result<(&str, &str), ApiError> {
        required_text(self.first_name.as_deref())
            .zip(required_text(self.last_name.as_deref()))
            .ok_or_else(|| ApiError::validation("First name and last name are required"))
    }
}

#[derive(Serialize)]
pub struct ActorDetail {
    #[serde(flatten)]
    pub actor: Actor,
    pub movies: Vec<Movie>,
}

/// GET /actors
pub async fn list_actors(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<Actor>>>, ApiError> {
    let actors = state.store().list_actors().await?;
    Ok(Json(ApiResponse::success(actors)))
}

/// GET /actors/{id}
pub async fn get_actor(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<ApiResponse<ActorDetail>>, ApiError> {
    let actor = state
        .store()
        .get_actor(id)
        .await?
        .ok_or_else(|| ApiError::not_found(ACTOR_NOT_FOUND))?;
    let movies = state.store().get_movies_for_actor(id).await?;

    Ok(Json(ApiResponse::success(ActorDetail { actor, movies })))
}

/// POST /actors
pub async fn create_actor(
    State(state): State<Arc<AppState>>,
    _auth: Authorized<AdminOnly>,
    ApiJson(payload): ApiJson<ActorRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Value>>), ApiError> {
    let (first_name, last_name) = payload.names()?;
    let actor = state.store().create_actor(first_name, last_name).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::with_message(
            "Actor created successfully",
            json!({ "actor_id": actor.actor_id }),
        )),
    ))
}

/// PUT /actors/{id}
pub async fn update_actor(
    State(state): State<Arc<AppState>>,
    _auth: Authorized<AdminOnly>,
    ApiPath(id): ApiPath<i32>,
    ApiJson(payload): ApiJson<ActorRequest>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    let (first_name, last_name) = payload.names()?;

    if !state
        .store()
        .update_actor(id, first_name, last_name)
        .await?
    {
        return Err(ApiError::not_found(ACTOR_NOT_FOUND));
    }

    Ok(Json(ApiResponse::message("Actor updated successfully")))
}

/// DELETE /actors/{id}
pub async fn delete_actor(
    State(state): State<Arc<AppState>>,
    _auth: Authorized<AdminOnly>,
    ApiPath(id): ApiPath<i32>,
) -> Result<Json<ApiResponse<()>>, ApiError> {
    if !state.store().delete_actor(id).await? {
        return Err(ApiError::not_found(ACTOR_NOT_FOUND));
    }
    Ok(Json(ApiResponse::message("Actor deleted successfully")))
}
