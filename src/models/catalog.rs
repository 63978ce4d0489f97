//! Typed catalog records returned by the repositories.

use sea_orm::FromQueryResult;
use serde::Serialize;

use crate::entities::{actors, genres, movies, reviews};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Movie {
    pub movie_id: i32,
    pub title: String,
    pub release_year: Option<i32>,
}

impl From<movies::Model> for Movie {
    fn from(model: movies::Model) -> Self {
        Self {
            movie_id: model.id,
            title: model.title,
            release_year: model.release_year,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Actor {
    pub actor_id: i32,
    pub first_name: String,
    pub last_name: String,
}

impl From<actors::Model> for Actor {
    fn from(model: actors::Model) -> Self {
        Self {
            actor_id: model.id,
            first_name: model.first_name,
            last_name: model.last_name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Genre {
    pub genre_id: i32,
    pub name: String,
}

impl From<genres::Model> for Genre {
    fn from(model: genres::Model) -> Self {
        Self {
            genre_id: model.id,
            name: model.name,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Review {
    pub review_id: i32,
    pub movie_id: i32,
    pub user_id: i32,
    pub star_rating: f64,
    pub review_text: String,
    pub created_at: String,
}

impl From<reviews::Model> for Review {
    fn from(model: reviews::Model) -> Self {
        Self {
            review_id: model.id,
            movie_id: model.movie_id,
            user_id: model.user_id,
            star_rating: model.star_rating,
            review_text: model.review_text,
            created_at: model.created_at,
        }
    }
}

/// Review joined with its movie title and author
#[derive(Debug, Clone, PartialEq, Serialize, FromQueryResult)]
pub struct ReviewDetail {
    pub review_id: i32,
    pub movie_id: i32,
    pub user_id: i32,
    pub star_rating: f64,
    pub review_text: String,
    pub created_at: String,
    pub movie_title: String,
    pub username: String,
}

/// Result of linking an actor or genre to a movie
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkOutcome {
    Linked,
    AlreadyLinked,
}
