use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, ModelTrait, QueryFilter,
    QueryOrder, Set,
};

use crate::db::is_unique_violation;
use crate::entities::{actors, genres, movie_actors, movie_genres, movies, prelude::*};
use crate::models::catalog::{Actor, LinkOutcome, Movie};

pub struct MovieRepository {
    conn: DatabaseConnection,
}

impl MovieRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list(&self) -> Result<Vec<Movie>> {
        let rows = Movies::find()
            .order_by_asc(movies::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list movies")?;

        Ok(rows.into_iter().map(Movie::from).collect())
    }

    pub async fn get(&self, id: i32) -> Result<Option<Movie>> {
        let movie = Movies::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query movie")?;

        Ok(movie.map(Movie::from))
    }

    pub async fn create(&self, title: &str, release_year: Option<i32>) -> Result<Movie> {
        let model = movies::ActiveModel {
            title: Set(title.to_string()),
            release_year: Set(release_year),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .context("Failed to insert movie")?;

        Ok(Movie::from(model))
    }

    pub async fn update(&self, id: i32, title: &str, release_year: Option<i32>) -> Result<bool> {
        let Some(existing) = Movies::find_by_id(id).one(&self.conn).await? else {
            return Ok(false);
        };

        let mut active: movies::ActiveModel = existing.into();
        active.title = Set(title.to_string());
        active.release_year = Set(release_year);
        active
            .update(&self.conn)
            .await
            .context("Failed to update movie")?;

        Ok(true)
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = Movies::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete movie")?;

        Ok(result.rows_affected > 0)
    }

    pub async fn actors(&self, movie_id: i32) -> Result<Vec<Actor>> {
        let Some(movie) = Movies::find_by_id(movie_id).one(&self.conn).await? else {
            return Ok(Vec::new());
        };

        let rows = movie
            .find_related(Actors)
            .order_by_asc(actors::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to query movie actors")?;

        Ok(rows.into_iter().map(Actor::from).collect())
    }

    pub async fn genre_names(&self, movie_id: i32) -> Result<Vec<String>> {
        let Some(movie) = Movies::find_by_id(movie_id).one(&self.conn).await? else {
            return Ok(Vec::new());
        };

        let rows = movie
            .find_related(Genres)
            .order_by_asc(genres::Column::Name)
            .all(&self.conn)
            .await
            .context("Failed to query movie genres")?;

        Ok(rows.into_iter().map(|g| g.name).collect())
    }

    pub async fn attach_actor(&self, movie_id: i32, actor_id: i32) -> Result<LinkOutcome> {
        let existing = MovieActors::find_by_id((movie_id, actor_id))
            .one(&self.conn)
            .await
            .context("Failed to query movie actor link")?;
        if existing.is_some() {
            return Ok(LinkOutcome::AlreadyLinked);
        }

        let link = movie_actors::ActiveModel {
            movie_id: Set(movie_id),
            actor_id: Set(actor_id),
        };

        match MovieActors::insert(link).exec(&self.conn).await {
            Ok(_) => Ok(LinkOutcome::Linked),
            Err(e) if is_unique_violation(&e) => Ok(LinkOutcome::AlreadyLinked),
            Err(e) => Err(e).context("Failed to link actor to movie"),
        }
    }

    pub async fn attach_genre(&self, movie_id: i32, genre_id: i32) -> Result<LinkOutcome> {
        let existing = MovieGenres::find_by_id((movie_id, genre_id))
            .one(&self.conn)
            .await
            .context("Failed to query movie genre link")?;
        if existing.is_some() {
            return Ok(LinkOutcome::AlreadyLinked);
        }

        let link = movie_genres::ActiveModel {
            movie_id: Set(movie_id),
            genre_id: Set(genre_id),
        };

        match MovieGenres::insert(link).exec(&self.conn).await {
            Ok(_) => Ok(LinkOutcome::Linked),
            Err(e) if is_unique_violation(&e) => Ok(LinkOutcome::AlreadyLinked),
            Err(e) => Err(e).context("Failed to link genre to movie"),
        }
    }

    /// Movies carrying a given genre
    pub async fn with_genre(&self, genre_id: i32) -> Result<Vec<Movie>> {
        let rows = Movies::find()
            .inner_join(MovieGenres)
            .filter(movie_genres::Column::GenreId.eq(genre_id))
            .order_by_asc(movies::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to query movies for genre")?;

        Ok(rows.into_iter().map(Movie::from).collect())
    }

    /// Movies an actor appears in
    pub async fn with_actor(&self, actor_id: i32) -> Result<Vec<Movie>> {
        let rows = Movies::find()
            .inner_join(MovieActors)
            .filter(movie_actors::Column::ActorId.eq(actor_id))
            .order_by_asc(movies::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to query movies for actor")?;

        Ok(rows.into_iter().map(Movie::from).collect())
    }
}
