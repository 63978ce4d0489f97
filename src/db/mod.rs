use anyhow::Result;
use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, SqlErr, Statement,
};
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::models::catalog::{Actor, Genre, LinkOutcome, Movie, Review, ReviewDetail};

pub mod migrator;
pub mod repositories;

pub use repositories::api_key::ApiKeyRecord;
pub use repositories::user::User;

/// True when `err` is a unique or primary-key constraint violation.
#[must_use]
pub fn is_unique_violation(err: &DbErr) -> bool {
    matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}

#[derive(Clone)]
pub struct Store {
    pub conn: DatabaseConnection,
}

impl Store {
    pub async fn new(db_url: &str) -> Result<Self> {
        Self::with_pool_options(db_url, 5, 1).await
    }

    pub async fn with_pool_options(
        db_url: &str,
        max_connections: u32,
        min_connections: u32,
    ) -> Result<Self> {
        use sea_orm_migration::MigratorTrait;

        let path_str = db_url.trim_start_matches("sqlite:");
        if !path_str.starts_with(":memory:") {
            if let Some(parent) = Path::new(path_str).parent() {
                tokio::fs::create_dir_all(parent).await.ok();
            }
            if !Path::new(path_str).exists() {
                std::fs::File::create(path_str)?;
            }
        }

        let mut opt = ConnectOptions::new(db_url.to_string());
        opt.max_connections(max_connections)
            .min_connections(min_connections)
            .connect_timeout(Duration::from_secs(10))
            .acquire_timeout(Duration::from_secs(10))
            .idle_timeout(Duration::from_secs(300))
            .max_lifetime(Duration::from_secs(600))
            .sqlx_logging(false);

        let conn = Database::connect(opt).await?;

        migrator::Migrator::up(&conn, None).await?;

        info!(
            "Database connected & migrations applied (pool: {}-{})",
            min_connections, max_connections
        );

        Ok(Self { conn })
    }

    pub async fn ping(&self) -> Result<()> {
        let backend = self.conn.get_database_backend();
        self.conn
            .query_one(Statement::from_string(backend, "SELECT 1".to_string()))
            .await?;
        Ok(())
    }

    fn user_repo(&self) -> repositories::user::UserRepository {
        repositories::user::UserRepository::new(self.conn.clone())
    }

    fn api_key_repo(&self) -> repositories::api_key::ApiKeyRepository {
        repositories::api_key::ApiKeyRepository::new(self.conn.clone())
    }

    fn movie_repo(&self) -> repositories::movie::MovieRepository {
        repositories::movie::MovieRepository::new(self.conn.clone())
    }

    fn actor_repo(&self) -> repositories::actor::ActorRepository {
        repositories::actor::ActorRepository::new(self.conn.clone())
    }

    fn genre_repo(&self) -> repositories::genre::GenreRepository {
        repositories::genre::GenreRepository::new(self.conn.clone())
    }

    fn review_repo(&self) -> repositories::review::ReviewRepository {
        repositories::review::ReviewRepository::new(self.conn.clone())
    }

    // ========================================================================
    // Credentials
    // ========================================================================

    pub async fn create_user(&self, username: &str, password_hash: &str) -> Result<Option<User>> {
        self.user_repo().create(username, password_hash).await
    }

    pub async fn user_exists(&self, username: &str) -> Result<bool> {
        self.user_repo().exists(username).await
    }

    pub async fn get_user(&self, id: i32) -> Result<Option<User>> {
        self.user_repo().get_by_id(id).await
    }

    pub async fn get_user_by_username_with_password(
        &self,
        username: &str,
    ) -> Result<Option<(User, String)>> {
        self.user_repo()
            .get_by_username_with_password(username)
            .await
    }

    pub async fn get_user_password_hash(&self, user_id: i32) -> Result<Option<String>> {
        self.user_repo().get_password_hash(user_id).await
    }

    pub async fn set_user_admin(&self, username: &str, is_admin: bool) -> Result<bool> {
        self.user_repo().set_admin(username, is_admin).await
    }

    pub async fn insert_api_key(&self, user_id: i32, key_hash: &str) -> Result<ApiKeyRecord> {
        self.api_key_repo().insert(user_id, key_hash).await
    }

    pub async fn list_api_keys(&self, user_id: i32) -> Result<Vec<ApiKeyRecord>> {
        self.api_key_repo().list_for_user(user_id).await
    }

    pub async fn delete_api_key(&self, key_id: i32, user_id: i32) -> Result<bool> {
        self.api_key_repo().delete_for_user(key_id, user_id).await
    }

    // ========================================================================
    // Movies
    // ========================================================================

    pub async fn list_movies(&self) -> Result<Vec<Movie>> {
        self.movie_repo().list().await
    }

    pub async fn get_movie(&self, id: i32) -> Result<Option<Movie>> {
        self.movie_repo().get(id).await
    }

    pub async fn create_movie(&self, title: &str, release_year: Option<i32>) -> Result<Movie> {
        self.movie_repo().create(title, release_year).await
    }

    pub async fn update_movie(
        &self,
        id: i32,
        title: &str,
        release_year: Option<i32>,
    ) -> Result<bool> {
        self.movie_repo().update(id, title, release_year).await
    }

    pub async fn delete_movie(&self, id: i32) -> Result<bool> {
        self.movie_repo().delete(id).await
    }

    pub async fn get_movie_actors(&self, movie_id: i32) -> Result<Vec<Actor>> {
        self.movie_repo().actors(movie_id).await
    }

    pub async fn get_movie_genres(&self, movie_id: i32) -> Result<Vec<String>> {
        self.movie_repo().genre_names(movie_id).await
    }

    pub async fn attach_actor(&self, movie_id: i32, actor_id: i32) -> Result<LinkOutcome> {
        self.movie_repo().attach_actor(movie_id, actor_id).await
    }

    pub async fn attach_genre(&self, movie_id: i32, genre_id: i32) -> Result<LinkOutcome> {
        self.movie_repo().attach_genre(movie_id, genre_id).await
    }

    pub async fn get_movies_for_genre(&self, genre_id: i32) -> Result<Vec<Movie>> {
        self.movie_repo().with_genre(genre_id).await
    }

    pub async fn get_movies_for_actor(&self, actor_id: i32) -> Result<Vec<Movie>> {
        self.movie_repo().with_actor(actor_id).await
    }

    // ========================================================================
    // Actors
    // ========================================================================

    pub async fn list_actors(&self) -> Result<Vec<Actor>> {
        self.actor_repo().list().await
    }

    pub async fn get_actor(&self, id: i32) -> Result<Option<Actor>> {
        self.actor_repo().get(id).await
    }

    pub async fn create_actor(&self, first_name: &str, last_name: &str) -> Result<Actor> {
        self.actor_repo().create(first_name, last_name).await
    }

    pub async fn update_actor(&self, id: i32, first_name: &str, last_name: &str) -> Result<bool> {
        self.actor_repo().update(id, first_name, last_name).await
    }

    pub async fn delete_actor(&self, id: i32) -> Result<bool> {
        self.actor_repo().delete(id).await
    }

    // ========================================================================
    // Genres
    // ========================================================================

    pub async fn list_genre_names(&self) -> Result<Vec<String>> {
        self.genre_repo().list_names().await
    }

    pub async fn get_genre(&self, name: &str) -> Result<Option<Genre>> {
        self.genre_repo().get_by_name(name).await
    }

    pub async fn create_genre(&self, name: &str) -> Result<Option<Genre>> {
        self.genre_repo().create(name).await
    }

    pub async fn delete_genre(&self, name: &str) -> Result<bool> {
        self.genre_repo().delete_by_name(name).await
    }

    // ========================================================================
    // Reviews
    // ========================================================================

    pub async fn create_review(
        &self,
        movie_id: i32,
        user_id: i32,
        star_rating: f64,
        review_text: &str,
    ) -> Result<Review> {
        self.review_repo()
            .create(movie_id, user_id, star_rating, review_text)
            .await
    }

    pub async fn get_review(&self, id: i32) -> Result<Option<Review>> {
        self.review_repo().get(id).await
    }

    pub async fn get_review_detail(&self, id: i32) -> Result<Option<ReviewDetail>> {
        self.review_repo().get_detail(id).await
    }

    pub async fn list_reviews(&self) -> Result<Vec<ReviewDetail>> {
        self.review_repo().list_details().await
    }

    pub async fn list_reviews_for_user(&self, user_id: i32) -> Result<Vec<ReviewDetail>> {
        self.review_repo().list_details_for_user(user_id).await
    }

    pub async fn list_reviews_for_movie(&self, movie_id: i32) -> Result<Vec<Review>> {
        self.review_repo().list_for_movie(movie_id).await
    }

    pub async fn update_review(&self, id: i32, star_rating: f64, review_text: &str) -> Result<bool> {
        self.review_repo()
            .update(id, star_rating, review_text)
            .await
    }

    pub async fn delete_review(&self, id: i32) -> Result<bool> {
        self.review_repo().delete(id).await
    }
}
