use axum::{
    Router,
    http::HeaderValue,
    middleware,
    routing::{delete, get, post, put},
};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tower_sessions::{Expiry, ExpiredDeletion, SessionManagerLayer};
use tower_sessions_sqlx_store::SqliteStore;

use crate::config::Config;
use crate::state::SharedState;

mod actors;
pub mod auth;
mod error;
pub mod extract;
mod genres;
mod movies;
mod observability;
mod reviews;
mod tokens;
mod types;
mod validation;

pub use error::ApiError;
pub use types::*;

#[derive(Clone)]
pub struct AppState {
    pub shared: Arc<SharedState>,

    pub prometheus_handle: Option<PrometheusHandle>,
}

impl AppState {
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.shared.config
    }

    #[must_use]
    pub fn store(&self) -> &crate::db::Store {
        &self.shared.store
    }

    #[must_use]
    pub fn authenticator(&self) -> &crate::services::Authenticator {
        &self.shared.authenticator
    }

    #[must_use]
    pub fn auth_service(&self) -> &Arc<dyn crate::services::AuthService> {
        &self.shared.auth_service
    }
}

#[must_use]
pub fn create_app_state(
    shared: Arc<SharedState>,
    prometheus_handle: Option<PrometheusHandle>,
) -> Arc<AppState> {
    Arc::new(AppState {
        shared,
        prometheus_handle,
    })
}

pub async fn create_app_state_from_config(
    config: Config,
    prometheus_handle: Option<PrometheusHandle>,
) -> anyhow::Result<Arc<AppState>> {
    let shared = Arc::new(SharedState::new(config).await?);
    Ok(create_app_state(shared, prometheus_handle))
}

pub async fn router(state: Arc<AppState>) -> anyhow::Result<Router> {
    let config = state.config().clone();

    let session_store = SqliteStore::new(state.store().conn.get_sqlite_connection_pool().clone());
    session_store.migrate().await?;

    tokio::spawn(
        session_store
            .clone()
            .continuously_delete_expired(tokio::time::Duration::from_secs(60)),
    );

    let session_layer = SessionManagerLayer::new(session_store)
        .with_secure(config.server.secure_cookies)
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_expiry(Expiry::OnInactivity(time::Duration::minutes(
            config.server.session_inactivity_minutes,
        )));

    let cors_origins = &config.server.cors_allowed_origins;
    let cors_layer = if cors_origins.iter().any(|o| o == "*") {
        CorsLayer::new().allow_origin(Any)
    } else {
        let origins: Vec<HeaderValue> =
            cors_origins.iter().filter_map(|s| s.parse().ok()).collect();
        CorsLayer::new().allow_origin(origins)
    };

    let mut app = Router::new()
        .route("/health", get(observability::health))
        .merge(auth_routes())
        .merge(catalog_routes());

    if config.observability.metrics_enabled {
        app = app.route("/metrics", get(observability::get_metrics));
    }

    Ok(app
        .fallback(not_found)
        .layer(session_layer)
        .with_state(state)
        .layer(middleware::from_fn(observability::logging_middleware))
        .layer(middleware::from_fn(
            observability::security_headers_middleware,
        ))
        .layer(cors_layer.allow_methods(Any).allow_headers(Any))
        .layer(TraceLayer::new_for_http()))
}

fn auth_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/signup", post(auth::signup))
        .route("/signin", post(auth::signin))
        .route("/signout", post(auth::signout))
        .route("/profile", get(auth::profile))
        .route(
            "/tokens",
            get(tokens::list_tokens).post(tokens::create_token),
        )
        .route("/tokens/{id}", delete(tokens::delete_token))
}

fn catalog_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/movies", get(movies::list_movies).post(movies::create_movie))
        .route(
            "/movies/{id}",
            get(movies::get_movie)
                .put(movies::update_movie)
                .delete(movies::delete_movie),
        )
        .route(
            "/movies/{id}/actors",
            get(movies::list_movie_actors).post(movies::attach_actor),
        )
        .route(
            "/movies/{id}/genres",
            get(movies::list_movie_genres).post(movies::attach_genre),
        )
        .route(
            "/movies/{id}/reviews",
            get(reviews::list_movie_reviews).post(reviews::create_review),
        )
        .route("/actors", get(actors::list_actors).post(actors::create_actor))
        .route(
            "/actors/{id}",
            get(actors::get_actor)
                .put(actors::update_actor)
                .delete(actors::delete_actor),
        )
        .route("/genres", get(genres::list_genres).post(genres::create_genre))
        .route(
            "/genres/{name}",
            get(genres::get_genre).delete(genres::delete_genre),
        )
        .route("/reviews", get(reviews::list_reviews))
        .route(
            "/reviews/{id}",
            get(reviews::get_review).delete(reviews::delete_review),
        )
        .route("/profile/reviews", get(reviews::list_own_reviews))
        .route(
            "/profile/reviews/{id}",
            put(reviews::update_own_review).delete(reviews::delete_own_review),
        )
}

async fn not_found() -> ApiError {
    ApiError::not_found("Resource not found")
}
