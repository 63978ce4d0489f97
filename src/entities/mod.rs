pub mod prelude;

pub mod actors;
pub mod api_keys;
pub mod genres;
pub mod movie_actors;
pub mod movie_genres;
pub mod movies;
pub mod reviews;
pub mod users;
