pub use super::actors::Entity as Actors;
pub use super::api_keys::Entity as ApiKeys;
pub use super::genres::Entity as Genres;
pub use super::movie_actors::Entity as MovieActors;
pub use super::movie_genres::Entity as MovieGenres;
pub use super::movies::Entity as Movies;
pub use super::reviews::Entity as Reviews;
pub use super::users::Entity as Users;
