pub mod actor;
pub mod api_key;
pub mod genre;
pub mod movie;
pub mod review;
pub mod user;
