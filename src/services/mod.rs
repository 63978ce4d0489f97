pub mod auth_service;
pub use auth_service::{AuthError, AuthService};

pub mod auth_service_impl;
pub use auth_service_impl::SeaOrmAuthService;

pub mod authenticator;
pub use authenticator::{AuthContext, Authenticator, CredentialKind, Credentials, Role};

pub mod password;
pub use password::CredentialHasher;

pub mod token;
pub use token::TokenService;
