//! Resolves the caller's identity from a session or a bearer token and
//! enforces the role a route requires.

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::db::Store;
use crate::services::auth_service::AuthError;
use crate::services::password::{CredentialHasher, constant_time_eq};
use crate::services::token::TokenService;

/// Session key under which [`SessionIdentity`] is stored.
pub const SESSION_IDENTITY_KEY: &str = "identity";

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Role {
    Reviewer,
    Admin,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CredentialKind {
    Session,
    Bearer,
}

/// What a signed-in session remembers about its user.
///
/// Keeping the password hash lets a password change invalidate old sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionIdentity {
    pub user_id: i32,
    pub password_hash: String,
}

/// Credentials presented with a request.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub session: Option<SessionIdentity>,
    pub bearer: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthContext {
    pub user_id: i32,
    pub is_admin: bool,
    pub kind: CredentialKind,
}

#[derive(Clone)]
pub struct Authenticator {
    store: Store,
    hasher: CredentialHasher,
    tokens: Arc<TokenService>,
}

impl Authenticator {
    #[must_use]
    pub const fn new(store: Store, hasher: CredentialHasher, tokens: Arc<TokenService>) -> Self {
        Self {
            store,
            hasher,
            tokens,
        }
    }

    /// Authenticates `credentials` and checks them against `required`.
    ///
    /// With `strict`, a reviewer-only route also rejects admins.
    pub async fn authenticate(
        &self,
        credentials: &Credentials,
        required: Role,
        strict: bool,
    ) -> Result<AuthContext, AuthError> {
        let (user_id, kind) = match (&credentials.session, &credentials.bearer) {
            (Some(_), Some(_)) => return Err(AuthError::ConflictingCredentials),
            (None, Some(token)) => (self.verify_bearer(token).await?, CredentialKind::Bearer),
            (Some(identity), None) => (
                self.verify_session(identity).await?,
                CredentialKind::Session,
            ),
            (None, None) => return Err(AuthError::AuthenticationRequired),
        };

        let user = self
            .store
            .get_user(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        match required {
            Role::Admin if !user.is_admin => {
                warn!(user_id, "Admin access denied");
                return Err(AuthError::Forbidden("Admin access required".to_string()));
            }
            Role::Reviewer if strict && user.is_admin => {
                warn!(user_id, "Reviewer-only action denied to admin");
                return Err(AuthError::Forbidden(
                    "This action is restricted to reviewers".to_string(),
                ));
            }
            _ => {}
        }

        Ok(AuthContext {
            user_id,
            is_admin: user.is_admin,
            kind,
        })
    }

    async fn verify_bearer(&self, token: &str) -> Result<i32, AuthError> {
        let decoded = self.tokens.decode(token).map_err(|e| {
            debug!(error = %e, "Bearer token rejected");
            AuthError::InvalidApiKey
        })?;

        if decoded.is_expired_at(Utc::now()) {
            return Err(AuthError::ExpiredApiKey);
        }

        let hashes: Vec<String> = self
            .store
            .list_api_keys(decoded.user_id)
            .await?
            .into_iter()
            .map(|key| key.key_hash)
            .collect();

        if hashes.is_empty() {
            return Err(AuthError::NoStoredKeys);
        }

        if !self.hasher.verify_api_key(token, hashes).await? {
            warn!(user_id = decoded.user_id, "Bearer token matches no stored key");
            return Err(AuthError::InvalidApiKey);
        }

        Ok(decoded.user_id)
    }

    async fn verify_session(&self, identity: &SessionIdentity) -> Result<i32, AuthError> {
        let stored = self.store.get_user_password_hash(identity.user_id).await?;

        match stored {
            Some(hash) if constant_time_eq(hash.as_bytes(), identity.password_hash.as_bytes()) => {
                Ok(identity.user_id)
            }
            _ => {
                warn!(user_id = identity.user_id, "Stale or unknown session identity");
                Err(AuthError::InvalidCredentials)
            }
        }
    }
}
