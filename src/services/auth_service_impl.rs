//! `SeaORM` implementation of the `AuthService` trait.

use async_trait::async_trait;
use std::sync::Arc;
use tracing::{info, warn};

use crate::config::SecurityConfig;
use crate::db::Store;
use crate::services::auth_service::{
    ApiKeySummary, AuthError, AuthService, IssuedApiKey, SignIn, UserInfo,
};
use crate::services::authenticator::SessionIdentity;
use crate::services::password::CredentialHasher;
use crate::services::token::{TokenError, TokenService, ttl_from_hours};

pub struct SeaOrmAuthService {
    store: Store,
    hasher: CredentialHasher,
    tokens: Arc<TokenService>,
    default_ttl_hours: f64,
    max_ttl_hours: f64,
}

impl SeaOrmAuthService {
    #[must_use]
    pub fn new(
        store: Store,
        hasher: CredentialHasher,
        tokens: Arc<TokenService>,
        security: &SecurityConfig,
    ) -> Self {
        Self {
            store,
            hasher,
            tokens,
            default_ttl_hours: security.default_token_ttl_hours,
            max_ttl_hours: security.max_token_ttl_hours,
        }
    }
}

fn require_credentials(username: &str, password: &str) -> Result<(), AuthError> {
    if username.trim().is_empty() || password.is_empty() {
        return Err(AuthError::Validation(
            "Username and password are required".to_string(),
        ));
    }
    Ok(())
}

#[async_trait]
impl AuthService for SeaOrmAuthService {
    async fn signup(&self, username: &str, password: &str) -> Result<UserInfo, AuthError> {
        require_credentials(username, password)?;

        if self.store.user_exists(username).await? {
            return Err(AuthError::UsernameTaken);
        }

        let password_hash = self.hasher.hash_password(password).await?;

        // A concurrent signup can still win the race; the unique index decides.
        let user = self
            .store
            .create_user(username, &password_hash)
            .await?
            .ok_or(AuthError::UsernameTaken)?;

        info!(user_id = user.id, username = %user.username, "User registered");
        Ok(user.into())
    }

    async fn signin(&self, username: &str, password: &str) -> Result<SignIn, AuthError> {
        require_credentials(username, password)?;

        let (user, password_hash) = self
            .store
            .get_user_by_username_with_password(username)
            .await?
            .ok_or(AuthError::UserNotFound)?;

        if !self
            .hasher
            .verify_password(password, &password_hash)
            .await?
        {
            warn!(user_id = user.id, "Sign-in failed: wrong password");
            return Err(AuthError::InvalidPassword);
        }

        info!(user_id = user.id, "User signed in");
        Ok(SignIn {
            identity: SessionIdentity {
                user_id: user.id,
                password_hash,
            },
            user: user.into(),
        })
    }

    async fn user_info(&self, user_id: i32) -> Result<UserInfo, AuthError> {
        let user = self
            .store
            .get_user(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;
        Ok(user.into())
    }

    async fn list_api_keys(&self, user_id: i32) -> Result<Vec<ApiKeySummary>, AuthError> {
        let keys = self.store.list_api_keys(user_id).await?;
        if keys.is_empty() {
            return Err(AuthError::NoTokens);
        }

        Ok(keys
            .into_iter()
            .map(|key| ApiKeySummary {
                key_id: key.id,
                created_at: key.created_at,
            })
            .collect())
    }

    async fn issue_api_key(
        &self,
        user_id: i32,
        expiration_hours: Option<f64>,
    ) -> Result<IssuedApiKey, AuthError> {
        let hours = expiration_hours.unwrap_or(self.default_ttl_hours);
        let ttl = ttl_from_hours(hours, self.max_ttl_hours)
            .map_err(|e| AuthError::Validation(e.to_string()))?;

        let issued = self.tokens.issue(user_id, ttl).map_err(|e| match e {
            TokenError::InvalidTtl | TokenError::TtlTooLong(_) => {
                AuthError::Validation(e.to_string())
            }
            other => AuthError::Internal(other.to_string()),
        })?;

        let key_hash = self.hasher.hash_api_key(&issued.token).await?;
        let record = self.store.insert_api_key(user_id, &key_hash).await?;

        info!(user_id, key_id = record.id, expires_at = %issued.expires_at, "API key issued");
        Ok(IssuedApiKey {
            key_id: record.id,
            token: issued.token,
            expires_at: issued.expires_at,
        })
    }

    async fn revoke_api_key(&self, user_id: i32, key_id: i32) -> Result<(), AuthError> {
        if !self.store.delete_api_key(key_id, user_id).await? {
            return Err(AuthError::TokenNotFound);
        }

        info!(user_id, key_id, "API key revoked");
        Ok(())
    }
}
