use std::sync::Arc;

use crate::config::Config;
use crate::db::Store;
use crate::services::{
    AuthService, Authenticator, CredentialHasher, SeaOrmAuthService, TokenService,
};

/// Process-wide services, built once at startup and shared by every request.
#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub store: Store,

    pub hasher: CredentialHasher,

    pub tokens: Arc<TokenService>,

    pub authenticator: Authenticator,

    pub auth_service: Arc<dyn AuthService>,
}

impl SharedState {
    /// Fails when the configuration is invalid, including a missing token secret.
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        config.validate()?;

        let store = Store::with_pool_options(
            &config.general.database_path,
            config.general.max_db_connections,
            config.general.min_db_connections,
        )
        .await?;

        Self::with_store(config, store)
    }

    pub fn with_store(config: Config, store: Store) -> anyhow::Result<Self> {
        let hasher = CredentialHasher::new(&config.security)?;
        let tokens = Arc::new(TokenService::new(&config.security.token_secret)?);

        let authenticator = Authenticator::new(store.clone(), hasher.clone(), tokens.clone());

        let auth_service = Arc::new(SeaOrmAuthService::new(
            store.clone(),
            hasher.clone(),
            tokens.clone(),
            &config.security,
        )) as Arc<dyn AuthService>;

        Ok(Self {
            config: Arc::new(config),
            store,
            hasher,
            tokens,
            authenticator,
            auth_service,
        })
    }
}
