use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::entities::{api_keys, prelude::*};

/// Stored API key row. Holds the hash only; the token is handed out once at issuance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiKeyRecord {
    pub id: i32,
    pub user_id: i32,
    pub key_hash: String,
    pub created_at: String,
}

impl From<api_keys::Model> for ApiKeyRecord {
    fn from(model: api_keys::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            key_hash: model.key_hash,
            created_at: model.created_at,
        }
    }
}

pub struct ApiKeyRepository {
    conn: DatabaseConnection,
}

impl ApiKeyRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn insert(&self, user_id: i32, key_hash: &str) -> Result<ApiKeyRecord> {
        let active = api_keys::ActiveModel {
            user_id: Set(user_id),
            key_hash: Set(key_hash.to_string()),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        };

        let model = active
            .insert(&self.conn)
            .await
            .context("Failed to insert API key")?;

        Ok(ApiKeyRecord::from(model))
    }

    /// All keys owned by a user, oldest first
    pub async fn list_for_user(&self, user_id: i32) -> Result<Vec<ApiKeyRecord>> {
        let rows = ApiKeys::find()
            .filter(api_keys::Column::UserId.eq(user_id))
            .order_by_asc(api_keys::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to query API keys for user")?;

        Ok(rows.into_iter().map(ApiKeyRecord::from).collect())
    }

    /// Delete a key only if it belongs to `user_id`.
    ///
    /// A second delete of the same key reports `false`, so concurrent revocations
    /// are idempotent.
    pub async fn delete_for_user(&self, key_id: i32, user_id: i32) -> Result<bool> {
        let result = ApiKeys::delete_many()
            .filter(api_keys::Column::Id.eq(key_id))
            .filter(api_keys::Column::UserId.eq(user_id))
            .exec(&self.conn)
            .await
            .context("Failed to delete API key")?;

        Ok(result.rows_affected > 0)
    }
}
