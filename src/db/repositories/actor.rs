use anyhow::{Context, Result};
use sea_orm::{ActiveModelTrait, DatabaseConnection, EntityTrait, QueryOrder, Set};

use crate::entities::{actors, prelude::*};
use crate::models::catalog::Actor;

pub struct ActorRepository {
    conn: DatabaseConnection,
}

impl ActorRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list(&self) -> Result<Vec<Actor>> {
        let rows = Actors::find()
            .order_by_asc(actors::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list actors")?;

        Ok(rows.into_iter().map(Actor::from).collect())
    }

    pub async fn get(&self, id: i32) -> Result<Option<Actor>> {
        let actor = Actors::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query actor")?;

        Ok(actor.map(Actor::from))
    }

    pub async fn create(&self, first_name: &str, last_name: &str) -> Result<Actor> {
        let model = actors::ActiveModel {
            first_name: Set(first_name.to_string()),
            last_name: Set(last_name.to_string()),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .context("Failed to insert actor")?;

        Ok(Actor::from(model))
    }

    pub async fn update(&self, id: i32, first_name: &str, last_name: &str) -> Result<bool> {
        let Some(existing) = Actors::find_by_id(id).one(&self.conn).await? else {
            return Ok(false);
        };

        let mut active: actors::ActiveModel = existing.into();
        active.first_name = Set(first_name.to_string());
        active.last_name = Set(last_name.to_string());
        active
            .update(&self.conn)
            .await
            .context("Failed to update actor")?;

        Ok(true)
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = Actors::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete actor")?;

        Ok(result.rows_affected > 0)
    }
}
