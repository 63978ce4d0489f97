use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::db::is_unique_violation;
use crate::entities::{genres, prelude::*};
use crate::models::catalog::Genre;

pub struct GenreRepository {
    conn: DatabaseConnection,
}

impl GenreRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    pub async fn list_names(&self) -> Result<Vec<String>> {
        let rows = Genres::find()
            .order_by_asc(genres::Column::Name)
            .all(&self.conn)
            .await
            .context("Failed to list genres")?;

        Ok(rows.into_iter().map(|g| g.name).collect())
    }

    pub async fn get_by_name(&self, name: &str) -> Result<Option<Genre>> {
        let genre = Genres::find()
            .filter(genres::Column::Name.eq(name))
            .one(&self.conn)
            .await
            .context("Failed to query genre")?;

        Ok(genre.map(Genre::from))
    }

    /// Returns `None` if a genre with this name already exists.
    pub async fn create(&self, name: &str) -> Result<Option<Genre>> {
        let active = genres::ActiveModel {
            name: Set(name.to_string()),
            ..Default::default()
        };

        match active.insert(&self.conn).await {
            Ok(model) => Ok(Some(Genre::from(model))),
            Err(e) if is_unique_violation(&e) => Ok(None),
            Err(e) => Err(e).context("Failed to insert genre"),
        }
    }

    pub async fn delete_by_name(&self, name: &str) -> Result<bool> {
        let result = Genres::delete_many()
            .filter(genres::Column::Name.eq(name))
            .exec(&self.conn)
            .await
            .context("Failed to delete genre")?;

        Ok(result.rows_affected > 0)
    }
}
