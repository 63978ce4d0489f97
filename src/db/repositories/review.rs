use anyhow::{Context, Result};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Select, Set,
};

use crate::entities::{movies, prelude::*, reviews, users};
use crate::models::catalog::{Review, ReviewDetail};

pub struct ReviewRepository {
    conn: DatabaseConnection,
}

impl ReviewRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Reviews joined with movie title and author username
    fn detail_query() -> Select<Reviews> {
        Reviews::find()
            .select_only()
            .column_as(reviews::Column::Id, "review_id")
            .column(reviews::Column::MovieId)
            .column(reviews::Column::UserId)
            .column(reviews::Column::StarRating)
            .column(reviews::Column::ReviewText)
            .column(reviews::Column::CreatedAt)
            .column_as(movies::Column::Title, "movie_title")
            .column_as(users::Column::Username, "username")
            .join(JoinType::InnerJoin, reviews::Relation::Movie.def())
            .join(JoinType::InnerJoin, reviews::Relation::User.def())
            .order_by_asc(reviews::Column::Id)
    }

    pub async fn create(
        &self,
        movie_id: i32,
        user_id: i32,
        star_rating: f64,
        review_text: &str,
    ) -> Result<Review> {
        let model = reviews::ActiveModel {
            movie_id: Set(movie_id),
            user_id: Set(user_id),
            star_rating: Set(star_rating),
            review_text: Set(review_text.to_string()),
            created_at: Set(chrono::Utc::now().to_rfc3339()),
            ..Default::default()
        }
        .insert(&self.conn)
        .await
        .context("Failed to insert review")?;

        Ok(Review::from(model))
    }

    pub async fn get(&self, id: i32) -> Result<Option<Review>> {
        let review = Reviews::find_by_id(id)
            .one(&self.conn)
            .await
            .context("Failed to query review")?;

        Ok(review.map(Review::from))
    }

    pub async fn get_detail(&self, id: i32) -> Result<Option<ReviewDetail>> {
        Self::detail_query()
            .filter(reviews::Column::Id.eq(id))
            .into_model::<ReviewDetail>()
            .one(&self.conn)
            .await
            .context("Failed to query review detail")
    }

    pub async fn list_details(&self) -> Result<Vec<ReviewDetail>> {
        Self::detail_query()
            .into_model::<ReviewDetail>()
            .all(&self.conn)
            .await
            .context("Failed to list reviews")
    }

    pub async fn list_details_for_user(&self, user_id: i32) -> Result<Vec<ReviewDetail>> {
        Self::detail_query()
            .filter(reviews::Column::UserId.eq(user_id))
            .into_model::<ReviewDetail>()
            .all(&self.conn)
            .await
            .context("Failed to list reviews for user")
    }

    pub async fn list_for_movie(&self, movie_id: i32) -> Result<Vec<Review>> {
        let rows = Reviews::find()
            .filter(reviews::Column::MovieId.eq(movie_id))
            .order_by_asc(reviews::Column::Id)
            .all(&self.conn)
            .await
            .context("Failed to list reviews for movie")?;

        Ok(rows.into_iter().map(Review::from).collect())
    }

    pub async fn update(&self, id: i32, star_rating: f64, review_text: &str) -> Result<bool> {
        let Some(existing) = Reviews::find_by_id(id).one(&self.conn).await? else {
            return Ok(false);
        };

        let mut active: reviews::ActiveModel = existing.into();
        active.star_rating = Set(star_rating);
        active.review_text = Set(review_text.to_string());
        active
            .update(&self.conn)
            .await
            .context("Failed to update review")?;

        Ok(true)
    }

    pub async fn delete(&self, id: i32) -> Result<bool> {
        let result = Reviews::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("Failed to delete review")?;

        Ok(result.rows_affected > 0)
    }
}
