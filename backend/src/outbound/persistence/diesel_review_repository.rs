//! PostgreSQL-backed `ReviewRepository` implementation using Diesel ORM.
//!
//! The `(pizza_id, user_id)` unique constraint enforces one review per user
//! per pizza; violations surface as [`ReviewRepositoryError::Duplicate`].

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ReviewRepository, ReviewRepositoryError};
use crate::domain::{NewReview, PizzaId, Rating, Review, ReviewId, UserId};

use super::diesel_basic_error_mapping::{
    ConstraintViolation, constraint_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{NewReviewRow, ReviewRow};
use super::pool::{DbPool, PoolError};
use super::schema::reviews;

/// Diesel-backed implementation of the review repository port.
#[derive(Clone)]
pub struct DieselReviewRepository {
    pool: DbPool,
}

impl DieselReviewRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> ReviewRepositoryError {
    map_basic_pool_error(error, |message| ReviewRepositoryError::connection(message))
}

fn map_diesel_error(error: diesel::result::Error) -> ReviewRepositoryError {
    map_basic_diesel_error(
        error,
        ReviewRepositoryError::query,
        ReviewRepositoryError::connection,
    )
}

fn row_to_review(row: ReviewRow) -> Result<Review, ReviewRepositoryError> {
    let rating = Rating::new(i64::from(row.rating))
        .map_err(|err| ReviewRepositoryError::query(format!("review {}: {err}", row.id)))?;
    Ok(Review {
        id: row.id,
        pizza_id: row.pizza_id,
        user_id: UserId::from_uuid(row.user_id),
        rating,
        comment: row.comment,
        created_at: row.created_at,
    })
}

#[async_trait]
impl ReviewRepository for DieselReviewRepository {
    async fn list_for_pizza(
        &self,
        pizza_id: PizzaId,
    ) -> Result<Vec<Review>, ReviewRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        reviews::table
            .filter(reviews::pizza_id.eq(pizza_id))
            .order((reviews::created_at.desc(), reviews::id.desc()))
            .select(ReviewRow::as_select())
            .load::<ReviewRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?
            .into_iter()
            .map(row_to_review)
            .collect()
    }

    async fn find_by_id(&self, id: ReviewId) -> Result<Option<Review>, ReviewRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        reviews::table
            .find(id)
            .select(ReviewRow::as_select())
            .first::<ReviewRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?
            .map(row_to_review)
            .transpose()
    }

    async fn create(&self, review: &NewReview) -> Result<Review, ReviewRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewReviewRow {
            pizza_id: review.pizza_id,
            user_id: *review.user_id.as_uuid(),
            rating: review.rating.value(),
            comment: review.comment.as_deref(),
        };
        let stored = diesel::insert_into(reviews::table)
            .values(&row)
            .returning(ReviewRow::as_returning())
            .get_result::<ReviewRow>(&mut conn)
            .await
            .map_err(|err| match constraint_violation(&err) {
                Some(ConstraintViolation::Unique) => ReviewRepositoryError::duplicate(),
                _ => map_diesel_error(err),
            })?;
        row_to_review(stored)
    }

    async fn delete(&self, id: ReviewId) -> Result<bool, ReviewRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed = diesel::delete(reviews::table.find(id))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(removed > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rstest::rstest;
    use uuid::Uuid;

    fn row(rating: i16) -> ReviewRow {
        ReviewRow {
            id: 2,
            pizza_id: 5,
            user_id: Uuid::nil(),
            rating,
            comment: Some("crispy".to_owned()),
            created_at: Utc::now(),
        }
    }

    #[rstest]
    fn valid_rows_convert() {
        let review = row_to_review(row(4)).expect("valid row");
        assert_eq!(review.rating.value(), 4);
        assert_eq!(review.comment.as_deref(), Some("crispy"));
    }

    #[rstest]
    #[case(0)]
    #[case(6)]
    fn out_of_range_ratings_are_query_errors(#[case] rating: i16) {
        let error = row_to_review(row(rating)).expect_err("bad rating");
        assert!(matches!(error, ReviewRepositoryError::Query { .. }));
    }
}
