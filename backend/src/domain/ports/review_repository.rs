//! Port abstraction for review persistence adapters.

use async_trait::async_trait;

use crate::domain::{NewReview, PizzaId, Review, ReviewId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by review repository adapters.
    pub enum ReviewRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "review repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "review repository query failed: {message}",
        /// The user already reviewed this pizza.
        Duplicate => "review already exists for this user and pizza",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewRepository: Send + Sync {
    /// Reviews of one pizza, newest first.
    async fn list_for_pizza(&self, pizza_id: PizzaId)
    -> Result<Vec<Review>, ReviewRepositoryError>;

    /// Fetch a review by identifier.
    async fn find_by_id(&self, id: ReviewId) -> Result<Option<Review>, ReviewRepositoryError>;

    /// Insert a review.
    async fn create(&self, review: &NewReview) -> Result<Review, ReviewRepositoryError>;

    /// Delete a review, returning whether a row was removed.
    async fn delete(&self, id: ReviewId) -> Result<bool, ReviewRepositoryError>;
}
