//! Driving port for writing and removing reviews.

use async_trait::async_trait;

use crate::domain::{AuthenticatedUser, Error, PizzaId, Rating, Review, ReviewId};

/// Review submission payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateReviewRequest {
    pub pizza_id: PizzaId,
    pub rating: Rating,
    pub comment: Option<String>,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewCommand: Send + Sync {
    /// Record `user`'s review of a pizza.
    async fn create(
        &self,
        user: AuthenticatedUser,
        request: CreateReviewRequest,
    ) -> Result<Review, Error>;

    /// Delete a review owned by `user`, or any review when `user` is staff.
    async fn remove(&self, user: AuthenticatedUser, id: ReviewId) -> Result<(), Error>;
}
