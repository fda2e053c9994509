//! Review domain service.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::domain::ports::{
    CreateReviewRequest, PizzaRepository, PizzaRepositoryError, ReviewCommand, ReviewQuery,
    ReviewRepository, ReviewRepositoryError,
};
use crate::domain::review::validate_comment;
use crate::domain::{AuthenticatedUser, Error, NewReview, PizzaId, Review, ReviewId};

fn map_review_error(error: ReviewRepositoryError) -> Error {
    match error {
        ReviewRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("review repository unavailable: {message}"))
        }
        ReviewRepositoryError::Query { message } => {
            Error::internal(format!("review repository error: {message}"))
        }
        ReviewRepositoryError::Duplicate => {
            Error::conflict("you have already reviewed this pizza")
        }
    }
}

fn map_pizza_error(error: PizzaRepositoryError) -> Error {
    match error {
        PizzaRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("pizza repository unavailable: {message}"))
        }
        other => Error::internal(format!("pizza repository error: {other}")),
    }
}

/// Review service implementing the review command and query ports.
#[derive(Clone)]
pub struct ReviewService<R, P> {
    review_repo: Arc<R>,
    pizza_repo: Arc<P>,
}

impl<R, P> ReviewService<R, P> {
    /// Create a new service.
    pub fn new(review_repo: Arc<R>, pizza_repo: Arc<P>) -> Self {
        Self {
            review_repo,
            pizza_repo,
        }
    }
}

impl<R, P> ReviewService<R, P>
where
    P: PizzaRepository,
{
    async fn ensure_pizza(&self, pizza_id: PizzaId) -> Result<(), Error> {
        self.pizza_repo
            .find_by_id(pizza_id)
            .await
            .map_err(map_pizza_error)?
            .map(|_| ())
            .ok_or_else(|| Error::not_found(format!("pizza {pizza_id} not found")))
    }
}

#[async_trait]
impl<R, P> ReviewCommand for ReviewService<R, P>
where
    R: ReviewRepository,
    P: PizzaRepository,
{
    async fn create(
        &self,
        user: AuthenticatedUser,
        request: CreateReviewRequest,
    ) -> Result<Review, Error> {
        let comment = request
            .comment
            .map(|text| text.trim().to_owned())
            .filter(|text| !text.is_empty());
        validate_comment(comment.as_deref()).map_err(|err| {
            Error::invalid_request(err.to_string()).with_details(json!({ "field": "comment" }))
        })?;
        self.ensure_pizza(request.pizza_id).await?;

        self.review_repo
            .create(&NewReview {
                pizza_id: request.pizza_id,
                user_id: user.id,
                rating: request.rating,
                comment,
            })
            .await
            .map_err(map_review_error)
    }

    async fn remove(&self, user: AuthenticatedUser, id: ReviewId) -> Result<(), Error> {
        let review = self
            .review_repo
            .find_by_id(id)
            .await
            .map_err(map_review_error)?
            .ok_or_else(|| Error::not_found(format!("review {id} not found")))?;
        if review.user_id != user.id && !user.is_staff() {
            return Err(Error::forbidden("only the author or staff may delete a review"));
        }

        let removed = self
            .review_repo
            .delete(id)
            .await
            .map_err(map_review_error)?;
        if removed {
            Ok(())
        } else {
            Err(Error::not_found(format!("review {id} not found")))
        }
    }
}

#[async_trait]
impl<R, P> ReviewQuery for ReviewService<R, P>
where
    R: ReviewRepository,
    P: PizzaRepository,
{
    async fn list_for_pizza(&self, pizza_id: PizzaId) -> Result<Vec<Review>, Error> {
        self.ensure_pizza(pizza_id).await?;
        self.review_repo
            .list_for_pizza(pizza_id)
            .await
            .map_err(map_review_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockPizzaRepository, MockReviewRepository};
    use crate::domain::{ErrorCode, Pizza, PizzaSlug, Price, Rating, UserId, UserRole};
    use chrono::Utc;
    use rstest::{fixture, rstest};

    fn pizza(id: PizzaId) -> Pizza {
        Pizza {
            id,
            slug: PizzaSlug::new("margherita").expect("slug"),
            price: Price::from_cents(3000).expect("price"),
            image_url: None,
            available: true,
            translations: Vec::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn review(id: ReviewId, author: UserId) -> Review {
        Review {
            id,
            pizza_id: 1,
            user_id: author,
            rating: Rating::new(5).expect("rating"),
            comment: None,
            created_at: Utc::now(),
        }
    }

    #[fixture]
    fn customer() -> AuthenticatedUser {
        AuthenticatedUser {
            id: UserId::random(),
            role: UserRole::Customer,
        }
    }

    fn request(comment: Option<&str>) -> CreateReviewRequest {
        CreateReviewRequest {
            pizza_id: 1,
            rating: Rating::new(4).expect("rating"),
            comment: comment.map(str::to_owned),
        }
    }

    #[rstest]
    #[tokio::test]
    async fn create_stores_trimmed_comment(customer: AuthenticatedUser) {
        let mut pizzas = MockPizzaRepository::new();
        pizzas
            .expect_find_by_id()
            .times(1)
            .return_once(|id| Ok(Some(pizza(id))));
        let mut reviews = MockReviewRepository::new();
        let author = customer.id;
        reviews
            .expect_create()
            .withf(move |new| new.user_id == author && new.comment.as_deref() == Some("Great"))
            .times(1)
            .return_once(move |_| Ok(review(1, author)));

        let service = ReviewService::new(Arc::new(reviews), Arc::new(pizzas));
        service
            .create(customer, request(Some("  Great ")))
            .await
            .expect("created");
    }

    #[rstest]
    #[tokio::test]
    async fn create_requires_existing_pizza(customer: AuthenticatedUser) {
        let mut pizzas = MockPizzaRepository::new();
        pizzas.expect_find_by_id().times(1).return_once(|_| Ok(None));
        let mut reviews = MockReviewRepository::new();
        reviews.expect_create().times(0);

        let service = ReviewService::new(Arc::new(reviews), Arc::new(pizzas));
        let error = service
            .create(customer, request(None))
            .await
            .expect_err("missing pizza");

        assert_eq!(error.code(), ErrorCode::NotFound);
    }

    #[rstest]
    #[tokio::test]
    async fn create_rejects_second_review_with_conflict(customer: AuthenticatedUser) {
        let mut pizzas = MockPizzaRepository::new();
        pizzas
            .expect_find_by_id()
            .times(1)
            .return_once(|id| Ok(Some(pizza(id))));
        let mut reviews = MockReviewRepository::new();
        reviews
            .expect_create()
            .times(1)
            .return_once(|_| Err(ReviewRepositoryError::duplicate()));

        let service = ReviewService::new(Arc::new(reviews), Arc::new(pizzas));
        let error = service
            .create(customer, request(None))
            .await
            .expect_err("duplicate");

        assert_eq!(error.code(), ErrorCode::Conflict);
    }

    #[rstest]
    #[tokio::test]
    async fn create_rejects_long_comment(customer: AuthenticatedUser) {
        let service = ReviewService::new(
            Arc::new(MockReviewRepository::new()),
            Arc::new(MockPizzaRepository::new()),
        );
        let long = "x".repeat(1001);
        let error = service
            .create(customer, request(Some(&long)))
            .await
            .expect_err("too long");

        assert_eq!(error.code(), ErrorCode::InvalidRequest);
    }

    #[rstest]
    #[case(UserRole::Customer, true, None)]
    #[case(UserRole::Customer, false, Some(ErrorCode::Forbidden))]
    #[case(UserRole::Staff, false, None)]
    #[tokio::test]
    async fn remove_allows_author_or_staff(
        #[case] role: UserRole,
        #[case] is_author: bool,
        #[case] expected: Option<ErrorCode>,
    ) {
        let caller = AuthenticatedUser {
            id: UserId::random(),
            role,
        };
        let author = if is_author { caller.id } else { UserId::random() };
        let mut reviews = MockReviewRepository::new();
        reviews
            .expect_find_by_id()
            .times(1)
            .return_once(move |id| Ok(Some(review(id, author))));
        reviews
            .expect_delete()
            .times(usize::from(expected.is_none()))
            .returning(|_| Ok(true));

        let service = ReviewService::new(Arc::new(reviews), Arc::new(MockPizzaRepository::new()));
        let result = service.remove(caller, 3).await;

        assert_eq!(result.err().map(|err| err.code()), expected);
    }

    #[tokio::test]
    async fn list_requires_existing_pizza() {
        let mut pizzas = MockPizzaRepository::new();
        pizzas.expect_find_by_id().times(1).return_once(|_| Ok(None));
        let mut reviews = MockReviewRepository::new();
        reviews.expect_list_for_pizza().times(0);

        let service = ReviewService::new(Arc::new(reviews), Arc::new(pizzas));
        let error = service.list_for_pizza(8).await.expect_err("missing");

        assert_eq!(error.message(), "pizza 8 not found");
    }
}
