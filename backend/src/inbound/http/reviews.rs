//! Review API handlers.
//!
//! ```text
//! POST   /api/v1/reviews {"pizzaId":1,"rating":5,"comment":"Crispy"}
//! GET    /api/v1/pizzas/{id}/reviews
//! DELETE /api/v1/reviews/{id}
//! ```

use actix_web::{HttpResponse, delete, get, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::ports::CreateReviewRequest;
use crate::domain::{AuthenticatedUser, Error, PizzaId, Rating, Review, ReviewId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::review_validation_error;

/// Body for reviewing a pizza.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateReviewBody {
    pub pizza_id: PizzaId,
    #[schema(minimum = 1, maximum = 5)]
    pub rating: i64,
    #[serde(default)]
    pub comment: Option<String>,
}

impl TryFrom<CreateReviewBody> for CreateReviewRequest {
    type Error = Error;

    fn try_from(body: CreateReviewBody) -> Result<Self, Self::Error> {
        Ok(Self {
            pizza_id: body.pizza_id,
            rating: Rating::new(body.rating).map_err(review_validation_error)?,
            comment: body.comment,
        })
    }
}

/// Review a pizza. One review per customer per pizza.
#[utoipa::path(
    post,
    path = "/api/v1/reviews",
    request_body = CreateReviewBody,
    responses(
        (status = 201, description = "Review stored", body = Review),
        (status = 400, description = "Rating out of range or comment too long", body = Error),
        (status = 404, description = "Unknown pizza", body = Error),
        (status = 409, description = "Pizza already reviewed by this user", body = Error)
    ),
    tags = ["reviews"],
    operation_id = "createReview",
    security(("BearerAuth" = []))
)]
#[post("/reviews")]
pub async fn create_review(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    payload: web::Json<CreateReviewBody>,
) -> ApiResult<HttpResponse> {
    let request = CreateReviewRequest::try_from(payload.into_inner())?;
    let review = state.reviews.create(user, request).await?;
    Ok(HttpResponse::Created().json(review))
}

/// Reviews of a pizza, newest first.
#[utoipa::path(
    get,
    path = "/api/v1/pizzas/{id}/reviews",
    params(("id" = i32, Path, description = "Pizza id")),
    responses(
        (status = 200, description = "Reviews", body = [Review]),
        (status = 404, description = "Unknown pizza", body = Error)
    ),
    tags = ["reviews"],
    operation_id = "listPizzaReviews",
    security([])
)]
#[get("/pizzas/{id}/reviews")]
pub async fn list_pizza_reviews(
    state: web::Data<HttpState>,
    path: web::Path<PizzaId>,
) -> ApiResult<web::Json<Vec<Review>>> {
    let reviews = state.reviews_query.list_for_pizza(path.into_inner()).await?;
    Ok(web::Json(reviews))
}

/// Delete a review. Authors may delete their own; staff may delete any.
#[utoipa::path(
    delete,
    path = "/api/v1/reviews/{id}",
    params(("id" = i32, Path, description = "Review id")),
    responses(
        (status = 204, description = "Review removed"),
        (status = 403, description = "Not the author", body = Error),
        (status = 404, description = "Unknown review", body = Error)
    ),
    tags = ["reviews"],
    operation_id = "deleteReview",
    security(("BearerAuth" = []))
)]
#[delete("/reviews/{id}")]
pub async fn delete_review(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<ReviewId>,
) -> ApiResult<HttpResponse> {
    state.reviews.remove(user, path.into_inner()).await?;
    Ok(HttpResponse::NoContent().finish())
}
