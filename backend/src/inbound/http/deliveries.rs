//! Delivery API handlers.
//!
//! ```text
//! POST /api/v1/orders/{id}/delivery   (staff)
//! GET  /api/v1/orders/{id}/delivery
//! ```

use actix_web::{HttpResponse, get, post, web};

use crate::domain::{AuthenticatedUser, Delivery, Error, OrderId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Dispatch an order: estimate the trip from the store and record it.
#[utoipa::path(
    post,
    path = "/api/v1/orders/{id}/delivery",
    params(("id" = i32, Path, description = "Order id")),
    responses(
        (status = 201, description = "Delivery created", body = Delivery),
        (status = 403, description = "Staff only", body = Error),
        (status = 404, description = "Unknown order", body = Error),
        (status = 409, description = "Order cancelled or already dispatched", body = Error),
        (status = 503, description = "Maps API not configured", body = Error)
    ),
    tags = ["deliveries"],
    operation_id = "createDelivery",
    security(("BearerAuth" = []))
)]
#[post("/orders/{id}/delivery")]
pub async fn create_delivery(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<OrderId>,
) -> ApiResult<HttpResponse> {
    let delivery = state.deliveries.create(user, path.into_inner()).await?;
    Ok(HttpResponse::Created().json(delivery))
}

/// Fetch the delivery of an order.
#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}/delivery",
    params(("id" = i32, Path, description = "Order id")),
    responses(
        (status = 200, description = "Delivery", body = Delivery),
        (status = 404, description = "Unknown order or no delivery yet", body = Error)
    ),
    tags = ["deliveries"],
    operation_id = "getDelivery",
    security(("BearerAuth" = []))
)]
#[get("/orders/{id}/delivery")]
pub async fn get_delivery(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<OrderId>,
) -> ApiResult<web::Json<Delivery>> {
    let delivery = state
        .deliveries_query
        .find_by_order(user, path.into_inner())
        .await?;
    Ok(web::Json(delivery))
}
