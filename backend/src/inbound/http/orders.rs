//! Order API handlers.
//!
//! ```text
//! POST  /api/v1/orders {"items":[{"pizzaId":1,"quantity":2}],"deliveryAddress":"Rua Augusta, 100"}
//! GET   /api/v1/orders
//! GET   /api/v1/orders/{id}
//! PATCH /api/v1/orders/{id}/status {"status":"confirmed"}
//! ```

use actix_web::{HttpResponse, get, patch, post, web};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{AuthenticatedUser, Error, Order, OrderId, OrderStatus, PlaceOrderRequest};
use crate::inbound::http::ApiResult;
use crate::inbound::http::state::HttpState;

/// Body for moving an order to its next status.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: OrderStatus,
}

/// Place an order for the authenticated customer.
#[utoipa::path(
    post,
    path = "/api/v1/orders",
    request_body = PlaceOrderRequest,
    responses(
        (status = 201, description = "Order placed", body = Order),
        (status = 400, description = "Empty order, bad quantity or unavailable pizza", body = Error),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["orders"],
    operation_id = "placeOrder",
    security(("BearerAuth" = []))
)]
#[post("/orders")]
pub async fn place_order(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    payload: web::Json<PlaceOrderRequest>,
) -> ApiResult<HttpResponse> {
    let order = state.orders.place(user, payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(order))
}

/// List orders, newest first. Staff see every order.
#[utoipa::path(
    get,
    path = "/api/v1/orders",
    responses(
        (status = 200, description = "Orders", body = [Order]),
        (status = 401, description = "Unauthorised", body = Error)
    ),
    tags = ["orders"],
    operation_id = "listOrders",
    security(("BearerAuth" = []))
)]
#[get("/orders")]
pub async fn list_orders(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
) -> ApiResult<web::Json<Vec<Order>>> {
    let orders = state.orders_query.list(user).await?;
    Ok(web::Json(orders))
}

/// Fetch one order.
#[utoipa::path(
    get,
    path = "/api/v1/orders/{id}",
    params(("id" = i32, Path, description = "Order id")),
    responses(
        (status = 200, description = "Order", body = Order),
        (status = 404, description = "Unknown order or owned by someone else", body = Error)
    ),
    tags = ["orders"],
    operation_id = "getOrder",
    security(("BearerAuth" = []))
)]
#[get("/orders/{id}")]
pub async fn get_order(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<OrderId>,
) -> ApiResult<web::Json<Order>> {
    let order = state.orders_query.find_one(user, path.into_inner()).await?;
    Ok(web::Json(order))
}

/// Advance or cancel an order and notify subscribers.
#[utoipa::path(
    patch,
    path = "/api/v1/orders/{id}/status",
    params(("id" = i32, Path, description = "Order id")),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Updated order", body = Order),
        (status = 403, description = "Staff only", body = Error),
        (status = 404, description = "Unknown order", body = Error),
        (status = 409, description = "Illegal status transition", body = Error)
    ),
    tags = ["orders"],
    operation_id = "updateOrderStatus",
    security(("BearerAuth" = []))
)]
#[patch("/orders/{id}/status")]
pub async fn update_order_status(
    state: web::Data<HttpState>,
    user: AuthenticatedUser,
    path: web::Path<OrderId>,
    payload: web::Json<UpdateOrderStatusRequest>,
) -> ApiResult<web::Json<Order>> {
    let order = state
        .orders
        .update_status(user, path.into_inner(), payload.into_inner().status)
        .await?;
    Ok(web::Json(order))
}
