//! Driving port for order placement and kitchen progress.

use async_trait::async_trait;

use crate::domain::{AuthenticatedUser, Error, Order, OrderId, OrderStatus, PlaceOrderRequest};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderCommand: Send + Sync {
    /// Price and store a new order for `user`.
    async fn place(
        &self,
        user: AuthenticatedUser,
        request: PlaceOrderRequest,
    ) -> Result<Order, Error>;

    /// Move an order to `status` and notify subscribers. Staff only.
    async fn update_status(
        &self,
        user: AuthenticatedUser,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, Error>;
}
