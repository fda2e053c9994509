//! Driving port for delivery reads.

use async_trait::async_trait;

use crate::domain::{AuthenticatedUser, Delivery, Error, OrderId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeliveryQuery: Send + Sync {
    /// Delivery of an order visible to `user`.
    async fn find_by_order(
        &self,
        user: AuthenticatedUser,
        order_id: OrderId,
    ) -> Result<Delivery, Error>;
}
