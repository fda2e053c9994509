//! Driving port for dispatching deliveries.

use async_trait::async_trait;

use crate::domain::{AuthenticatedUser, Delivery, Error, OrderId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeliveryCommand: Send + Sync {
    /// Create the delivery of an order, estimating the trip from the store.
    async fn create(&self, user: AuthenticatedUser, order_id: OrderId)
    -> Result<Delivery, Error>;
}
