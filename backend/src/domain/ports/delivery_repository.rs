//! Port abstraction for delivery persistence adapters.

use async_trait::async_trait;

use crate::domain::{Delivery, NewDelivery, OrderId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by delivery repository adapters.
    pub enum DeliveryRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "delivery repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "delivery repository query failed: {message}",
        /// The order already has a delivery.
        Duplicate => "delivery already exists for this order",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DeliveryRepository: Send + Sync {
    /// Fetch the delivery of an order.
    async fn find_by_order(
        &self,
        order_id: OrderId,
    ) -> Result<Option<Delivery>, DeliveryRepositoryError>;

    /// Insert a delivery.
    async fn create(&self, delivery: &NewDelivery) -> Result<Delivery, DeliveryRepositoryError>;
}
