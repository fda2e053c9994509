//! Port abstraction for order persistence adapters.

use async_trait::async_trait;

use crate::domain::{NewOrder, Order, OrderId, OrderStatus, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by order repository adapters.
    pub enum OrderRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "order repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "order repository query failed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderRepository: Send + Sync {
    /// List orders newest first, restricted to `owner` when given.
    async fn list(&self, owner: Option<UserId>) -> Result<Vec<Order>, OrderRepositoryError>;

    /// Fetch an order with its items.
    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, OrderRepositoryError>;

    /// Insert an order and its items atomically.
    async fn create(&self, order: &NewOrder) -> Result<Order, OrderRepositoryError>;

    /// Move the order from `expected` to `status`.
    ///
    /// Returns `None` when no order with `id` is still in `expected`, so
    /// concurrent writers cannot both apply a transition from the same state.
    async fn update_status(
        &self,
        id: OrderId,
        expected: OrderStatus,
        status: OrderStatus,
    ) -> Result<Option<Order>, OrderRepositoryError>;
}
