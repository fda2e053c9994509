//! Driving port for order reads.

use async_trait::async_trait;

use crate::domain::{AuthenticatedUser, Error, Order, OrderId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderQuery: Send + Sync {
    /// Orders visible to `user`, newest first.
    async fn list(&self, user: AuthenticatedUser) -> Result<Vec<Order>, Error>;

    /// One order, hidden from customers who do not own it.
    async fn find_one(&self, user: AuthenticatedUser, id: OrderId) -> Result<Order, Error>;
}
