//! Driving port for review reads.

use async_trait::async_trait;

use crate::domain::{Error, PizzaId, Review};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewQuery: Send + Sync {
    /// Reviews of one pizza, newest first.
    async fn list_for_pizza(&self, pizza_id: PizzaId) -> Result<Vec<Review>, Error>;
}
