//! Driving port for menu mutations (staff only).

use async_trait::async_trait;

use crate::domain::{Error, Pizza, PizzaDraft, PizzaId, PizzaPatch};

/// Create, update and remove menu items.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PizzaCommand: Send + Sync {
    /// Create a pizza; the slug must be unused and translations valid.
    async fn create(&self, draft: PizzaDraft) -> Result<Pizza, Error>;

    /// Patch an existing pizza.
    async fn update(&self, id: PizzaId, patch: PizzaPatch) -> Result<Pizza, Error>;

    /// Delete a pizza together with its translations and reviews.
    async fn remove(&self, id: PizzaId) -> Result<(), Error>;
}
