//! Port abstraction for pizza persistence adapters.

use async_trait::async_trait;

use crate::domain::{Pizza, PizzaDraft, PizzaFilter, PizzaId, PizzaPatch};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by pizza repository adapters.
    pub enum PizzaRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "pizza repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "pizza repository query failed: {message}",
        /// Another pizza already owns the slug.
        SlugTaken { slug: String } => "slug {slug} already in use",
        /// Orders still reference the pizza.
        InUse { id: i32 } => "pizza {id} is referenced by orders",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PizzaRepository: Send + Sync {
    /// List pizzas matching the price bounds, ordered by id.
    async fn list(&self, filter: &PizzaFilter) -> Result<Vec<Pizza>, PizzaRepositoryError>;

    /// Fetch a pizza with its translations.
    async fn find_by_id(&self, id: PizzaId) -> Result<Option<Pizza>, PizzaRepositoryError>;

    /// Fetch every pizza whose id appears in `ids`.
    async fn find_by_ids(&self, ids: &[PizzaId]) -> Result<Vec<Pizza>, PizzaRepositoryError>;

    /// Fetch the pizza owning `slug`.
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Pizza>, PizzaRepositoryError>;

    /// Insert a pizza and its translations atomically.
    async fn create(&self, draft: &PizzaDraft) -> Result<Pizza, PizzaRepositoryError>;

    /// Apply a patch, returning `None` when the pizza does not exist.
    async fn update(
        &self,
        id: PizzaId,
        patch: &PizzaPatch,
    ) -> Result<Option<Pizza>, PizzaRepositoryError>;

    /// Delete a pizza, returning whether a row was removed.
    async fn delete(&self, id: PizzaId) -> Result<bool, PizzaRepositoryError>;
}
