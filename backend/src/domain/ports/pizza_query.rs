//! Driving port for menu reads.

use async_trait::async_trait;

use crate::domain::{Error, LocalizedPizza, PizzaFilter, PizzaId};

/// Read the menu.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PizzaQuery: Send + Sync {
    /// List pizzas inside the filter's price bounds.
    async fn find_all(&self, filter: PizzaFilter) -> Result<Vec<LocalizedPizza>, Error>;

    /// Fetch one pizza localised for `locale`.
    async fn find_one(&self, id: PizzaId, locale: Option<String>) -> Result<LocalizedPizza, Error>;
}
