//! Menu domain service.
//!
//! Implements the pizza driving ports. Mutations run sequential
//! existence-then-mutate checks so callers get a precise error for unknown
//! ids and slug clashes; the repository still reports raced unique
//! violations, which map to the same slug error.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use crate::domain::pizza::validate_translations;
use crate::domain::ports::{PizzaCommand, PizzaQuery, PizzaRepository, PizzaRepositoryError};
use crate::domain::{
    Error, LocalizedPizza, Pizza, PizzaDraft, PizzaFilter, PizzaId, PizzaPatch, PizzaSlug,
    PizzaValidationError,
};

const SLUG_IN_USE: &str = "slug already in use";

fn slug_in_use(slug: &str) -> Error {
    Error::invalid_request(SLUG_IN_USE).with_details(json!({ "field": "slug", "slug": slug }))
}

fn not_found(id: PizzaId) -> Error {
    Error::not_found(format!("pizza {id} not found"))
}

fn invalid(error: PizzaValidationError) -> Error {
    Error::invalid_request(error.to_string()).with_details(json!({ "field": error.field() }))
}

fn map_repository_error(error: PizzaRepositoryError) -> Error {
    match error {
        PizzaRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("pizza repository unavailable: {message}"))
        }
        PizzaRepositoryError::Query { message } => {
            Error::internal(format!("pizza repository error: {message}"))
        }
        PizzaRepositoryError::SlugTaken { slug } => slug_in_use(&slug),
        PizzaRepositoryError::InUse { id } => {
            Error::conflict(format!("pizza {id} is referenced by existing orders"))
        }
    }
}

/// Pizza service implementing the menu command and query ports.
#[derive(Clone)]
pub struct PizzaService<R> {
    pizza_repo: Arc<R>,
}

impl<R> PizzaService<R> {
    /// Create a new service with the pizza repository.
    pub fn new(pizza_repo: Arc<R>) -> Self {
        Self { pizza_repo }
    }
}

impl<R> PizzaService<R>
where
    R: PizzaRepository,
{
    async fn ensure_slug_free(&self, slug: &PizzaSlug, owner: Option<PizzaId>) -> Result<(), Error> {
        let holder = self
            .pizza_repo
            .find_by_slug(slug.as_ref())
            .await
            .map_err(map_repository_error)?;
        match holder {
            Some(pizza) if Some(pizza.id) != owner => Err(slug_in_use(slug.as_ref())),
            _ => Ok(()),
        }
    }

    async fn existing(&self, id: PizzaId) -> Result<Pizza, Error> {
        self.pizza_repo
            .find_by_id(id)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| not_found(id))
    }
}

#[async_trait]
impl<R> PizzaCommand for PizzaService<R>
where
    R: PizzaRepository,
{
    async fn create(&self, draft: PizzaDraft) -> Result<Pizza, Error> {
        self.ensure_slug_free(&draft.slug, None).await?;
        validate_translations(&draft.translations).map_err(invalid)?;

        let pizza = self
            .pizza_repo
            .create(&draft)
            .await
            .map_err(map_repository_error)?;
        info!(pizza_id = pizza.id, slug = %pizza.slug, "pizza created");
        Ok(pizza)
    }

    async fn update(&self, id: PizzaId, patch: PizzaPatch) -> Result<Pizza, Error> {
        let current = self.existing(id).await?;
        if let Some(slug) = patch.slug.as_ref().filter(|slug| **slug != current.slug) {
            self.ensure_slug_free(slug, Some(id)).await?;
        }
        if let Some(translations) = patch.translations.as_deref() {
            validate_translations(translations).map_err(invalid)?;
        }

        self.pizza_repo
            .update(id, &patch)
            .await
            .map_err(map_repository_error)?
            .ok_or_else(|| not_found(id))
    }

    async fn remove(&self, id: PizzaId) -> Result<(), Error> {
        self.existing(id).await?;
        let removed = self
            .pizza_repo
            .delete(id)
            .await
            .map_err(map_repository_error)?;
        if !removed {
            return Err(not_found(id));
        }
        info!(pizza_id = id, "pizza removed");
        Ok(())
    }
}

#[async_trait]
impl<R> PizzaQuery for PizzaService<R>
where
    R: PizzaRepository,
{
    async fn find_all(&self, filter: PizzaFilter) -> Result<Vec<LocalizedPizza>, Error> {
        filter.validate().map_err(invalid)?;
        let pizzas = self
            .pizza_repo
            .list(&filter)
            .await
            .map_err(map_repository_error)?;

        let locale = filter.locale.as_deref();
        Ok(pizzas
            .into_iter()
            .map(|pizza| match locale {
                Some(_) => pizza.localize(locale),
                None => LocalizedPizza::from(pizza),
            })
            .collect())
    }

    async fn find_one(&self, id: PizzaId, locale: Option<String>) -> Result<LocalizedPizza, Error> {
        let pizza = self.existing(id).await?;
        Ok(pizza.localize(locale.as_deref()))
    }
}

#[cfg(test)]
#[path = "pizza_service_tests.rs"]
mod tests;
