//! PostgreSQL-backed `PizzaRepository` implementation using Diesel ORM.
//!
//! Pizzas and their translations are written in one transaction. Reads load
//! the parent rows first and attach translations with a single
//! `belonging_to` query.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{PizzaRepository, PizzaRepositoryError};
use crate::domain::{
    Pizza, PizzaDraft, PizzaFilter, PizzaId, PizzaPatch, PizzaSlug, PizzaTranslation, Price,
};

use super::diesel_basic_error_mapping::{
    ConstraintViolation, constraint_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{
    NewPizzaRow, NewPizzaTranslationRow, PizzaChangeset, PizzaRow, PizzaTranslationRow,
};
use super::pool::{DbPool, PoolError};
use super::schema::{pizza_translations, pizzas};

/// Diesel-backed implementation of the pizza repository port.
#[derive(Clone)]
pub struct DieselPizzaRepository {
    pool: DbPool,
}

impl DieselPizzaRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> PizzaRepositoryError {
    map_basic_pool_error(error, PizzaRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> PizzaRepositoryError {
    map_basic_diesel_error(
        error,
        PizzaRepositoryError::query,
        PizzaRepositoryError::connection,
    )
}

/// Writes only hit one unique constraint that validation cannot rule out:
/// `pizzas.slug`. Translation locales are checked before the transaction.
fn map_write_error(error: diesel::result::Error, slug: Option<&str>) -> PizzaRepositoryError {
    match (constraint_violation(&error), slug) {
        (Some(ConstraintViolation::Unique), Some(slug)) => PizzaRepositoryError::slug_taken(slug),
        _ => map_diesel_error(error),
    }
}

type PizzaWithTranslations = (PizzaRow, Vec<PizzaTranslationRow>);

async fn attach_translations(
    conn: &mut AsyncPgConnection,
    rows: Vec<PizzaRow>,
) -> QueryResult<Vec<PizzaWithTranslations>> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let translations = PizzaTranslationRow::belonging_to(&rows)
        .select(PizzaTranslationRow::as_select())
        .order(pizza_translations::id.asc())
        .load::<PizzaTranslationRow>(conn)
        .await?;
    let grouped = translations.grouped_by(&rows);
    Ok(rows.into_iter().zip(grouped).collect())
}

async fn insert_translations(
    conn: &mut AsyncPgConnection,
    pizza_id: PizzaId,
    translations: &[PizzaTranslation],
) -> QueryResult<Vec<PizzaTranslationRow>> {
    let rows: Vec<NewPizzaTranslationRow<'_>> = translations
        .iter()
        .map(|translation| NewPizzaTranslationRow {
            pizza_id,
            locale: translation.locale.as_str(),
            name: translation.name.as_str(),
            description: translation.description.as_deref(),
        })
        .collect();
    diesel::insert_into(pizza_translations::table)
        .values(&rows)
        .returning(PizzaTranslationRow::as_returning())
        .get_results(conn)
        .await
}

fn row_to_pizza(
    (row, translations): PizzaWithTranslations,
) -> Result<Pizza, PizzaRepositoryError> {
    let corrupt =
        |err: &dyn std::fmt::Display| PizzaRepositoryError::query(format!("pizza {}: {err}", row.id));
    let slug = PizzaSlug::new(&row.slug).map_err(|err| corrupt(&err))?;
    let price = Price::from_cents(row.price_cents).map_err(|err| corrupt(&err))?;

    Ok(Pizza {
        id: row.id,
        slug,
        price,
        image_url: row.image_url,
        available: row.available,
        translations: translations
            .into_iter()
            .map(|t| PizzaTranslation {
                locale: t.locale,
                name: t.name,
                description: t.description,
            })
            .collect(),
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn rows_to_pizzas(rows: Vec<PizzaWithTranslations>) -> Result<Vec<Pizza>, PizzaRepositoryError> {
    rows.into_iter().map(row_to_pizza).collect()
}

impl DieselPizzaRepository {
    async fn load_where<F>(&self, scope: F) -> Result<Vec<Pizza>, PizzaRepositoryError>
    where
        F: FnOnce(pizzas::BoxedQuery<'static, diesel::pg::Pg>) -> pizzas::BoxedQuery<'static, diesel::pg::Pg>
            + Send,
    {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows = scope(pizzas::table.into_boxed())
            .order(pizzas::id.asc())
            .select(PizzaRow::as_select())
            .load::<PizzaRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let rows = attach_translations(&mut conn, rows)
            .await
            .map_err(map_diesel_error)?;
        rows_to_pizzas(rows)
    }
}

#[async_trait]
impl PizzaRepository for DieselPizzaRepository {
    async fn list(&self, filter: &PizzaFilter) -> Result<Vec<Pizza>, PizzaRepositoryError> {
        let min = filter.min_price.map(|price| price.cents());
        let max = filter.max_price.map(|price| price.cents());
        self.load_where(move |mut query| {
            if let Some(min) = min {
                query = query.filter(pizzas::price_cents.ge(min));
            }
            if let Some(max) = max {
                query = query.filter(pizzas::price_cents.le(max));
            }
            query
        })
        .await
    }

    async fn find_by_id(&self, id: PizzaId) -> Result<Option<Pizza>, PizzaRepositoryError> {
        let found = self
            .load_where(move |query| query.filter(pizzas::id.eq(id)))
            .await?;
        Ok(found.into_iter().next())
    }

    async fn find_by_ids(&self, ids: &[PizzaId]) -> Result<Vec<Pizza>, PizzaRepositoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let ids = ids.to_vec();
        self.load_where(move |query| query.filter(pizzas::id.eq_any(ids)))
            .await
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Pizza>, PizzaRepositoryError> {
        let slug = slug.to_owned();
        let found = self
            .load_where(move |query| query.filter(pizzas::slug.eq(slug)))
            .await?;
        Ok(found.into_iter().next())
    }

    async fn create(&self, draft: &PizzaDraft) -> Result<Pizza, PizzaRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_row = NewPizzaRow {
            slug: draft.slug.as_ref(),
            price_cents: draft.price.cents(),
            image_url: draft.image_url.as_deref(),
            available: draft.available,
        };

        let created = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                async move {
                    let row = diesel::insert_into(pizzas::table)
                        .values(&new_row)
                        .returning(PizzaRow::as_returning())
                        .get_result::<PizzaRow>(conn)
                        .await?;
                    let translations =
                        insert_translations(conn, row.id, &draft.translations).await?;
                    Ok((row, translations))
                }
                .scope_boxed()
            })
            .await
            .map_err(|err| map_write_error(err, Some(draft.slug.as_ref())))?;
        row_to_pizza(created)
    }

    async fn update(
        &self,
        id: PizzaId,
        patch: &PizzaPatch,
    ) -> Result<Option<Pizza>, PizzaRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changes = PizzaChangeset {
            slug: patch.slug.as_ref().map(AsRef::as_ref),
            price_cents: patch.price.map(|price| price.cents()),
            image_url: patch.image_url.as_deref(),
            available: patch.available,
            updated_at: Utc::now(),
        };

        let updated = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                async move {
                    let Some(row) = diesel::update(pizzas::table.find(id))
                        .set(&changes)
                        .returning(PizzaRow::as_returning())
                        .get_result::<PizzaRow>(conn)
                        .await
                        .optional()?
                    else {
                        return Ok(None);
                    };
                    if let Some(translations) = patch.translations.as_deref() {
                        diesel::delete(
                            pizza_translations::table.filter(pizza_translations::pizza_id.eq(id)),
                        )
                        .execute(conn)
                        .await?;
                        insert_translations(conn, id, translations).await?;
                    }
                    let mut loaded = attach_translations(conn, vec![row]).await?;
                    Ok(loaded.pop())
                }
                .scope_boxed()
            })
            .await
            .map_err(|err| map_write_error(err, patch.slug.as_ref().map(AsRef::as_ref)))?;
        updated.map(row_to_pizza).transpose()
    }

    async fn delete(&self, id: PizzaId) -> Result<bool, PizzaRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let removed = diesel::delete(pizzas::table.find(id))
            .execute(&mut conn)
            .await
            .map_err(|err| match constraint_violation(&err) {
                Some(ConstraintViolation::ForeignKey) => PizzaRepositoryError::in_use(id),
                _ => map_diesel_error(err),
            })?;
        Ok(removed > 0)
    }
}
