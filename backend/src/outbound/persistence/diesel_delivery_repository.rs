//! PostgreSQL-backed `DeliveryRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{DeliveryRepository, DeliveryRepositoryError};
use crate::domain::{Delivery, NewDelivery, OrderId};

use super::diesel_basic_error_mapping::{
    ConstraintViolation, constraint_violation, map_basic_diesel_error, map_basic_pool_error,
};
use super::models::{DeliveryRow, NewDeliveryRow};
use super::pool::{DbPool, PoolError};
use super::schema::deliveries;

/// Diesel-backed implementation of the delivery repository port.
#[derive(Clone)]
pub struct DieselDeliveryRepository {
    pool: DbPool,
}

impl DieselDeliveryRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> DeliveryRepositoryError {
    map_basic_pool_error(error, |message| DeliveryRepositoryError::connection(message))
}

fn map_diesel_error(error: diesel::result::Error) -> DeliveryRepositoryError {
    map_basic_diesel_error(
        error,
        DeliveryRepositoryError::query,
        DeliveryRepositoryError::connection,
    )
}

fn row_to_delivery(row: DeliveryRow) -> Delivery {
    Delivery {
        id: row.id,
        order_id: row.order_id,
        origin: row.origin,
        destination: row.destination,
        distance_text: row.distance_text,
        distance_meters: row.distance_meters,
        duration_text: row.duration_text,
        duration_seconds: row.duration_seconds,
        created_at: row.created_at,
    }
}

#[async_trait]
impl DeliveryRepository for DieselDeliveryRepository {
    async fn find_by_order(
        &self,
        order_id: OrderId,
    ) -> Result<Option<Delivery>, DeliveryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = deliveries::table
            .filter(deliveries::order_id.eq(order_id))
            .select(DeliveryRow::as_select())
            .first::<DeliveryRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(row_to_delivery))
    }

    async fn create(&self, delivery: &NewDelivery) -> Result<Delivery, DeliveryRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let estimate = &delivery.estimate;
        let row = NewDeliveryRow {
            order_id: delivery.order_id,
            origin: delivery.origin.as_str(),
            destination: delivery.destination.as_str(),
            distance_text: estimate.distance_text.as_deref(),
            distance_meters: estimate.distance_value,
            duration_text: estimate.duration_text.as_deref(),
            duration_seconds: estimate.duration_value,
        };
        let stored = diesel::insert_into(deliveries::table)
            .values(&row)
            .returning(DeliveryRow::as_returning())
            .get_result::<DeliveryRow>(&mut conn)
            .await
            .map_err(|err| match constraint_violation(&err) {
                Some(ConstraintViolation::Unique) => DeliveryRepositoryError::duplicate(),
                _ => map_diesel_error(err),
            })?;
        Ok(row_to_delivery(stored))
    }
}
