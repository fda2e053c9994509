//! PostgreSQL-backed `OrderRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use chrono::Utc;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, AsyncPgConnection, RunQueryDsl};

use crate::domain::ports::{OrderRepository, OrderRepositoryError};
use crate::domain::{NewOrder, Order, OrderId, OrderItem, OrderStatus, Price, UserId};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::models::{NewOrderItemRow, NewOrderRow, OrderItemRow, OrderRow};
use super::pool::{DbPool, PoolError};
use super::schema::{order_items, orders};

/// Diesel-backed implementation of the order repository port.
#[derive(Clone)]
pub struct DieselOrderRepository {
    pool: DbPool,
}

impl DieselOrderRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> OrderRepositoryError {
    map_basic_pool_error(error, |message| OrderRepositoryError::connection(message))
}

fn map_diesel_error(error: diesel::result::Error) -> OrderRepositoryError {
    map_basic_diesel_error(
        error,
        OrderRepositoryError::query,
        OrderRepositoryError::connection,
    )
}

type OrderWithItems = (OrderRow, Vec<OrderItemRow>);

async fn attach_items(
    conn: &mut AsyncPgConnection,
    rows: Vec<OrderRow>,
) -> QueryResult<Vec<OrderWithItems>> {
    if rows.is_empty() {
        return Ok(Vec::new());
    }
    let items = OrderItemRow::belonging_to(&rows)
        .select(OrderItemRow::as_select())
        .order(order_items::id.asc())
        .load::<OrderItemRow>(conn)
        .await?;
    let grouped = items.grouped_by(&rows);
    Ok(rows.into_iter().zip(grouped).collect())
}

fn price(cents: i64, order_id: OrderId) -> Result<Price, OrderRepositoryError> {
    Price::from_cents(cents)
        .map_err(|err| OrderRepositoryError::query(format!("order {order_id}: {err}")))
}

fn row_to_order((row, items): OrderWithItems) -> Result<Order, OrderRepositoryError> {
    let status = row
        .status
        .parse::<OrderStatus>()
        .map_err(|err| OrderRepositoryError::query(format!("order {}: {err}", row.id)))?;
    let items = items
        .into_iter()
        .map(|item| {
            Ok(OrderItem {
                pizza_id: item.pizza_id,
                quantity: item.quantity,
                unit_price: price(item.unit_price_cents, row.id)?,
            })
        })
        .collect::<Result<Vec<_>, OrderRepositoryError>>()?;

    Ok(Order {
        id: row.id,
        user_id: UserId::from_uuid(row.user_id),
        status,
        items,
        total: price(row.total_cents, row.id)?,
        delivery_address: row.delivery_address,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

#[async_trait]
impl OrderRepository for DieselOrderRepository {
    async fn list(&self, owner: Option<UserId>) -> Result<Vec<Order>, OrderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = orders::table
            .select(OrderRow::as_select())
            .order((orders::created_at.desc(), orders::id.desc()))
            .into_boxed();
        if let Some(owner) = owner {
            query = query.filter(orders::user_id.eq(*owner.as_uuid()));
        }
        let rows = query
            .load::<OrderRow>(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        attach_items(&mut conn, rows)
            .await
            .map_err(map_diesel_error)?
            .into_iter()
            .map(row_to_order)
            .collect()
    }

    async fn find_by_id(&self, id: OrderId) -> Result<Option<Order>, OrderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = orders::table
            .find(id)
            .select(OrderRow::as_select())
            .first::<OrderRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        let Some(row) = row else {
            return Ok(None);
        };
        let mut loaded = attach_items(&mut conn, vec![row])
            .await
            .map_err(map_diesel_error)?;
        loaded.pop().map(row_to_order).transpose()
    }

    async fn create(&self, order: &NewOrder) -> Result<Order, OrderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let new_row = NewOrderRow {
            user_id: *order.user_id.as_uuid(),
            status: OrderStatus::Pending.as_str(),
            total_cents: order.total.cents(),
            delivery_address: order.delivery_address.as_str(),
        };

        let created = conn
            .transaction::<_, diesel::result::Error, _>(|conn| {
                async move {
                    let row = diesel::insert_into(orders::table)
                        .values(&new_row)
                        .returning(OrderRow::as_returning())
                        .get_result::<OrderRow>(conn)
                        .await?;
                    let lines: Vec<NewOrderItemRow> = order
                        .items
                        .iter()
                        .map(|item| NewOrderItemRow {
                            order_id: row.id,
                            pizza_id: item.pizza_id,
                            quantity: item.quantity,
                            unit_price_cents: item.unit_price.cents(),
                        })
                        .collect();
                    let items = diesel::insert_into(order_items::table)
                        .values(&lines)
                        .returning(OrderItemRow::as_returning())
                        .get_results::<OrderItemRow>(conn)
                        .await?;
                    Ok((row, items))
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;
        row_to_order(created)
    }

    async fn update_status(
        &self,
        id: OrderId,
        expected: OrderStatus,
        status: OrderStatus,
    ) -> Result<Option<Order>, OrderRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let target = orders::table
            .find(id)
            .filter(orders::status.eq(expected.as_str()));
        let row = diesel::update(target)
            .set((
                orders::status.eq(status.as_str()),
                orders::updated_at.eq(Utc::now()),
            ))
            .returning(OrderRow::as_returning())
            .get_result::<OrderRow>(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        let Some(row) = row else {
            return Ok(None);
        };
        let mut loaded = attach_items(&mut conn, vec![row])
            .await
            .map_err(map_diesel_error)?;
        loaded.pop().map(row_to_order).transpose()
    }
}
