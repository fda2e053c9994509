//! Order domain service.
//!
//! Prices orders from the current menu, enforces ownership on reads, and
//! drives the status lifecycle. Successful status changes are published to
//! the order's gateway room.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use crate::domain::order::MAX_ITEM_QUANTITY;
use crate::domain::ports::{
    OrderCommand, OrderQuery, OrderRepository, OrderRepositoryError, OrderStatusNotifier,
    OrderStatusUpdate, PizzaRepository, PizzaRepositoryError,
};
use crate::domain::{
    AuthenticatedUser, Error, NewOrder, Order, OrderId, OrderItem, OrderStatus, PizzaId,
    PlaceOrderRequest, Price,
};

fn map_order_error(error: OrderRepositoryError) -> Error {
    match error {
        OrderRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("order repository unavailable: {message}"))
        }
        OrderRepositoryError::Query { message } => {
            Error::internal(format!("order repository error: {message}"))
        }
    }
}

fn map_pizza_error(error: PizzaRepositoryError) -> Error {
    match error {
        PizzaRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("pizza repository unavailable: {message}"))
        }
        other => Error::internal(format!("pizza repository error: {other}")),
    }
}

fn not_found(id: OrderId) -> Error {
    Error::not_found(format!("order {id} not found"))
}

fn invalid_item(message: String, pizza_id: Option<PizzaId>) -> Error {
    Error::invalid_request(message).with_details(json!({ "field": "items", "pizzaId": pizza_id }))
}

/// Order service implementing the order command and query ports.
#[derive(Clone)]
pub struct OrderService<O, P> {
    order_repo: Arc<O>,
    pizza_repo: Arc<P>,
    notifier: Arc<dyn OrderStatusNotifier>,
}

impl<O, P> OrderService<O, P> {
    /// Create a new service.
    pub fn new(
        order_repo: Arc<O>,
        pizza_repo: Arc<P>,
        notifier: Arc<dyn OrderStatusNotifier>,
    ) -> Self {
        Self {
            order_repo,
            pizza_repo,
            notifier,
        }
    }
}

impl<O, P> OrderService<O, P>
where
    O: OrderRepository,
    P: PizzaRepository,
{
    async fn price_items(&self, request: &PlaceOrderRequest) -> Result<(Vec<OrderItem>, Price), Error> {
        if request.items.is_empty() {
            return Err(invalid_item(
                "order must contain at least one item".to_owned(),
                None,
            ));
        }
        if let Some(line) = request
            .items
            .iter()
            .find(|line| !(1..=MAX_ITEM_QUANTITY).contains(&line.quantity))
        {
            return Err(invalid_item(
                format!("quantity must be between 1 and {MAX_ITEM_QUANTITY}"),
                Some(line.pizza_id),
            ));
        }

        let mut ids: Vec<PizzaId> = request.items.iter().map(|line| line.pizza_id).collect();
        ids.sort_unstable();
        ids.dedup();
        let pizzas = self
            .pizza_repo
            .find_by_ids(&ids)
            .await
            .map_err(map_pizza_error)?;

        let mut items = Vec::with_capacity(request.items.len());
        let mut total: i64 = 0;
        for line in &request.items {
            let pizza = pizzas
                .iter()
                .find(|pizza| pizza.id == line.pizza_id)
                .ok_or_else(|| {
                    invalid_item(
                        format!("pizza {} does not exist", line.pizza_id),
                        Some(line.pizza_id),
                    )
                })?;
            if !pizza.available {
                return Err(invalid_item(
                    format!("pizza {} is not available", line.pizza_id),
                    Some(line.pizza_id),
                ));
            }
            let subtotal = pizza
                .price
                .times(line.quantity)
                .ok_or_else(|| Error::invalid_request("order total is too large"))?;
            total = total
                .checked_add(subtotal.cents())
                .ok_or_else(|| Error::invalid_request("order total is too large"))?;
            items.push(OrderItem {
                pizza_id: line.pizza_id,
                quantity: line.quantity,
                unit_price: pizza.price,
            });
        }

        let total = Price::from_cents(total).map_err(|err| Error::internal(err.to_string()))?;
        Ok((items, total))
    }

    async fn visible_order(&self, user: AuthenticatedUser, id: OrderId) -> Result<Order, Error> {
        let order = self
            .order_repo
            .find_by_id(id)
            .await
            .map_err(map_order_error)?
            .ok_or_else(|| not_found(id))?;
        if !user.is_staff() && order.user_id != user.id {
            return Err(not_found(id));
        }
        Ok(order)
    }
}

#[async_trait]
impl<O, P> OrderCommand for OrderService<O, P>
where
    O: OrderRepository,
    P: PizzaRepository,
{
    async fn place(
        &self,
        user: AuthenticatedUser,
        request: PlaceOrderRequest,
    ) -> Result<Order, Error> {
        let delivery_address = request.delivery_address.trim().to_owned();
        if delivery_address.is_empty() {
            return Err(Error::invalid_request("delivery address must not be empty")
                .with_details(json!({ "field": "deliveryAddress" })));
        }
        let (items, total) = self.price_items(&request).await?;

        let order = self
            .order_repo
            .create(&NewOrder {
                user_id: user.id,
                items,
                total,
                delivery_address,
            })
            .await
            .map_err(map_order_error)?;
        info!(order_id = order.id, user_id = %user.id, total = %order.total, "order placed");
        Ok(order)
    }

    async fn update_status(
        &self,
        user: AuthenticatedUser,
        id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, Error> {
        if !user.is_staff() {
            return Err(Error::forbidden("only staff may change order status"));
        }
        let current = self.visible_order(user, id).await?;
        if !current.status.can_transition_to(status) {
            return Err(Error::conflict(format!(
                "cannot move order {id} from {} to {status}",
                current.status
            )));
        }

        let updated = self
            .order_repo
            .update_status(id, current.status, status)
            .await
            .map_err(map_order_error)?
            .ok_or_else(|| {
                Error::conflict(format!(
                    "order {id} changed status before it could move to {status}"
                ))
            })?;
        self.notifier.publish(OrderStatusUpdate {
            order_id: id,
            status: updated.status,
        });
        info!(order_id = id, from = %current.status, to = %updated.status, "order status changed");
        Ok(updated)
    }
}

#[async_trait]
impl<O, P> OrderQuery for OrderService<O, P>
where
    O: OrderRepository,
    P: PizzaRepository,
{
    async fn list(&self, user: AuthenticatedUser) -> Result<Vec<Order>, Error> {
        let owner = (!user.is_staff()).then_some(user.id);
        self.order_repo.list(owner).await.map_err(map_order_error)
    }

    async fn find_one(&self, user: AuthenticatedUser, id: OrderId) -> Result<Order, Error> {
        self.visible_order(user, id).await
    }
}

#[cfg(test)]
#[path = "order_service_tests.rs"]
mod tests;
