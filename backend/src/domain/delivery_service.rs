//! Delivery domain service.
//!
//! Creating a delivery looks the order up, refuses cancelled or already
//! dispatched orders, and stores the travel estimate from the store to the
//! order's address.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::ports::{
    DeliveryCommand, DeliveryQuery, DeliveryRepository, DeliveryRepositoryError, OrderRepository,
    OrderRepositoryError, TravelEstimateQuery,
};
use crate::domain::{
    AuthenticatedUser, Delivery, Error, Location, NewDelivery, Order, OrderId, OrderStatus,
};

fn map_delivery_error(error: DeliveryRepositoryError) -> Error {
    match error {
        DeliveryRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("delivery repository unavailable: {message}"))
        }
        DeliveryRepositoryError::Query { message } => {
            Error::internal(format!("delivery repository error: {message}"))
        }
        DeliveryRepositoryError::Duplicate => duplicate(),
    }
}

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

fn duplicate() -> Error {
    Error::conflict("order already has a delivery")
}

/// Delivery service implementing the delivery command and query ports.
#[derive(Clone)]
pub struct DeliveryService<D, O> {
    delivery_repo: Arc<D>,
    order_repo: Arc<O>,
    travel: Arc<dyn TravelEstimateQuery>,
    store_origin: String,
}

impl<D, O> DeliveryService<D, O> {
    /// Create a new service; trips are estimated from `store_origin`.
    pub fn new(
        delivery_repo: Arc<D>,
        order_repo: Arc<O>,
        travel: Arc<dyn TravelEstimateQuery>,
        store_origin: impl Into<String>,
    ) -> Self {
        Self {
            delivery_repo,
            order_repo,
            travel,
            store_origin: store_origin.into(),
        }
    }
}

impl<D, O> DeliveryService<D, O>
where
    O: OrderRepository,
{
    async fn order(&self, user: AuthenticatedUser, order_id: OrderId) -> Result<Order, Error> {
        let order = self
            .order_repo
            .find_by_id(order_id)
            .await
            .map_err(map_order_error)?
            .filter(|order| user.is_staff() || order.user_id == user.id)
            .ok_or_else(|| Error::not_found(format!("order {order_id} not found")))?;
        Ok(order)
    }
}

#[async_trait]
impl<D, O> DeliveryCommand for DeliveryService<D, O>
where
    D: DeliveryRepository,
    O: OrderRepository,
{
    async fn create(
        &self,
        user: AuthenticatedUser,
        order_id: OrderId,
    ) -> Result<Delivery, Error> {
        if !user.is_staff() {
            return Err(Error::forbidden("only staff may dispatch deliveries"));
        }
        let order = self.order(user, order_id).await?;
        if order.status == OrderStatus::Cancelled {
            return Err(Error::conflict(format!("order {order_id} is cancelled")));
        }
        let existing = self
            .delivery_repo
            .find_by_order(order_id)
            .await
            .map_err(map_delivery_error)?;
        if existing.is_some() {
            return Err(duplicate());
        }

        let origin = Location::Address(self.store_origin.clone());
        let destination = Location::Address(order.delivery_address.clone());
        let estimate = self
            .travel
            .distance_and_duration(&origin, &destination)
            .await?;

        let delivery = self
            .delivery_repo
            .create(&NewDelivery {
                order_id,
                origin: self.store_origin.clone(),
                destination: order.delivery_address,
                estimate,
            })
            .await
            .map_err(map_delivery_error)?;
        info!(
            delivery_id = delivery.id,
            order_id,
            distance_meters = delivery.distance_meters,
            "delivery created"
        );
        Ok(delivery)
    }
}

#[async_trait]
impl<D, O> DeliveryQuery for DeliveryService<D, O>
where
    D: DeliveryRepository,
    O: OrderRepository,
{
    async fn find_by_order(
        &self,
        user: AuthenticatedUser,
        order_id: OrderId,
    ) -> Result<Delivery, Error> {
        self.order(user, order_id).await?;
        self.delivery_repo
            .find_by_order(order_id)
            .await
            .map_err(map_delivery_error)?
            .ok_or_else(|| Error::not_found(format!("delivery for order {order_id} not found")))
    }
}
