//! Driven port publishing order status changes to subscribed clients.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{OrderId, OrderStatus};

/// Payload pushed to the `order_<id>` room.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderStatusUpdate {
    pub order_id: OrderId,
    pub status: OrderStatus,
}

/// Room name clients join to follow one order.
///
/// # Examples
/// ```
/// use pizzeria::domain::ports::order_room;
///
/// assert_eq!(order_room(12), "order_12");
/// ```
pub fn order_room(order_id: OrderId) -> String {
    format!("order_{order_id}")
}

/// Fan-out of status updates; delivery is best effort.
#[cfg_attr(test, mockall::automock)]
pub trait OrderStatusNotifier: Send + Sync {
    /// Push `update` to every member of its order room.
    fn publish(&self, update: OrderStatusUpdate);
}
