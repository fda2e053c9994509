//! Wire-level frames for the order status gateway.
//!
//! Every frame is `{ "event": <name>, "data": <payload> }`.

use serde::{Deserialize, Serialize};

use crate::domain::OrderId;
use crate::domain::ports::OrderStatusUpdate;

/// Frames accepted from clients.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ClientMessage {
    /// Join the room of an order.
    SubscribeOrder(OrderId),
}

/// Frames pushed to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", content = "data", rename_all = "camelCase")]
pub enum ServerMessage {
    /// Acknowledges a subscription.
    Subscribed(String),
    /// Status change for a subscribed order.
    OrderStatusUpdate(OrderStatusUpdate),
}

impl ServerMessage {
    /// Subscription acknowledgement for `order_id`.
    pub fn subscribed(order_id: OrderId) -> Self {
        Self::Subscribed(format!("Subscribed to order {order_id}"))
    }
}
