//! Room registry fanning order status updates out to subscribed sockets.
//!
//! Each connection registers an unbounded channel; publishing serialises the
//! frame once and pushes it to every member of `order_<id>`. Closed channels
//! are pruned on the next publish.

use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard, PoisonError};

use tokio::sync::mpsc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::OrderId;
use crate::domain::ports::{OrderStatusNotifier, OrderStatusUpdate, order_room};
use crate::inbound::ws::messages::ServerMessage;

/// Identifier assigned to each WebSocket connection.
pub type ConnectionId = Uuid;

#[derive(Default)]
struct Registry {
    connections: HashMap<ConnectionId, mpsc::UnboundedSender<String>>,
    rooms: HashMap<String, HashSet<ConnectionId>>,
}

/// In-memory room membership shared by every session.
#[derive(Default)]
pub struct OrderRooms {
    registry: Mutex<Registry>,
}

impl OrderRooms {
    /// Empty registry with no connections.
    pub fn new() -> Self {
        Self::default()
    }

    fn registry(&self) -> MutexGuard<'_, Registry> {
        self.registry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a connection and return the receiver for frames pushed to it.
    pub fn connect(&self, connection: ConnectionId) -> mpsc::UnboundedReceiver<String> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.registry().connections.insert(connection, tx);
        rx
    }

    /// Add a connection to the room of `order_id`.
    pub fn join(&self, connection: ConnectionId, order_id: OrderId) {
        self.registry()
            .rooms
            .entry(order_room(order_id))
            .or_default()
            .insert(connection);
    }

    /// Forget a connection and drop it from every room.
    pub fn disconnect(&self, connection: ConnectionId) {
        let mut registry = self.registry();
        registry.connections.remove(&connection);
        registry.rooms.retain(|_, members| {
            members.remove(&connection);
            !members.is_empty()
        });
    }

    /// Number of connections subscribed to `order_id`.
    pub fn members(&self, order_id: OrderId) -> usize {
        self.registry()
            .rooms
            .get(&order_room(order_id))
            .map_or(0, HashSet::len)
    }
}

impl OrderStatusNotifier for OrderRooms {
    fn publish(&self, update: OrderStatusUpdate) {
        let frame = match serde_json::to_string(&ServerMessage::OrderStatusUpdate(update)) {
            Ok(frame) => frame,
            Err(error) => {
                warn!(error = %error, "failed to serialise order status update");
                return;
            }
        };

        let room = order_room(update.order_id);
        let mut registry = self.registry();
        let Registry { connections, rooms } = &mut *registry;
        let Some(members) = rooms.get_mut(&room) else {
            debug!(%room, "no subscribers for order status update");
            return;
        };
        members.retain(|connection| {
            connections
                .get(connection)
                .is_some_and(|tx| tx.send(frame.clone()).is_ok())
        });
        debug!(%room, delivered = members.len(), "order status update published");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OrderStatus;
    use rstest::rstest;
    use serde_json::{Value, json};

    fn update(order_id: OrderId) -> OrderStatusUpdate {
        OrderStatusUpdate {
            order_id,
            status: OrderStatus::Preparing,
        }
    }

    #[rstest]
    fn publish_reaches_only_room_members() {
        let rooms = OrderRooms::new();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let mut rx_a = rooms.connect(a);
        let mut rx_b = rooms.connect(b);
        rooms.join(a, 7);
        rooms.join(b, 8);

        rooms.publish(update(7));

        let frame: Value =
            serde_json::from_str(&rx_a.try_recv().expect("frame for member")).expect("json");
        assert_eq!(
            frame,
            json!({ "event": "orderStatusUpdate", "data": { "orderId": 7, "status": "preparing" } })
        );
        assert!(rx_b.try_recv().is_err());
    }

    #[rstest]
    fn disconnect_leaves_every_room() {
        let rooms = OrderRooms::new();
        let connection = Uuid::new_v4();
        let _rx = rooms.connect(connection);
        rooms.join(connection, 1);
        rooms.join(connection, 2);

        rooms.disconnect(connection);

        assert_eq!(rooms.members(1), 0);
        assert_eq!(rooms.members(2), 0);
    }

    #[rstest]
    fn dropped_receivers_are_pruned_on_publish() {
        let rooms = OrderRooms::new();
        let connection = Uuid::new_v4();
        drop(rooms.connect(connection));
        rooms.join(connection, 3);

        rooms.publish(update(3));

        assert_eq!(rooms.members(3), 0);
    }
}
