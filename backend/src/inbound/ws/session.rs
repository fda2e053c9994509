//! Per-connection gateway session.
//!
//! The loop multiplexes three sources: heartbeat ticks, client frames and
//! room pushes. Clients are pinged every 5s and dropped after 10s without
//! traffic. Tests shorten both intervals.

use std::sync::Arc;
use std::time::{Duration, Instant};

use actix_ws::{CloseCode, CloseReason, Closed, Message, MessageStream, ProtocolError, Session};
use tokio::sync::mpsc;
use tokio::time;
use tracing::{info, warn};

use crate::inbound::ws::messages::{ClientMessage, ServerMessage};
use crate::inbound::ws::rooms::{ConnectionId, OrderRooms};

#[cfg(not(test))]
pub(crate) const HEARTBEAT_INTERVAL: Duration = Duration::from_secs(5);
#[cfg(test)]
pub(crate) const HEARTBEAT_INTERVAL: Duration = Duration::from_millis(50);

#[cfg(not(test))]
pub(crate) const CLIENT_TIMEOUT: Duration = Duration::from_secs(10);
#[cfg(test)]
pub(crate) const CLIENT_TIMEOUT: Duration = Duration::from_millis(100);

pub(super) async fn handle_ws_session(
    rooms: Arc<OrderRooms>,
    connection: ConnectionId,
    session: Session,
    stream: MessageStream,
) {
    info!(%connection, "gateway client connected");
    let outbound = rooms.connect(connection);
    let gateway = WsSession { rooms, connection };
    gateway.run(session, stream, outbound).await;
    gateway.rooms.disconnect(connection);
    info!(%connection, "gateway client disconnected");
}

enum SessionError {
    ClientClosed(Option<CloseReason>),
    StreamClosed,
    HeartbeatTimeout,
    Protocol(ProtocolError),
    InvalidPayload,
    Network(Closed),
}

struct WsSession {
    rooms: Arc<OrderRooms>,
    connection: ConnectionId,
}

impl WsSession {
    async fn run(
        &self,
        mut session: Session,
        mut stream: MessageStream,
        mut outbound: mpsc::UnboundedReceiver<String>,
    ) {
        let mut last_heartbeat = Instant::now();
        let mut heartbeat = time::interval(HEARTBEAT_INTERVAL);

        loop {
            let result = tokio::select! {
                _ = heartbeat.tick() => {
                    self.handle_heartbeat_tick(&mut session, &last_heartbeat).await
                }
                message = stream.recv() => {
                    self.handle_stream_message(&mut session, &mut last_heartbeat, message)
                        .await
                }
                Some(frame) = outbound.recv() => {
                    session.text(frame).await.map_err(SessionError::Network)
                }
            };

            if let Err(error) = result {
                self.log_shutdown_reason(&error);
                if let Some(reason) = close_reason_for(error) {
                    if let Err(error) = session.close(Some(reason)).await {
                        warn!(connection = %self.connection, error = %error, "failed to close gateway session");
                    }
                }
                return;
            }
        }
    }

    async fn handle_heartbeat_tick(
        &self,
        session: &mut Session,
        last_heartbeat: &Instant,
    ) -> Result<(), SessionError> {
        if Instant::now().duration_since(*last_heartbeat) > CLIENT_TIMEOUT {
            return Err(SessionError::HeartbeatTimeout);
        }
        session.ping(b"").await.map_err(SessionError::Network)
    }

    async fn handle_stream_message(
        &self,
        session: &mut Session,
        last_heartbeat: &mut Instant,
        message: Option<Result<Message, ProtocolError>>,
    ) -> Result<(), SessionError> {
        let message = message
            .ok_or(SessionError::StreamClosed)?
            .map_err(SessionError::Protocol)?;
        *last_heartbeat = Instant::now();

        match message {
            Message::Ping(payload) => session.pong(&payload).await.map_err(SessionError::Network),
            Message::Text(text) => self.handle_text_message(session, text.as_ref()).await,
            Message::Close(reason) => Err(SessionError::ClientClosed(reason)),
            Message::Pong(_) | Message::Binary(_) | Message::Continuation(_) | Message::Nop => {
                Ok(())
            }
        }
    }

    async fn handle_text_message(
        &self,
        session: &mut Session,
        text: &str,
    ) -> Result<(), SessionError> {
        let ClientMessage::SubscribeOrder(order_id) = serde_json::from_str(text).map_err(|error| {
            warn!(connection = %self.connection, error = %error, "rejected malformed gateway frame");
            SessionError::InvalidPayload
        })?;

        self.rooms.join(self.connection, order_id);
        info!(connection = %self.connection, order_id, "client subscribed to order");
        let ack = serde_json::to_string(&ServerMessage::subscribed(order_id))
            .map_err(|_| SessionError::InvalidPayload)?;
        session.text(ack).await.map_err(SessionError::Network)
    }

    fn log_shutdown_reason(&self, error: &SessionError) {
        match error {
            SessionError::HeartbeatTimeout => {
                warn!(connection = %self.connection, "gateway heartbeat timeout");
            }
            SessionError::Protocol(error) => {
                warn!(connection = %self.connection, error = %error, "gateway protocol error");
            }
            SessionError::Network(error) => {
                warn!(connection = %self.connection, error = %error, "gateway send failed");
            }
            SessionError::InvalidPayload
            | SessionError::ClientClosed(_)
            | SessionError::StreamClosed => {}
        }
    }
}

fn close_reason_for(error: SessionError) -> Option<CloseReason> {
    let close = |code, description: &str| {
        Some(CloseReason {
            code,
            description: Some(description.to_owned()),
        })
    };
    match error {
        SessionError::HeartbeatTimeout => close(CloseCode::Normal, "heartbeat timeout"),
        SessionError::Protocol(_) => close(CloseCode::Protocol, "protocol error"),
        SessionError::InvalidPayload => close(CloseCode::Policy, "invalid payload"),
        SessionError::ClientClosed(reason) => reason,
        SessionError::StreamClosed | SessionError::Network(_) => None,
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
